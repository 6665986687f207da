use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::Parser;
use tracing::{info, warn};

use qprobe_api::{HttpApi, ProbeService, axum};
use qprobe_core::ClientCache;
use qprobe_kusto::KustoConnector;
use qprobe_observe::logger_init;
use qprobe_prometheus::ProbeMetrics;

mod config;
use config::ExporterConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Config
    let cfg = ExporterConfig::parse();
    cfg.validate().map_err(|e| anyhow!(e))?;

    // 2) Logger
    logger_init(&cfg.logger()).context("logger init")?;
    info!(
        bind = %cfg.bind,
        probe_path = %cfg.probe_path,
        scrape_timeout_s = cfg.scrape_timeout.as_secs_f64(),
        "qprobe exporter starting"
    );

    // 3) Backend + client cache
    let connector = KustoConnector::new(cfg.kusto()).context("kusto connector")?;
    let cache = Arc::new(ClientCache::new(connector));

    // 4) Probe service
    let metrics = ProbeMetrics::new().context("process metrics")?;
    let service = ProbeService::new(cache, metrics.clone(), cfg.probe_path.clone());
    let app = HttpApi::new(Arc::new(service), metrics)
        .with_probe_path(cfg.probe_path.clone())
        .with_default_timeout(cfg.scrape_timeout)
        .router();

    // 5) Serve
    let listener = tokio::net::TcpListener::bind(cfg.bind)
        .await
        .with_context(|| format!("bind {}", cfg.bind))?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("shutting down...");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
