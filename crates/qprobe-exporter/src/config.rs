use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use qprobe_api::DEFAULT_PROBE_PATH;
use qprobe_core::MAX_TIMEOUT;
use qprobe_kusto::{DEFAULT_AUTHORITY_HOST, KustoConfig};
use qprobe_observe::{LoggerConfig, LoggerFormat};

/// Exporter settings. Every flag can also be set through the environment variable shown in `--help`.
///
/// Backend credentials are not flags: they are read from `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`,
/// `AZURE_CLIENT_SECRET` (and optionally `AZURE_AUTHORITY_HOST`) when a client is first built.
#[derive(Debug, Clone, Parser)]
#[command(name = "qprobe-exporter", version, about = "Runs ad-hoc Kusto queries and exposes the result as Prometheus metrics")]
pub struct ExporterConfig {
    /// Address the HTTP server listens on.
    #[arg(long = "server.bind", env = "SERVER_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Default probe deadline in seconds; also the cap for the scrape timeout header.
    #[arg(long = "scrape.timeout", env = "SCRAPE_TIMEOUT", default_value = "120", value_parser = parse_seconds)]
    pub scrape_timeout: Duration,

    /// Route the probe is served on.
    #[arg(long = "probe.path", env = "PROBE_PATH", default_value = DEFAULT_PROBE_PATH)]
    pub probe_path: String,

    /// Log filter directive (e.g. `info`, `qprobe_api=debug,info`).
    #[arg(long = "log.level", env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format: text, json or journald.
    #[arg(long = "log.format", env = "LOG_FORMAT", default_value = "text")]
    pub log_format: LoggerFormat,

    /// Identity provider used for the client-credentials flow.
    #[arg(long = "kusto.authority", env = "KUSTO_AUTHORITY_HOST", default_value = DEFAULT_AUTHORITY_HOST)]
    pub authority_host: String,
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.scrape_timeout.is_zero() {
            return Err("scrape.timeout must be greater than zero".to_string());
        }
        if !self.probe_path.starts_with('/') {
            return Err(format!("probe.path must start with '/': {}", self.probe_path));
        }
        if matches!(self.probe_path.as_str(), "/metrics" | "/healthz") {
            return Err(format!("probe.path collides with a built-in route: {}", self.probe_path));
        }
        Ok(())
    }

    pub fn logger(&self) -> LoggerConfig {
        LoggerConfig::new(self.log_format, self.log_level.clone())
    }

    pub fn kusto(&self) -> KustoConfig {
        KustoConfig {
            authority_host: self.authority_host.clone(),
            ..Default::default()
        }
    }
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid number of seconds {s:?}: {e}"))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("invalid number of seconds {s:?}"));
    }
    if secs > MAX_TIMEOUT.as_secs_f64() {
        return Err(format!("{s:?} exceeds the maximum of {}s", MAX_TIMEOUT.as_secs()));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| format!("invalid number of seconds {s:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ExporterConfig {
        let argv = std::iter::once("qprobe-exporter").chain(args.iter().copied());
        ExporterConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults() {
        let cfg = parse(&[]);
        assert_eq!(cfg.bind, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.scrape_timeout, Duration::from_secs(120));
        assert_eq!(cfg.probe_path, DEFAULT_PROBE_PATH);
        assert_eq!(cfg.log_format, LoggerFormat::Text);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = parse(&[
            "--server.bind",
            "127.0.0.1:9000",
            "--scrape.timeout",
            "7.5",
            "--probe.path",
            "/probe",
            "--log.format",
            "json",
        ]);
        assert_eq!(cfg.bind.port(), 9000);
        assert_eq!(cfg.scrape_timeout, Duration::from_millis(7500));
        assert_eq!(cfg.probe_path, "/probe");
        assert_eq!(cfg.logger().format, LoggerFormat::Json);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(
            ExporterConfig::try_parse_from(["qprobe-exporter", "--scrape.timeout", "abc"]).is_err()
        );
        assert!(
            ExporterConfig::try_parse_from(["qprobe-exporter", "--scrape.timeout", "1e300"]).is_err()
        );
        assert!(
            ExporterConfig::try_parse_from(["qprobe-exporter", "--scrape.timeout", "86401"]).is_err()
        );
        assert!(parse(&["--scrape.timeout", "0"]).validate().is_err());
        assert!(parse(&["--probe.path", "probe"]).validate().is_err());
        assert!(parse(&["--probe.path", "/metrics"]).validate().is_err());
    }
}
