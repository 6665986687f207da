use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use qprobe_core::{
    BackendError, ClientCache, ClientFactory, CoreError, LabelProjector, QueryContext, run_query,
};
use qprobe_model::QueryResult;
use qprobe_prometheus::{ProbeMetrics, ProbeRegistry};
use tracing::{debug, instrument, warn};

use crate::error::ProbeError;
use crate::handler::{ProbeHandler, ProbeReport, ProbeRequest};

/// Probe orchestrator: query through the shared client cache, project the rows, render a fresh registry.
pub struct ProbeService<F: ClientFactory> {
    cache: Arc<ClientCache<F>>,
    metrics: ProbeMetrics,
    handler_name: String,
}

impl<F: ClientFactory> ProbeService<F> {
    /// `handler_name` labels the latency observations (usually the probe route).
    pub fn new(cache: Arc<ClientCache<F>>, metrics: ProbeMetrics, handler_name: impl Into<String>) -> Self {
        Self {
            cache,
            metrics,
            handler_name: handler_name.into(),
        }
    }

    pub fn cache(&self) -> &Arc<ClientCache<F>> {
        &self.cache
    }

    async fn execute(&self, request: &ProbeRequest) -> Result<ProbeReport, ProbeError> {
        let ctx = QueryContext::with_timeout(request.timeout);
        let result = match tokio::time::timeout_at(
            ctx.deadline(),
            run_query(&self.cache, &request.statement, &ctx),
        )
        .await
        {
            Ok(Err(CoreError::Backend(BackendError::DeadlineExceeded))) | Err(_) => {
                ctx.cancel();
                return Err(ProbeError::Timeout(request.timeout));
            }
            Ok(result) => result?,
        };

        let body = render(&result, &LabelProjector::new(request.value_column.as_str()))?;
        Ok(ProbeReport {
            rows: result.len(),
            body,
        })
    }
}

/// Build the request-scoped registry for `result` and encode it.
///
/// An empty result counts as absent; the row gauge appears only once a label schema exists.
fn render(result: &QueryResult, projector: &LabelProjector) -> Result<String, ProbeError> {
    let probe = ProbeRegistry::new();
    probe.set_presence(!result.is_empty())?;

    if let Some(schema) = projector.derive_schema(result) {
        let rows = projector.project_all(&schema, result);
        probe.add_rows(&schema, &rows)?;
    }
    Ok(probe.encode()?)
}

#[async_trait]
impl<F: ClientFactory> ProbeHandler for ProbeService<F> {
    #[instrument(
        level = "debug",
        skip_all,
        fields(endpoint = request.statement.endpoint(), database = request.statement.database())
    )]
    async fn probe(&self, request: ProbeRequest) -> Result<ProbeReport, ProbeError> {
        let start = Instant::now();
        let outcome = self.execute(&request).await;

        self.metrics
            .observe_collect(&self.handler_name, request.statement.text(), start.elapsed());
        match &outcome {
            Ok(report) => {
                self.metrics.inc_request(&self.handler_name, "success");
                debug!(rows = report.rows, elapsed_ms = start.elapsed().as_millis() as u64, "probe finished");
            }
            Err(e) => {
                self.metrics.inc_request(&self.handler_name, e.kind());
                warn!(error = %e, "probe failed");
            }
        }
        outcome
    }
}
