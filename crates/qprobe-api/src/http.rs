use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::get,
};
use qprobe_model::QueryStatement;
use qprobe_prometheus::ProbeMetrics;
use serde::Deserialize;
use tracing::{debug, error};

use crate::{
    error::ProbeError,
    handler::{ProbeHandler, ProbeRequest},
    timeout::scrape_timeout,
};

pub const DEFAULT_PROBE_PATH: &str = "/probe/kusto/query";

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
    metrics: ProbeMetrics,
    probe_path: String,
    default_timeout: Duration,
}

struct AppState<H> {
    handler: Arc<H>,
    metrics: ProbeMetrics,
    default_timeout: Duration,
}

impl<H> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            metrics: self.metrics.clone(),
            default_timeout: self.default_timeout,
        }
    }
}

impl<H> HttpApi<H>
where
    H: ProbeHandler,
{
    /// Create new HTTP API with the given handler and process metrics.
    pub fn new(handler: Arc<H>, metrics: ProbeMetrics) -> Self {
        Self {
            handler,
            metrics,
            probe_path: DEFAULT_PROBE_PATH.to_string(),
            default_timeout: Duration::from_secs(120),
        }
    }

    /// Mount the probe on a different route.
    pub fn with_probe_path(mut self, path: impl Into<String>) -> Self {
        self.probe_path = path.into();
        self
    }

    /// Deadline used when the scrape carries no timeout header; also the upper bound for it.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - GET <probe path> - Run a query and expose its result (default `/probe/kusto/query`)
    /// - GET /metrics - Process metrics
    /// - GET /healthz - Liveness
    pub fn router(self) -> Router {
        let state = AppState {
            handler: self.handler,
            metrics: self.metrics,
            default_timeout: self.default_timeout,
        };
        Router::new()
            .route(&self.probe_path, get(probe::<H>))
            .route("/metrics", get(metrics::<H>))
            .route("/healthz", get(healthz))
            .with_state(state)
    }
}

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ProbeParams {
    endpoint: Option<String>,
    database: Option<String>,
    query: Option<String>,
    #[serde(rename = "mappingValueColumn")]
    mapping_value_column: Option<String>,
}

impl ProbeParams {
    fn statement(&self) -> Result<QueryStatement, ProbeError> {
        let endpoint = required(&self.endpoint, "endpoint")?;
        let database = required(&self.database, "database")?;
        let query = required(&self.query, "query")?;
        Ok(QueryStatement::new(endpoint, database, query))
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ProbeError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ProbeError::MissingParameter(name)),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET <probe path>
///
/// Query params:
/// - ?endpoint=https://... - backend endpoint (required)
/// - ?database=name - database (required)
/// - ?query=... - query text, passed through verbatim (required)
/// - ?mappingValueColumn=col - column excluded from row labels (optional)
async fn probe<H>(
    State(state): State<AppState<H>>,
    headers: HeaderMap,
    Query(params): Query<ProbeParams>,
) -> Result<impl IntoResponse, ProbeError>
where
    H: ProbeHandler,
{
    let request = build_request(&headers, &params, state.default_timeout).inspect_err(|e| {
        error!(error = %e, "rejecting probe request");
    })?;
    debug!(
        endpoint = request.statement.endpoint(),
        database = request.statement.database(),
        timeout_ms = request.timeout.as_millis() as u64,
        "probing"
    );

    let report = state.handler.probe(request).await?;
    Ok(([(CONTENT_TYPE, qprobe_prometheus::CONTENT_TYPE)], report.body))
}

fn build_request(
    headers: &HeaderMap,
    params: &ProbeParams,
    default_timeout: Duration,
) -> Result<ProbeRequest, ProbeError> {
    let timeout = scrape_timeout(headers, default_timeout)?;
    let statement = params.statement()?;
    Ok(ProbeRequest {
        statement,
        value_column: params.mapping_value_column.clone().unwrap_or_default(),
        timeout,
    })
}

/// GET /metrics
async fn metrics<H>(State(state): State<AppState<H>>) -> Result<impl IntoResponse, ProbeError>
where
    H: ProbeHandler,
{
    let body = state.metrics.encode()?;
    Ok(([(CONTENT_TYPE, qprobe_prometheus::CONTENT_TYPE)], body))
}

/// GET /healthz
async fn healthz() -> &'static str {
    "Ok"
}
