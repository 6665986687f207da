use std::time::Duration;

use async_trait::async_trait;
use qprobe_model::QueryStatement;

use crate::error::ProbeError;

/// One validated probe request.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub statement: QueryStatement,
    /// Column left out of the row labels; empty keeps every column.
    pub value_column: String,
    /// Effective deadline of the whole probe.
    pub timeout: Duration,
}

/// Encoded metrics of a successful probe.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Rows returned by the query.
    pub rows: usize,
    /// Request-scoped registry in the text exposition format.
    pub body: String,
}

/// Probe execution API handler.
///
/// This trait abstracts the query pipeline, allowing users to:
/// - Use the provided `ProbeService`
/// - Implement custom handlers with additional logic (auth, allow-lists, etc.)
#[async_trait]
pub trait ProbeHandler: Send + Sync + 'static {
    /// Run the query of `request` and render its metrics.
    async fn probe(&self, request: ProbeRequest) -> Result<ProbeReport, ProbeError>;
}
