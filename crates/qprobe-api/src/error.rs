use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use qprobe_core::{BackendError, ClientInitError, CoreError};
use qprobe_prometheus::ProbeRegistry;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("parameter \"{0}\" is missing")]
    MissingParameter(&'static str),

    #[error("failed to parse timeout from Prometheus header: {0}")]
    TimeoutParse(String),

    #[error("client initialization failed: {0}")]
    ClientInitialization(#[source] ClientInitError),

    #[error("query failed: {0}")]
    Backend(#[source] BackendError),

    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to build metrics: {0}")]
    Metrics(#[from] qprobe_prometheus::Error),
}

impl ProbeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProbeError::MissingParameter(_) | ProbeError::Backend(_) => StatusCode::BAD_REQUEST,
            ProbeError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ProbeError::TimeoutParse(_)
            | ProbeError::ClientInitialization(_)
            | ProbeError::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for the request outcome counter.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::MissingParameter(_) => "missing_parameter",
            ProbeError::TimeoutParse(_) => "timeout_parse",
            ProbeError::ClientInitialization(_) => "client_initialization",
            ProbeError::Backend(_) => "backend",
            ProbeError::Timeout(_) => "timeout",
            ProbeError::Metrics(_) => "metrics",
        }
    }

    /// Whether the response still carries `query_result 0` after the message.
    fn reports_absence(&self) -> bool {
        matches!(
            self,
            ProbeError::ClientInitialization(_) | ProbeError::Backend(_) | ProbeError::Timeout(_)
        )
    }
}

impl From<CoreError> for ProbeError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ClientInitialization(e) => ProbeError::ClientInitialization(e),
            CoreError::Backend(e) => ProbeError::Backend(e),
            CoreError::Normalize(e) => {
                ProbeError::Backend(BackendError::InvalidResponse(e.to_string()))
            }
        }
    }
}

impl IntoResponse for ProbeError {
    fn into_response(self) -> Response {
        let mut body = self.to_string();
        if self.reports_absence()
            && let Some(exposition) = absent_exposition()
        {
            body.push('\n');
            body.push_str(&exposition);
        }
        (self.status(), body).into_response()
    }
}

fn absent_exposition() -> Option<String> {
    let probe = ProbeRegistry::new();
    probe.set_presence(false).ok()?;
    probe.encode().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ProbeError::MissingParameter("query").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProbeError::TimeoutParse("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ProbeError::Backend(BackendError::Query("bad".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProbeError::Timeout(Duration::from_secs(1)).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn missing_parameter_names_it() {
        assert_eq!(
            ProbeError::MissingParameter("database").to_string(),
            "parameter \"database\" is missing"
        );
    }

    #[test]
    fn normalize_errors_count_as_backend_failures() {
        let err: ProbeError = CoreError::Normalize(qprobe_model::RowError::LengthMismatch {
            columns: 2,
            values: 1,
        })
        .into();
        assert!(matches!(err, ProbeError::Backend(BackendError::InvalidResponse(_))));
    }
}
