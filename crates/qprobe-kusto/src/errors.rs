use qprobe_core::{BackendError, ClientInitError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KustoError {
    #[error("http request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("token request rejected: {0}")]
    TokenRejected(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("request cancelled")]
    Cancelled,
}

impl From<KustoError> for BackendError {
    fn from(err: KustoError) -> Self {
        match err {
            KustoError::HttpRequest(e) => BackendError::Transport(e.to_string()),
            KustoError::Service { message, .. } => BackendError::Query(message),
            KustoError::TokenRejected(msg) => BackendError::Query(format!("token refresh rejected: {msg}")),
            KustoError::Cancelled => BackendError::Cancelled,
            e @ (KustoError::Decode(_) | KustoError::InvalidResponse(_)) => {
                BackendError::InvalidResponse(e.to_string())
            }
        }
    }
}

impl From<KustoError> for ClientInitError {
    fn from(err: KustoError) -> Self {
        ClientInitError::Authentication(err.to_string())
    }
}
