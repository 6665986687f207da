use qprobe_model::RowError;
use thiserror::Error;

/// Failure reported by (or while talking to) the remote query backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("query rejected: {0}")]
    Query(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("query cancelled")]
    Cancelled,
    #[error("query deadline exceeded")]
    DeadlineExceeded,
}

/// Failure while constructing or authenticating a backend client.
#[derive(Debug, Error)]
pub enum ClientInitError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("authentication failed: {0}")]
    Authentication(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("client initialization failed: {0}")]
    ClientInitialization(#[from] ClientInitError),

    #[error("{0}")]
    Backend(#[from] BackendError),

    #[error("row normalization failed: {0}")]
    Normalize(#[from] RowError),
}
