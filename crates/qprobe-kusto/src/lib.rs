//! Azure Data Explorer (Kusto) backend.
//!
//! [`KustoConnector`] authenticates with the client-credentials flow against the configured authority
//! and hands out [`KustoClient`]s that run queries through the `/v1/rest/query` REST endpoint.
//! Access tokens are refreshed transparently shortly before they expire.

mod auth;

mod client;
pub use client::KustoClient;

mod config;
pub use config::{DEFAULT_AUTHORITY_HOST, KustoConfig};

mod connector;
pub use connector::KustoConnector;

mod errors;
pub use errors::KustoError;

mod wire;
