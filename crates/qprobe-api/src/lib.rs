mod error;
pub use error::ProbeError;

mod handler;
pub use handler::{ProbeHandler, ProbeReport, ProbeRequest};

mod service;
pub use service::ProbeService;

mod timeout;
pub use timeout::{SCRAPE_TIMEOUT_HEADER, scrape_timeout};

mod http;
pub use http::{DEFAULT_PROBE_PATH, HttpApi};

pub use axum;

#[cfg(test)]
mod testing;
