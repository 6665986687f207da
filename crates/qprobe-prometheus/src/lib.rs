//! Prometheus side of the query probe.
//!
//! Two pieces live here:
//! - [`ProbeRegistry`]: a registry built fresh for every probe request, holding the one-shot result metrics.
//! - [`ProbeMetrics`]: process-wide collector metrics, shared by all requests and served on `/metrics`.
//!
//! ## Probe metrics
//! - `query_result` - Gauge, `1` when the query produced rows, `0` otherwise
//! - `query_row{<columns>}` - Gauge, one series per result row valued `1`
//!
//! ## Process metrics
//! - `qprobe_collect_duration_seconds{handler, filter}` - Histogram
//! - `qprobe_probe_requests_total{handler, outcome}` - Counter
//!
//! ## Example
//! ```rust
//! use qprobe_model::{LabelAssignment, LabelSchema};
//! use qprobe_prometheus::ProbeRegistry;
//!
//! # fn main() -> Result<(), qprobe_prometheus::Error> {
//! let probe = ProbeRegistry::new();
//! probe.set_presence(true)?;
//!
//! let schema = LabelSchema::new(["id"]);
//! let mut row = LabelAssignment::default();
//! row.insert("id", "a");
//! probe.add_rows(&schema, &[row])?;
//!
//! let body = probe.encode()?;
//! assert!(body.contains(r#"query_row{id="a"} 1"#));
//! # Ok(())
//! # }
//! ```

mod probe;
pub use probe::{ProbeRegistry, QUERY_RESULT, QUERY_ROW};

mod process;
pub use process::ProbeMetrics;

pub use prometheus::{Encoder, Error, Registry, TextEncoder};

/// Content type of the text exposition format.
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;
