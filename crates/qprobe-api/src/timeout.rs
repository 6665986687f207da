use std::time::Duration;

use axum::http::HeaderMap;

use crate::error::ProbeError;

/// Header Prometheus sets to the scrape timeout of the target, in (fractional) seconds.
pub const SCRAPE_TIMEOUT_HEADER: &str = "x-prometheus-scrape-timeout-seconds";

/// Effective probe deadline.
///
/// A positive header value is used but never exceeds `default`; an absent, empty or zero header yields `default`.
pub fn scrape_timeout(headers: &HeaderMap, default: Duration) -> Result<Duration, ProbeError> {
    let Some(raw) = headers.get(SCRAPE_TIMEOUT_HEADER) else {
        return Ok(default);
    };
    let text = raw
        .to_str()
        .map_err(|e| ProbeError::TimeoutParse(e.to_string()))?
        .trim();
    if text.is_empty() {
        return Ok(default);
    }

    let secs: f64 = text
        .parse()
        .map_err(|e| ProbeError::TimeoutParse(format!("{text:?}: {e}")))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(ProbeError::TimeoutParse(format!(
            "{text:?}: expected a non-negative number of seconds"
        )));
    }
    if secs == 0.0 || secs >= default.as_secs_f64() {
        return Ok(default);
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| ProbeError::TimeoutParse(format!("{text:?}: {e}")))
}
