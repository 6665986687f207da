use std::time::Duration;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
    exponential_buckets, proto::MetricFamily,
};

/// Process-wide probe metrics.
///
/// Cheap to clone; all clones record into the same registry. The underlying collectors are atomic,
/// so concurrent requests never lose observations.
#[derive(Clone)]
pub struct ProbeMetrics {
    registry: Registry,
    collect_duration: HistogramVec,
    requests: IntCounterVec,
}

impl ProbeMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let collect_duration = HistogramVec::new(
            HistogramOpts::new(
                "qprobe_collect_duration_seconds",
                "Wall-clock duration of probe queries",
            )
            .buckets(exponential_buckets(0.05, 2.0, 12)?),
            &["handler", "filter"],
        )?;
        let requests = IntCounterVec::new(
            Opts::new("qprobe_probe_requests_total", "Probe requests by outcome"),
            &["handler", "outcome"],
        )?;

        registry.register(Box::new(collect_duration.clone()))?;
        registry.register(Box::new(requests.clone()))?;

        Ok(Self {
            registry,
            collect_duration,
            requests,
        })
    }

    /// Record how long a probe took; `filter` is the query text.
    pub fn observe_collect(&self, handler: &str, filter: &str, elapsed: Duration) {
        self.collect_duration
            .with_label_values(&[handler, filter])
            .observe(elapsed.as_secs_f64());
    }

    /// Count a finished probe request.
    pub fn inc_request(&self, handler: &str, outcome: &str) {
        self.requests.with_label_values(&[handler, outcome]).inc();
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Encode all process metrics in the text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
