use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use qprobe_model::{LabelAssignment, LabelSchema};

pub const QUERY_RESULT: &str = "query_result";
pub const QUERY_ROW: &str = "query_row";

/// Request-scoped registry carrying the metrics of a single probe.
///
/// Never shared between requests: build one per probe, encode it, drop it.
pub struct ProbeRegistry {
    registry: Registry,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Register `query_result` and set it to `1` or `0`.
    pub fn set_presence(&self, present: bool) -> Result<(), prometheus::Error> {
        let gauge = Gauge::with_opts(Opts::new(QUERY_RESULT, "Query result presence"))?;
        self.registry.register(Box::new(gauge.clone()))?;
        gauge.set(if present { 1.0 } else { 0.0 });
        Ok(())
    }

    /// Register `query_row` keyed by `schema` and add one series per assignment, valued `1`.
    ///
    /// Fails when a column name is not a valid label name.
    pub fn add_rows(
        &self,
        schema: &LabelSchema,
        rows: &[LabelAssignment],
    ) -> Result<(), prometheus::Error> {
        let labels: Vec<&str> = schema.iter().collect();
        let gauge = GaugeVec::new(Opts::new(QUERY_ROW, "Query result row"), &labels)?;
        self.registry.register(Box::new(gauge.clone()))?;

        for row in rows {
            gauge.get_metric_with_label_values(&row.values())?.set(1.0);
        }
        Ok(())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encode the registry in the text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl Default for ProbeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use qprobe_core::LabelProjector;
    use qprobe_model::{QueryResult, Row};

    use super::*;

    #[test]
    fn presence_only() {
        let probe = ProbeRegistry::new();
        probe.set_presence(false).unwrap();

        let body = probe.encode().unwrap();
        assert!(body.contains("query_result 0"));
        assert!(!body.contains(QUERY_ROW));
    }

    #[test]
    fn one_series_per_row() {
        let result: QueryResult = vec![
            Row::from_pairs([("id", "a"), ("region", "us")]),
            Row::from_pairs([("id", "b"), ("region", "eu")]),
        ]
        .into();
        let projector = LabelProjector::new("");
        let schema = projector.derive_schema(&result).unwrap();

        let probe = ProbeRegistry::new();
        probe.set_presence(true).unwrap();
        probe
            .add_rows(&schema, &projector.project_all(&schema, &result))
            .unwrap();

        let body = probe.encode().unwrap();
        assert!(body.contains("query_result 1"));
        assert!(body.contains(r#"query_row{id="a",region="us"} 1"#));
        assert!(body.contains(r#"query_row{id="b",region="eu"} 1"#));
    }

    #[test]
    fn label_values_are_escaped() {
        let schema = LabelSchema::new(["msg"]);
        let mut row = LabelAssignment::default();
        row.insert("msg", "say \"hi\"");

        let probe = ProbeRegistry::new();
        probe.add_rows(&schema, &[row]).unwrap();
        assert!(probe.encode().unwrap().contains(r#"query_row{msg="say \"hi\""} 1"#));
    }

    #[test]
    fn invalid_label_name_is_an_error() {
        let schema = LabelSchema::new(["Node Name"]);
        let probe = ProbeRegistry::new();
        assert!(probe.add_rows(&schema, &[]).is_err());
    }

    #[test]
    fn registries_are_independent() {
        let a = ProbeRegistry::new();
        let b = ProbeRegistry::new();
        a.set_presence(true).unwrap();
        b.set_presence(false).unwrap();

        assert!(a.encode().unwrap().contains("query_result 1"));
        assert!(b.encode().unwrap().contains("query_result 0"));
    }
}
