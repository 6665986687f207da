use qprobe_model::{LabelAssignment, LabelSchema, QueryResult, Row};

/// Results with fewer rows than this get no label schema and no row series.
pub const MIN_ROWS_FOR_SCHEMA: usize = 2;

/// Projects normalized rows onto metric labels, leaving out one value column.
///
/// Rows whose columns differ from the schema are handled uniformly:
/// columns outside the schema are ignored and schema labels missing from the row get an empty value.
#[derive(Debug, Clone, Default)]
pub struct LabelProjector {
    value_column: String,
}

impl LabelProjector {
    /// `value_column` is excluded from labels; an empty name excludes nothing.
    pub fn new(value_column: impl Into<String>) -> Self {
        Self {
            value_column: value_column.into(),
        }
    }

    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    /// Derive the label schema from the first row of `result`.
    ///
    /// Returns `None` when the result has fewer than [`MIN_ROWS_FOR_SCHEMA`] rows.
    pub fn derive_schema(&self, result: &QueryResult) -> Option<LabelSchema> {
        if result.len() < MIN_ROWS_FOR_SCHEMA {
            return None;
        }
        let first = result.first()?;
        let names = first
            .columns()
            .iter()
            .filter(|name| !self.is_value_column(name));
        Some(LabelSchema::new(names.cloned()))
    }

    /// Build the label assignment of one row against `schema`.
    pub fn project(&self, schema: &LabelSchema, row: &Row) -> LabelAssignment {
        let mut labels = LabelAssignment::with_capacity(schema.len());
        for name in schema.iter().filter(|name| !self.is_value_column(name)) {
            labels.insert(name, row.get(name).unwrap_or_default());
        }
        labels
    }

    /// Project every row of `result`, in result order.
    pub fn project_all(&self, schema: &LabelSchema, result: &QueryResult) -> Vec<LabelAssignment> {
        result.iter().map(|row| self.project(schema, row)).collect()
    }

    fn is_value_column(&self, name: &str) -> bool {
        !self.value_column.is_empty() && name == self.value_column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[(&str, &str)]]) -> QueryResult {
        data.iter()
            .map(|pairs| Row::from_pairs(pairs.iter().copied()))
            .collect()
    }

    #[test]
    fn schema_keeps_all_columns_without_value_column() {
        let result = rows(&[
            &[("id", "a"), ("region", "us")],
            &[("id", "b"), ("region", "eu")],
        ]);
        let schema = LabelProjector::new("").derive_schema(&result).unwrap();
        assert_eq!(schema.names(), &["id", "region"]);
    }

    #[test]
    fn schema_excludes_value_column_only() {
        let result = rows(&[
            &[("id", "a"), ("count", "3"), ("region", "us")],
            &[("id", "b"), ("count", "5"), ("region", "eu")],
        ]);
        let projector = LabelProjector::new("count");
        let schema = projector.derive_schema(&result).unwrap();
        assert_eq!(schema.names(), &["id", "region"]);

        let labels = projector.project(&schema, &result.rows()[1]);
        assert_eq!(labels.values(), vec!["b", "eu"]);
        assert!(labels.get("count").is_none());
    }

    #[test]
    fn unknown_value_column_excludes_nothing() {
        let result = rows(&[&[("id", "a")], &[("id", "b")]]);
        let schema = LabelProjector::new("missing").derive_schema(&result).unwrap();
        assert_eq!(schema.names(), &["id"]);
    }

    #[test]
    fn no_schema_below_two_rows() {
        let projector = LabelProjector::new("");
        assert!(projector.derive_schema(&QueryResult::default()).is_none());
        assert!(projector.derive_schema(&rows(&[&[("id", "a")]])).is_none());
    }

    #[test]
    fn schema_comes_from_first_row() {
        let result = rows(&[
            &[("id", "a"), ("region", "us")],
            &[("id", "b"), ("zone", "z1")],
        ]);
        let projector = LabelProjector::new("");
        let schema = projector.derive_schema(&result).unwrap();
        assert_eq!(schema.names(), &["id", "region"]);

        let all = projector.project_all(&schema, &result);
        assert_eq!(all[1].get("id"), Some("b"));
        assert_eq!(all[1].get("region"), Some(""));
        assert!(all[1].get("zone").is_none());
    }

    #[test]
    fn duplicate_columns_last_value_wins() {
        let result = rows(&[
            &[("id", "a"), ("id", "a2")],
            &[("id", "b"), ("id", "b2")],
        ]);
        let projector = LabelProjector::new("");
        let schema = projector.derive_schema(&result).unwrap();
        assert_eq!(schema.names(), &["id"]);

        let labels = projector.project(&schema, &result.rows()[0]);
        assert_eq!(labels.get("id"), Some("a2"));
        assert_eq!(labels.len(), 1);
    }
}
