use qprobe_model::{NativeRow, QueryResult, Row, RowError};

/// Convert a backend-native row into a [`Row`] of column names and rendered values.
///
/// Names follow the descriptor order, values are rendered in the same order via their
/// canonical [`Display`](std::fmt::Display) form.
pub fn normalize(native: &NativeRow) -> Result<Row, RowError> {
    let columns = native.columns.iter().map(|c| c.name.clone()).collect();
    let values = native.values.iter().map(ToString::to_string).collect();
    Row::new(columns, values)
}

/// Normalize every row of one result table, failing on the first malformed row.
pub fn normalize_all(rows: &[NativeRow]) -> Result<QueryResult, RowError> {
    rows.iter().map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use qprobe_model::{CellValue, ColumnDescriptor, ColumnType};

    use super::*;

    fn native(values: Vec<CellValue>) -> NativeRow {
        NativeRow::new(
            vec![
                ColumnDescriptor::new("node", ColumnType::String),
                ColumnDescriptor::new("count", ColumnType::Long),
                ColumnDescriptor::new("ratio", ColumnType::Real),
                ColumnDescriptor::new("seen", ColumnType::Datetime),
            ],
            values,
        )
    }

    #[test]
    fn renders_values_in_column_order() {
        let row = normalize(&native(vec![
            CellValue::String("n1".into()),
            CellValue::Long(42),
            CellValue::Real(0.25),
            CellValue::DateTime("2024-01-02T03:04:05Z".into()),
        ]))
        .unwrap();

        assert_eq!(row.columns(), &["node", "count", "ratio", "seen"]);
        assert_eq!(row.values(), &["n1", "42", "0.25", "2024-01-02T03:04:05Z"]);
    }

    #[test]
    fn null_renders_empty() {
        let row = normalize(&native(vec![
            CellValue::Null,
            CellValue::Long(1),
            CellValue::Null,
            CellValue::Null,
        ]))
        .unwrap();
        assert_eq!(row.get("node"), Some(""));
    }

    #[test]
    fn mismatched_row_is_rejected() {
        let err = normalize(&native(vec![CellValue::Long(1)])).unwrap_err();
        assert_eq!(err, RowError::LengthMismatch { columns: 4, values: 1 });
    }

    #[test]
    fn normalize_all_stops_at_bad_row() {
        let good = native(vec![
            CellValue::String("n1".into()),
            CellValue::Long(1),
            CellValue::Real(1.0),
            CellValue::Null,
        ]);
        let bad = native(vec![]);

        assert_eq!(normalize_all(std::slice::from_ref(&good)).unwrap().len(), 1);
        assert!(normalize_all(&[good, bad]).is_err());
    }
}
