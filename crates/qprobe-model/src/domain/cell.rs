use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar type of a result column as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Bool,
    Int,
    Long,
    Real,
    Decimal,
    #[default]
    String,
    Guid,
    #[serde(alias = "date")]
    Datetime,
    #[serde(alias = "time")]
    Timespan,
    Dynamic,
    /// Any type this crate does not know about; values are kept as text.
    #[serde(other)]
    Unknown,
}

/// A typed cell of a native result row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Real(f64),
    /// Decimal literal, kept as text to avoid precision loss.
    Decimal(String),
    String(String),
    Guid(String),
    DateTime(String),
    Timespan(String),
    /// Compact JSON text of a dynamic (property bag / array) value.
    Dynamic(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// Canonical string rendering used for label values.
///
/// Null renders as the empty string; non-finite reals use the exposition spelling (`NaN`, `+Inf`, `-Inf`).
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(v) => write!(f, "{v}"),
            CellValue::Int(v) => write!(f, "{v}"),
            CellValue::Long(v) => write!(f, "{v}"),
            CellValue::Real(v) if v.is_nan() => f.write_str("NaN"),
            CellValue::Real(v) if v.is_infinite() => {
                f.write_str(if v.is_sign_positive() { "+Inf" } else { "-Inf" })
            }
            CellValue::Real(v) => write!(f, "{v}"),
            CellValue::Decimal(v)
            | CellValue::String(v)
            | CellValue::Guid(v)
            | CellValue::DateTime(v)
            | CellValue::Timespan(v)
            | CellValue::Dynamic(v) => f.write_str(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_scalars() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
        assert_eq!(CellValue::Int(-7).to_string(), "-7");
        assert_eq!(CellValue::Long(9_000_000_000).to_string(), "9000000000");
        assert_eq!(CellValue::Real(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Real(3.0).to_string(), "3");
        assert_eq!(CellValue::Guid("6f1c".into()).to_string(), "6f1c");
    }

    #[test]
    fn renders_non_finite_reals() {
        assert_eq!(CellValue::Real(f64::NAN).to_string(), "NaN");
        assert_eq!(CellValue::Real(f64::INFINITY).to_string(), "+Inf");
        assert_eq!(CellValue::Real(f64::NEG_INFINITY).to_string(), "-Inf");
    }

    #[test]
    fn column_type_from_wire_names() {
        let types: Vec<ColumnType> =
            serde_json::from_str(r#"["string","long","datetime","date","timespan","real","guid","float32"]"#)
                .unwrap();
        assert_eq!(
            types,
            vec![
                ColumnType::String,
                ColumnType::Long,
                ColumnType::Datetime,
                ColumnType::Datetime,
                ColumnType::Timespan,
                ColumnType::Real,
                ColumnType::Guid,
                ColumnType::Unknown,
            ]
        );
    }
}
