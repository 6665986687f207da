use qprobe_model::{CellValue, ColumnDescriptor, ColumnType, NativeRow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::KustoError;

#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub db: &'a str,
    pub csl: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub tables: Vec<Table>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Table {
    #[serde(default)]
    pub table_name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Column {
    pub column_name: String,
    #[serde(default)]
    pub column_type: Option<ColumnType>,
    #[serde(default)]
    pub data_type: Option<String>,
}

impl Column {
    /// Kusto column type, falling back to the CLR data type name for older payloads.
    fn kind(&self) -> ColumnType {
        if let Some(t) = self.column_type {
            return t;
        }
        match self.data_type.as_deref() {
            Some("Boolean" | "SByte") => ColumnType::Bool,
            Some("Int32") => ColumnType::Int,
            Some("Int64") => ColumnType::Long,
            Some("Double" | "Single") => ColumnType::Real,
            Some("Decimal" | "SqlDecimal") => ColumnType::Decimal,
            Some("Guid") => ColumnType::Guid,
            Some("DateTime") => ColumnType::Datetime,
            Some("TimeSpan") => ColumnType::Timespan,
            Some("Object") => ColumnType::Dynamic,
            Some("String") | None => ColumnType::String,
            Some(_) => ColumnType::Unknown,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceErrorBody {
    pub error: ServiceError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "@message", default)]
    pub detail: Option<String>,
}

impl ServiceError {
    pub fn text(&self) -> String {
        let msg = self.detail.as_deref().unwrap_or(&self.message);
        if self.code.is_empty() {
            msg.to_string()
        } else {
            format!("{}: {}", self.code, msg)
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<Value>,
}

impl TokenResponse {
    /// Lifetime in seconds; the v1 endpoint sends it as a string.
    pub fn expires_in_secs(&self) -> Option<u64> {
        match self.expires_in.as_ref()? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub error_description: String,
}

/// Decode the primary result table (the first one) into native rows.
pub(crate) fn decode_primary(response: QueryResponse) -> Result<Vec<NativeRow>, KustoError> {
    let Some(table) = response.tables.into_iter().next() else {
        return Ok(Vec::new());
    };
    decode_table(table)
}

fn decode_table(table: Table) -> Result<Vec<NativeRow>, KustoError> {
    let columns: Vec<ColumnDescriptor> = table
        .columns
        .iter()
        .map(|c| ColumnDescriptor::new(c.column_name.clone(), c.kind()))
        .collect();

    let mut out = Vec::with_capacity(table.rows.len());
    for (idx, raw) in table.rows.into_iter().enumerate() {
        if raw.len() != columns.len() {
            return Err(KustoError::InvalidResponse(format!(
                "table {} row {} has {} values, expected {}",
                table.table_name,
                idx,
                raw.len(),
                columns.len()
            )));
        }
        let values = raw
            .into_iter()
            .zip(&columns)
            .map(|(v, c)| decode_cell(v, c))
            .collect::<Result<Vec<_>, _>>()?;
        out.push(NativeRow::new(columns.clone(), values));
    }
    Ok(out)
}

fn decode_cell(value: Value, column: &ColumnDescriptor) -> Result<CellValue, KustoError> {
    let mismatch = |v: &Value| {
        KustoError::InvalidResponse(format!(
            "column {} ({:?}) cannot hold {}",
            column.name, column.column_type, v
        ))
    };

    if value.is_null() {
        return Ok(CellValue::Null);
    }

    let cell = match column.column_type {
        ColumnType::Bool => match &value {
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => CellValue::Bool(n.as_i64().is_some_and(|n| n != 0)),
            other => return Err(mismatch(other)),
        },
        ColumnType::Int => value
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(CellValue::Int)
            .ok_or_else(|| mismatch(&value))?,
        ColumnType::Long => value
            .as_i64()
            .map(CellValue::Long)
            .ok_or_else(|| mismatch(&value))?,
        ColumnType::Real => match &value {
            Value::Number(n) => CellValue::Real(n.as_f64().ok_or_else(|| mismatch(&value))?),
            Value::String(s) => CellValue::Real(parse_special_real(s).ok_or_else(|| mismatch(&value))?),
            other => return Err(mismatch(other)),
        },
        ColumnType::Decimal => CellValue::Decimal(text_of(value)),
        ColumnType::Guid => CellValue::Guid(text_of(value)),
        ColumnType::Datetime => CellValue::DateTime(text_of(value)),
        ColumnType::Timespan => CellValue::Timespan(text_of(value)),
        ColumnType::Dynamic => CellValue::Dynamic(text_of(value)),
        ColumnType::String | ColumnType::Unknown => CellValue::String(text_of(value)),
    };
    Ok(cell)
}

fn parse_special_real(s: &str) -> Option<f64> {
    match s {
        "NaN" => Some(f64::NAN),
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => s.parse().ok(),
    }
}

/// Strings are taken as-is, anything else as compact JSON.
fn text_of(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
