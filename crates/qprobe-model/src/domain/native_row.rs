use serde::{Deserialize, Serialize};

use crate::{CellValue, ColumnType};

/// Column metadata attached to a native row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(default)]
    pub column_type: ColumnType,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Row in the shape the backend returns it: ordered descriptors plus ordered typed values.
///
/// Descriptors and values correspond positionally. Nothing here enforces equal lengths;
/// that check happens during normalization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NativeRow {
    pub columns: Vec<ColumnDescriptor>,
    pub values: Vec<CellValue>,
}

impl NativeRow {
    pub fn new(columns: Vec<ColumnDescriptor>, values: Vec<CellValue>) -> Self {
        Self { columns, values }
    }
}
