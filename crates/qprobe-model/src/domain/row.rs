use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("row has {columns} column names but {values} values")]
    LengthMismatch { columns: usize, values: usize },
}

/// Normalized result row: parallel sequences of column names and string values.
///
/// `columns[i]` names `values[i]`; the constructor guarantees equal lengths.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<String>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<String>) -> Result<Self, RowError> {
        if columns.len() != values.len() {
            return Err(RowError::LengthMismatch {
                columns: columns.len(),
                values: values.len(),
            });
        }
        Ok(Self { columns, values })
    }

    /// Build a row from `(name, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let (columns, values) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate `(name, value)` pairs in column order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &str)> + ExactSizeIterator {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    /// Value of the named column. With duplicate names the last one wins.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.iter()
            .rev()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }
}
