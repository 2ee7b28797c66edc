use serde::Serialize;

use super::CellValue;

/// Declared value kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Other,
}

/// A named column of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    values: Vec<CellValue>,
}

impl Column {
    /// Create a column, inferring its kind from the values.
    ///
    /// A column is numeric when every non-empty cell holds a number. A column
    /// with no values at all counts as numeric.
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let numeric = values
            .iter()
            .all(|v| v.is_number() || matches!(v, CellValue::Missing));
        let kind = if numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Other
        };
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    pub(super) fn values_mut(&mut self) -> &mut [CellValue] {
        &mut self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Numbers of the column in row order; non-numeric cells read as 0
    pub fn numbers(&self) -> Vec<f64> {
        self.values
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0))
            .collect()
    }
}
