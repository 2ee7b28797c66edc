// ============================================================
// TABLE DOMAIN LAYER
// ============================================================
// In-memory columnar representation of an uploaded worksheet
// No I/O, no async

mod cell_value;
mod column;

pub use cell_value::CellValue;
pub use column::{Column, ColumnKind};

use crate::domain::error::{AppError, Result};

/// Ordered set of equally long columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, rejecting columns of unequal length
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(AppError::ValidationError(format!(
                    "Column '{}' has {} values, expected {}",
                    bad.name(),
                    bad.len(),
                    expected
                )));
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    /// Columns whose declared kind is numeric, in table order
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.kind() == ColumnKind::Numeric)
            .collect()
    }

    /// Cells of one row paired with their column names
    pub fn row(&self, index: usize) -> impl Iterator<Item = (&str, &CellValue)> {
        self.columns
            .iter()
            .filter_map(move |c| c.values().get(index).map(|v| (c.name(), v)))
    }

    /// Every cell with its column kind, for in-place rewrites.
    /// Cells can be replaced but columns cannot grow or shrink.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = (ColumnKind, &mut CellValue)> {
        self.columns.iter_mut().flat_map(|c| {
            let kind = c.kind();
            c.values_mut().iter_mut().map(move |v| (kind, v))
        })
    }
}
