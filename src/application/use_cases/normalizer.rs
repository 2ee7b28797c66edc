// ============================================================
// TABLE NORMALIZER
// ============================================================
// Replace missing and non-finite cells with zero, in place

use crate::domain::table::{CellValue, ColumnKind, Table};

/// Replace every missing, NaN or infinite cell with zero.
///
/// Numeric columns receive `Float(0.0)`; other columns receive `Int(0)`.
/// Column kinds are left as loaded. Running it twice changes nothing.
pub fn normalize(table: &mut Table) {
    for (kind, cell) in table.cells_mut() {
        if !cell.is_missing() {
            continue;
        }
        *cell = match kind {
            ColumnKind::Numeric => CellValue::Float(0.0),
            ColumnKind::Other => CellValue::Int(0),
        };
    }
}
