// ============================================================
// SPREADSHEET INFRASTRUCTURE LAYER
// ============================================================
// Upload name checks and workbook parsing into a Table

mod loader;

pub use loader::{ensure_spreadsheet_file_name, load_table, SPREADSHEET_EXTENSIONS};
