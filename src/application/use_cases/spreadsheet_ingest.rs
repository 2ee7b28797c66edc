use crate::application::use_cases::normalizer::normalize;
use crate::domain::error::Result;
use crate::domain::table::Table;
use crate::infrastructure::spreadsheet::{ensure_spreadsheet_file_name, load_table};

/// Upload to normalized table: extension check, parse, zero-fill.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetIngestUseCase;

impl SpreadsheetIngestUseCase {
    pub fn new() -> Self {
        Self
    }

    /// The file name is checked before any byte is parsed.
    pub fn execute(&self, file_name: &str, bytes: &[u8]) -> Result<Table> {
        ensure_spreadsheet_file_name(file_name)?;

        let mut table = load_table(bytes)?;
        normalize(&mut table);

        tracing::info!(
            file = file_name,
            rows = table.num_rows(),
            columns = table.num_columns(),
            "Spreadsheet loaded"
        );
        Ok(table)
    }
}
