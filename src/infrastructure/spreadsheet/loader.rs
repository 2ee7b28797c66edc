// ============================================================
// WORKBOOK LOADER
// ============================================================
// Read the first worksheet of an .xls/.xlsx upload with calamine

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use crate::domain::error::{AppError, Result};
use crate::domain::table::{CellValue, Column, Table};

/// Accepted upload file name suffixes
pub const SPREADSHEET_EXTENSIONS: [&str; 2] = [".xls", ".xlsx"];

/// Reject uploads whose file name does not carry a spreadsheet extension.
/// Only the name is checked; the content is validated by parsing.
pub fn ensure_spreadsheet_file_name(file_name: &str) -> Result<()> {
    let lower = file_name.trim().to_ascii_lowercase();
    if SPREADSHEET_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        Ok(())
    } else {
        Err(AppError::InvalidFileFormat)
    }
}

/// Parse workbook bytes into a table.
///
/// The first row of the first worksheet is the header row; every following
/// row is a data row.
pub fn load_table(bytes: &[u8]) -> Result<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| AppError::ParseError(format!("Failed to open workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::ParseError("No worksheet found".to_string()))?
        .map_err(|e| AppError::ParseError(format!("Failed to read worksheet: {}", e)))?;

    table_from_range(&range)
}

fn table_from_range(range: &Range<Data>) -> Result<Table> {
    let mut rows = range.rows();
    let header = match rows.next() {
        Some(header) => header,
        None => return Table::new(Vec::new()),
    };

    let names = header_names(header);
    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];

    for row in rows {
        for (idx, values) in columns.iter_mut().enumerate() {
            values.push(row.get(idx).map(cell_value).unwrap_or(CellValue::Missing));
        }
    }

    Table::new(
        names
            .into_iter()
            .zip(columns)
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    )
}

/// Stringify header cells. Blank headers become `Unnamed: {idx}` and
/// repeated names get a `.{n}` suffix.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(header.len());

    for (idx, cell) in header.iter().enumerate() {
        let base = match cell {
            Data::Empty => format!("Unnamed: {}", idx),
            Data::String(s) if s.trim().is_empty() => format!("Unnamed: {}", idx),
            other => other.to_string(),
        };

        let mut name = base.clone();
        while let Some(count) = seen.get_mut(&name) {
            *count += 1;
            name = format!("{}.{}", base, count);
        }
        seen.insert(name.clone(), 0);
        names.push(name);
    }

    names
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Missing,
        Data::Int(v) => CellValue::Int(*v),
        Data::Float(v) => CellValue::Float(*v),
        Data::Bool(v) => CellValue::Bool(*v),
        Data::String(s) => CellValue::Text(s.clone()),
        // Dates, durations and error cells keep their display form
        other => CellValue::Text(other.to_string()),
    }
}
