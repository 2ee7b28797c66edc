pub mod use_cases;

pub use use_cases::plot_sweep::PlotSweepUseCase;
pub use use_cases::record_serializer::{to_records, Record};
pub use use_cases::spreadsheet_ingest::SpreadsheetIngestUseCase;
