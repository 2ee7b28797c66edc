pub mod normalizer;
pub mod plot_sweep;
pub mod record_serializer;
pub mod spreadsheet_ingest;
