pub mod artifact_store;
pub mod config;
pub mod render;
pub mod spreadsheet;
