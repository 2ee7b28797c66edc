pub mod chart;
pub mod error;

// Uploaded worksheet model
pub mod table;
