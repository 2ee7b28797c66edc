use std::fmt;

#[derive(Debug)]
pub enum AppError {
    InvalidFileFormat,
    ParseError(String),
    NoNumericColumns,
    RenderError(String),
    NotFound(String),
    ValidationError(String),
    IoError(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidFileFormat => {
                write!(f, "Invalid file format. Only Excel files are allowed.")
            }
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::NoNumericColumns => write!(f, "No numeric columns found to plot."),
            AppError::RenderError(msg) => write!(f, "Render error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
