use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaxiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid field policy: {0}")]
    InvalidFieldPolicy(String),

    #[error("Input directory not found: {}", .0.display())]
    MissingInput(PathBuf),
}

pub type Result<T> = std::result::Result<T, TaxiError>;
