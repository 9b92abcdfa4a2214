//! Error types for proxtrace
//!
//! Only fatal conditions surface here. Malformed rows and tokens are
//! skip-and-continue inside ingestion and never become errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a batch run
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid config file: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("data root is not a directory: {}", .0.display())]
    MissingDataRoot(PathBuf),
}
