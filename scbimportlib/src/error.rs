//! Единый тип ошибок публичного API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("unknown credit/debit marker: {0:?}")]
    UnknownCrDr(String),

    #[error("value {value:?} in column {field:?} does not match the capture pattern")]
    Capture { field: String, value: String },

    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("no row labelled {0:?}")]
    MissingRow(String),

    #[error("no importer recognises {0}")]
    Unrecognized(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ImportError>;
