use std::path::PathBuf;
use thiserror::Error;

use crate::scanner::FileFamily;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Low threshold ({low}) must be less than high threshold ({high})")]
    InvalidThresholds { low: f64, high: f64 },

    #[error("No valid {kind} files found in '{}'", dir.display())]
    NoValidFiles { kind: FileFamily, dir: PathBuf },

    #[error("Processing cancelled.")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}
