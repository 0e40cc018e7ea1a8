//! CLI error types

use pricer_core::types::DateError;
use pricer_optimiser::credit::CreditError;
use thiserror::Error;

/// CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Market data error at row {row}: {message}")]
    MarketData { row: usize, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date error: {0}")]
    Date(#[from] DateError),

    #[error("Credit calibration error: {0}")]
    Credit(#[from] CreditError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a market data error for a 1-based data row.
    pub fn market_data(row: usize, message: impl Into<String>) -> Self {
        Self::MarketData {
            row,
            message: message.into(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
