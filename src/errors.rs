use thiserror::Error;

/// Error type shared by the loan tracker library.
#[derive(Debug, Error)]
pub enum LoanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid date format. Expected YYYY-MM-DD, got: {0}")]
    InvalidDate(String),
    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("Validation failed: {0}")]
    Validation(#[from] crate::forms::FormErrors),
}
