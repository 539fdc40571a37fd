use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Stale element: {selector}")]
    StaleElement { selector: String },

    #[error("Element not interactable: {selector}")]
    NotInteractable { selector: String },

    #[error("Timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Parsing error: {message}")]
    Parse { message: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Transient UI races a polling wait may absorb. Everything else is fatal
    /// and must surface to the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::StaleElement { .. } | AppError::NotInteractable { .. }
        )
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
