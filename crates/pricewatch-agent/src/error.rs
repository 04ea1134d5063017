//! Error types for the price alert agent

use thiserror::Error;

/// Errors raised by the alert agent and its collaborators
#[derive(Debug, Error)]
pub enum WatchError {
    /// Price source could not provide a quote
    #[error("Price source error: {0}")]
    PriceSource(String),

    /// News source request failed
    #[error("News source error: {0}")]
    NewsSource(String),

    /// Analysis request failed
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Notification delivery failed
    #[error("Notification error: {0}")]
    Notification(String),

    /// Credentials were rejected by an external service
    #[error("Authentication failed for {service}")]
    AuthenticationFailed {
        service: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Price log could not be written
    #[error("Price log error: {0}")]
    LogIo(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, WatchError>;

impl From<pricewatch_llm::LLMError> for WatchError {
    fn from(err: pricewatch_llm::LLMError) -> Self {
        match err {
            pricewatch_llm::LLMError::AuthenticationFailed => WatchError::AuthenticationFailed {
                service: "llm".to_string(),
            },
            other => WatchError::Analysis(other.to_string()),
        }
    }
}
