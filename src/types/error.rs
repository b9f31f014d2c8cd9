//! Error types for lookout

/// Main error type for lookout operations
#[derive(Debug, thiserror::Error)]
pub enum LookoutError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Unexpected API response: {0}")]
    Api(String),

    #[error("Probe error: {0}")]
    Probe(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Implement From conversions for common error types

impl From<reqwest::Error> for LookoutError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<serde_json::Error> for LookoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Api(format!("JSON error: {}", err))
    }
}

/// Result type alias for lookout operations
pub type Result<T> = std::result::Result<T, LookoutError>;
