use std::time::Duration;

use thiserror::Error;

/// Application-wide error types for Sitelens.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing credential or malformed configuration value.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Provider name is not in the compiled registry.
    #[error("Unknown provider: {name}. Available providers: {available}")]
    UnknownProvider { name: String, available: String },

    /// Analysis type is not one of the registered client types.
    #[error("Unknown client type: {name}. Available types: {available}")]
    UnknownClientType { name: String, available: String },

    /// HTTP request failed (fetching a page or calling a provider).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Provider API call returned an error.
    #[error("LLM error (HTTP {status_code}): {message}")]
    LlmError { message: String, status_code: u16 },

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Provider rejected the request with HTTP 429.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The caller cancelled the analysis before it finished.
    #[error("Analysis cancelled")]
    Cancelled,

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Timeout error for a limit of `after`, rounded up to whole seconds.
    pub fn timed_out(after: Duration) -> Self {
        let secs = after.as_secs() + u64::from(after.subsec_nanos() > 0);
        AppError::Timeout(secs)
    }

    /// Returns true for errors raised while building a client, before any I/O.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            AppError::ConfigError(_)
                | AppError::UnknownProvider { .. }
                | AppError::UnknownClientType { .. }
        )
    }

    /// Returns true if this error is transient.
    ///
    /// Nothing in Sitelens retries automatically; callers may use this to
    /// phrase a "try again" hint.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkError(_) | AppError::Timeout(_) | AppError::RateLimitExceeded => true,
            AppError::LlmError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}
