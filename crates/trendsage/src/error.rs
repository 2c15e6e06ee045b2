//! Error types for the TrendSage service.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::time::Duration;

/// Errors from the provider (document search, LLM) layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Rate limited by the provider (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// Credential rejected (401/403 response)
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized {
        /// HTTP status code
        status: u16,
        /// Error message from the provider
        message: String,
    },

    /// Resource not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Invalid request parameters (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from the provider
        message: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// LLM reply was empty, not JSON, or failed field validation
    #[error("Invalid completion: {reason}")]
    InvalidCompletion {
        /// What was wrong with the reply
        reason: String,
    },

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Create an invalid completion error.
    #[must_use]
    pub fn invalid_completion(reason: impl Into<String>) -> Self {
        Self::InvalidCompletion { reason: reason.into() }
    }

    /// Map a transport error, separating timeouts from other failures.
    #[must_use]
    pub fn transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() { Self::Timeout(timeout) } else { Self::Http(err) }
    }

    /// Get the retry-after duration if this is a rate limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

/// Errors from request handling.
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ClientError),

    /// Input validation failed
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Short machine-facing label (e.g. "Query too short")
        error: String,
        /// Human-readable message
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal logic error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(
        field: impl Into<String>,
        error: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation { field: field.into(), error: error.into(), message: message.into() }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if the caller sent something invalid.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Convert to a user-friendly error message for the HTTP response.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Provider(ClientError::RateLimited { retry_after }) => {
                format!(
                    "The research provider is rate limiting requests. Please wait {:?} before retrying.",
                    retry_after
                )
            }
            Self::Provider(ClientError::Timeout(after)) => {
                format!("The research provider did not respond within {after:?}.")
            }
            Self::Provider(ClientError::InvalidCompletion { .. }) => {
                "The language model returned an unusable analysis. Please try again.".to_string()
            }
            Self::Validation { message, .. } => message.clone(),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for provider operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_retry_after() {
        let err = ClientError::rate_limited(60);
        assert_eq!(err.retry_after(), Some(Duration::from_secs(60)));

        let err = ClientError::not_found("papers");
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn test_validation_user_message() {
        let err = ServiceError::validation("query", "Query too short", "at least 2 characters");
        assert!(err.is_client_error());
        assert_eq!(err.to_user_message(), "at least 2 characters");
    }

    #[test]
    fn test_invalid_completion_is_provider_error() {
        let err: ServiceError = ClientError::invalid_completion("missing overview").into();
        assert!(!err.is_client_error());
        assert!(matches!(err, ServiceError::Provider(ClientError::InvalidCompletion { .. })));
        assert!(err.to_string().contains("missing overview"));
    }
}
