//! Generation error types.
//!
//! All backend operations return [`Result<T>`] with [`GenerationError`].

use thiserror::Error;

/// Errors raised while producing a reply.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GenerationError {
    /// The reply service answered with a non-success status.
    #[error("API responded {status}")]
    BackendHttp {
        /// HTTP status code.
        status: u16,
    },

    /// The model endpoint rejected the credential (HTTP 401/403).
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// The model endpoint refused for rate or billing reasons.
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Any other model endpoint failure.
    #[error("backend error: {message}")]
    Backend {
        /// Status and provider message.
        message: String,
    },

    /// A required setting (URL, API key) is absent.
    #[error("not configured: {0}")]
    ConfigMissing(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Transport-level failure from reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerationError {
    /// Classify a reqwest error, separating timeouts from other failures.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerationError::Timeout
        } else {
            GenerationError::Http(err)
        }
    }
}

/// A convenience type alias for generation operations.
pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_backend_http() {
        let err = GenerationError::BackendHttp { status: 500 };
        assert_eq!(err.to_string(), "API responded 500");
    }

    #[test]
    fn display_invalid_credential() {
        let err = GenerationError::InvalidCredential("Incorrect API key provided".into());
        assert_eq!(err.to_string(), "invalid credential: Incorrect API key provided");
    }

    #[test]
    fn display_quota() {
        let err = GenerationError::QuotaExceeded("insufficient_quota".into());
        assert_eq!(err.to_string(), "quota exceeded: insufficient_quota");
    }

    #[test]
    fn display_config_missing() {
        let err = GenerationError::ConfigMissing("enter the reply service URL".into());
        assert_eq!(err.to_string(), "not configured: enter the reply service URL");
    }

    #[test]
    fn display_timeout() {
        assert_eq!(GenerationError::Timeout.to_string(), "request timed out");
    }

    #[test]
    fn json_error_from_conversion() {
        let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: GenerationError = serde_err.into();
        assert!(err.to_string().starts_with("json error:"));
    }
}
