//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use serde_json::{json, Value};
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for caller-facing failures.
///
/// Network failures never surface through this type from `apply`; they are
/// stored on the affected record or collection instead.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Record identifier could not be built
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// A record-addressed operation was issued without an id
    #[error("Missing id for {0}")]
    MissingId(String),

    /// Explicit configuration was rejected
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

// == Api Error Enum ==
/// Failures reported by an [`crate::api::ApiClient`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Server answered with a non-success status
    #[error("HTTP {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Parsed error body, if the server sent one
        body: Option<Value>,
    },

    /// Request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Client is not configured for this method
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),
}

impl ApiError {
    /// Converts the failure into the JSON value stored in the cache.
    ///
    /// A parsed server error body is stored verbatim; everything else becomes
    /// `{ "message": ... }`.
    pub fn to_value(&self) -> Value {
        match self {
            ApiError::Status {
                body: Some(body), ..
            } => body.clone(),
            ApiError::Status { status, body: None } => json!({
                "message": self.to_string(),
                "status": status,
            }),
            other => json!({ "message": other.to_string() }),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_keeps_server_body() {
        let err = ApiError::Status {
            status: 422,
            body: Some(json!({"name": ["is required"]})),
        };
        assert_eq!(err.to_value(), json!({"name": ["is required"]}));
    }

    #[test]
    fn test_status_error_without_body() {
        let err = ApiError::Status {
            status: 500,
            body: None,
        };
        let value = err.to_value();
        assert_eq!(value["status"], 500);
        assert_eq!(value["message"], "HTTP 500");
    }

    #[test]
    fn test_network_error_value() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(
            err.to_value(),
            json!({"message": "Network error: connection refused"})
        );
    }
}
