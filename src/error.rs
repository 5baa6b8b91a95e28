//! Error types for the cache server
//!
//! Unified error handling using thiserror. Absence is not represented here:
//! engine reads return `Option` and `ttl` uses its sentinel values. The
//! `NotFound` variant exists for the HTTP layer, which presents a scalar-get
//! miss as 404.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == KV Error Enum ==
/// Unified error type for the engine and its HTTP surface.
#[derive(Error, Debug)]
pub enum KvError {
    /// Key not found (HTTP presentation of an engine-level absence)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key exceeds the keyspace bound
    #[error("Key exceeds maximum length of {0} bytes")]
    KeyTooLong(usize),

    /// Serialized value exceeds the per-entry bound
    #[error("Value exceeds maximum size of {0} bytes")]
    ValueTooLarge(usize),

    /// Malformed request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The public surface is turned off by configuration
    #[error("KV store is disabled")]
    Disabled,

    /// The durable tier failed on a read path
    #[error("Backend error: {0}")]
    Backend(#[source] anyhow::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for KvError {
    fn into_response(self) -> Response {
        let status = match &self {
            KvError::NotFound(_) => StatusCode::NOT_FOUND,
            KvError::KeyTooLong(_) | KvError::ValueTooLarge(_) | KvError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            KvError::Disabled => StatusCode::SERVICE_UNAVAILABLE,
            KvError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, KvError>;

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let cases = vec![
            (KvError::NotFound("k".into()), StatusCode::NOT_FOUND),
            (KvError::KeyTooLong(256), StatusCode::BAD_REQUEST),
            (KvError::ValueTooLarge(1024), StatusCode::BAD_REQUEST),
            (
                KvError::InvalidRequest("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (KvError::Disabled, StatusCode::SERVICE_UNAVAILABLE),
            (
                KvError::Backend(anyhow::anyhow!("down")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_error_messages_name_the_bound() {
        assert!(KvError::KeyTooLong(256).to_string().contains("256"));
        assert!(KvError::ValueTooLarge(1048576).to_string().contains("1048576"));
    }
}
