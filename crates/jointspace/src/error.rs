//! Error types for the jointspace crate.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// HTTP method of a failed request, kept for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Returns the method name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type covering every failure of a TV request or pairing attempt.
#[derive(Debug, Error)]
pub enum TvError {
    // Transport errors
    /// The HTTP client could not be configured.
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),

    /// The TV could not be reached, or answered with a non-2xx status.
    #[error("TV communication failed: {method} {path}: {reason}")]
    Transport {
        /// Method of the failed request.
        method: HttpMethod,
        /// Request path, as given by the caller.
        path: String,
        /// HTTP status, absent for connection-level failures.
        status: Option<u16>,
        /// Human readable cause.
        reason: String,
    },

    /// The TV rejected the credentials (HTTP 401).
    #[error("unauthorized: {method} {path} (missing or invalid credentials)")]
    Unauthorized {
        /// Method of the rejected request.
        method: HttpMethod,
        /// API path of the rejected request.
        path: String,
    },

    // API errors
    /// The TV answered with JSON that does not match the expected shape.
    #[error("malformed response to {method} {path}: {reason} (payload: {payload})")]
    MalformedResponse {
        /// Method of the request.
        method: HttpMethod,
        /// API path of the request.
        path: String,
        /// The raw payload returned by the TV (`null` for an empty body).
        payload: Value,
        /// Validation failure description.
        reason: String,
    },

    /// A request payload could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    // Pairing errors
    /// The TV refused a pairing step.
    #[error("pairing error: {error_id} {error_text}")]
    Pairing {
        /// Error identifier reported by the TV, e.g. `INVALID_PIN`.
        error_id: String,
        /// Error description reported by the TV.
        error_text: String,
    },

    /// The PIN was not supplied before the TV's pairing session expired.
    #[error("pairing timed out: no PIN entered within {timeout_secs} seconds")]
    PinTimeout {
        /// Session timeout announced by the TV.
        timeout_secs: u64,
    },

    /// The PIN provider failed to produce a PIN.
    #[error("PIN unavailable: {0}")]
    PinUnavailable(String),
}

impl TvError {
    /// Creates a pairing error from the TV's own error identifiers.
    pub fn pairing(error_id: impl Into<String>, error_text: impl Into<String>) -> Self {
        TvError::Pairing {
            error_id: error_id.into(),
            error_text: error_text.into(),
        }
    }

    /// Returns the HTTP status code carried by a transport error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TvError::Transport { status, .. } => *status,
            TvError::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// Returns `true` if the TV rejected the request's credentials.
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }
}

/// Result type alias for TV operations.
pub type Result<T> = std::result::Result<T, TvError>;

impl From<serde_json::Error> for TvError {
    fn from(err: serde_json::Error) -> Self {
        TvError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        let err = TvError::Transport {
            method: HttpMethod::Get,
            path: "6/powerstate".to_string(),
            status: Some(404),
            reason: "HTTP 404 Not Found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "TV communication failed: GET 6/powerstate: HTTP 404 Not Found"
        );
        assert_eq!(err.status_code(), Some(404));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_connection_error_has_no_status() {
        let err = TvError::Transport {
            method: HttpMethod::Post,
            path: "6/pair/request".to_string(),
            status: None,
            reason: "connection refused".to_string(),
        };
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_unauthorized_error_display() {
        let err = TvError::Unauthorized {
            method: HttpMethod::Post,
            path: "audio/volume".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unauthorized: POST audio/volume (missing or invalid credentials)"
        );
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_malformed_response_display_includes_payload() {
        let err = TvError::MalformedResponse {
            method: HttpMethod::Get,
            path: "powerstate".to_string(),
            payload: serde_json::json!({"power": "On"}),
            reason: "missing field `powerstate`".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("GET powerstate"));
        assert!(msg.contains(r#"{"power":"On"}"#));
    }

    #[test]
    fn test_pairing_error_display() {
        let err = TvError::pairing("CONCURRENT_PAIRING", "Another pairing is in process");
        assert_eq!(
            err.to_string(),
            "pairing error: CONCURRENT_PAIRING Another pairing is in process"
        );
    }

    #[test]
    fn test_pin_timeout_display() {
        let err = TvError::PinTimeout { timeout_secs: 60 };
        assert_eq!(
            err.to_string(),
            "pairing timed out: no PIN entered within 60 seconds"
        );
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: TvError = json_err.into();
        assert!(matches!(err, TvError::Serialization(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TvError>();
    }
}
