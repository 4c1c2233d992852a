//! API response body types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured error body returned on every failure path
///
/// Internal exception detail is logged server-side and never echoed to the
/// caller; `message` carries only the user-visible description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Plain acknowledgement body for flows that carry their payload elsewhere
/// (e.g. in cookies)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse::new("CREDENTIALS_INVALID", "Invalid authentication credentials");
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("CREDENTIALS_INVALID"));
        assert!(json.contains("Invalid authentication credentials"));
    }

    #[test]
    fn test_message_response_serialization() {
        let response = MessageResponse::new("login success");
        let json = serde_json::to_string(&response).unwrap();

        assert_eq!(json, r#"{"message":"login success"}"#);
    }
}
