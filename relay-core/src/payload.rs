//! Canonical payloads exchanged between the relay services.
//!
//! Every wire surface (HTTP, framed RPC, gRPC, queue) carries these same
//! shapes, so a downstream can change transports without re-encoding.

use serde::{Deserialize, Serialize};

/// Credentials submitted for authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    /// Account email address.
    pub email: String,
    /// Plaintext password to verify.
    pub password: String,
}

/// A single log event: a short source name plus free-form data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPayload {
    /// Originating component or category.
    pub name: String,
    /// Event body.
    pub data: String,
}

/// An outbound mail request relayed to the mail collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailPayload {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub message: String,
}

/// Uniform response body returned by every HTTP surface in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// True when the request failed; `message` then explains why.
    pub error: bool,
    /// Human-readable outcome description.
    pub message: String,
    /// Optional structured payload accompanying a success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ResponseEnvelope {
    /// A success envelope with no data attached.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: None,
        }
    }

    /// A success envelope carrying structured data.
    pub fn with_data(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: Some(data),
        }
    }

    /// A failure envelope.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_omits_absent_data() {
        let body = serde_json::to_string(&ResponseEnvelope::ok("logged")).unwrap();
        assert_eq!(body, r#"{"error":false,"message":"logged"}"#);
    }

    #[test]
    fn envelope_round_trips_with_data() {
        let envelope = ResponseEnvelope::with_data(
            "Authenticated!",
            serde_json::json!({"email": "admin@example.com"}),
        );
        let decoded: ResponseEnvelope =
            serde_json::from_str(&serde_json::to_string(&envelope).unwrap()).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn failure_envelope_sets_the_error_flag() {
        let envelope = ResponseEnvelope::fail("invalid credentials");
        assert!(envelope.error);
        assert_eq!(envelope.message, "invalid credentials");
    }
}
