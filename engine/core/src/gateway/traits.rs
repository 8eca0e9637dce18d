//! Gateway Traits
//!
//! Trait seam for the remote text-generation service. This abstraction lets
//! the Director run against the production HTTP endpoint, a local stub, or a
//! scripted mock in tests without changing engine logic.
//!
//! # Wire Contract
//!
//! - Request: `{ "prompt": string }`
//! - Success: `{ "text": string }` with a 2xx status
//! - Error: `{ "error": string }` with a non-2xx status
//!
//! Transport and parse failures are treated identically to error responses
//! for UI purposes - every [`GatewayError`] collapses into the same `Failed`
//! lifecycle state. The variants exist so the log sink records what actually
//! happened.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Wire request sent to the generation service.
#[derive(Clone, Debug, Serialize)]
pub struct PromptRequest {
    /// The user's prompt, forwarded verbatim.
    pub prompt: String,
}

/// Wire reply from the generation service.
#[derive(Clone, Debug, Deserialize)]
pub struct PromptReply {
    /// The generated response text.
    pub text: String,
}

/// Failures crossing the gateway boundary.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The gateway is not usable as configured (e.g. a required credential
    /// is missing). The service-side equivalent is a 5xx.
    #[error("gateway configuration error: {0}")]
    Config(String),

    /// The service answered with a non-2xx status.
    #[error("gateway returned {status}: {detail}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The `error` field of the reply body, or the raw body.
        detail: String,
    },

    /// The request never completed (DNS, connect, timeout).
    #[error("gateway transport error: {0}")]
    Transport(String),

    /// A 2xx reply that does not carry the expected `text` field.
    #[error("malformed gateway reply: {0}")]
    MalformedReply(String),
}

/// A remote text-generation service.
///
/// Implementations handle provider-specific details (endpoints, auth). One
/// call to [`ResponseGateway::generate`] is one single-turn exchange; there
/// is no conversation context.
#[async_trait]
pub trait ResponseGateway: Send + Sync {
    /// Gateway name for logs.
    fn name(&self) -> &str;

    /// Whether the service looks reachable.
    async fn health_check(&self) -> bool;

    /// Forward a prompt and wait for the reply text.
    async fn generate(&self, prompt: &str) -> Result<PromptReply, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_to_wire_shape() {
        let request = PromptRequest {
            prompt: "hello".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({ "prompt": "hello" }));
    }

    #[test]
    fn test_reply_deserializes_from_wire_shape() {
        let reply: PromptReply = serde_json::from_str(r#"{ "text": "hi there" }"#).unwrap();
        assert_eq!(reply.text, "hi there");
    }

    #[test]
    fn test_reply_missing_text_field_is_an_error() {
        let parsed = serde_json::from_str::<PromptReply>(r#"{ "error": "boom" }"#);
        assert!(parsed.is_err());
    }
}
