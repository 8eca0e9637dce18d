//! HTTP Gateway Implementation
//!
//! Reference [`ResponseGateway`] that forwards prompts to an HTTP endpoint
//! speaking the `{prompt}` / `{text}` / `{error}` wire contract.

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{GatewayError, PromptReply, PromptRequest, ResponseGateway};
use crate::config::GatewayConfig;

/// Default endpoint when nothing is configured.
const DEFAULT_ENDPOINT: &str = "http://localhost:8787/api/generate";

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// HTTP gateway client.
#[derive(Clone)]
pub struct HttpGateway {
    /// Endpoint the prompt is POSTed to.
    endpoint: String,
    /// Bearer credential, when the endpoint requires one.
    api_key: Option<String>,
    /// Whether the endpoint refuses unauthenticated requests.
    requires_key: bool,
    /// HTTP client.
    http_client: reqwest::Client,
}

impl HttpGateway {
    /// Create a new gateway for `endpoint` with the default timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new gateway with an explicit request timeout.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            requires_key: false,
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Create from [`GatewayConfig`]. The credential still comes from the
    /// `KIOSK_GATEWAY_KEY` environment variable - it never lives in a file.
    #[must_use]
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::with_timeout(config.url.clone(), config.timeout())
            .with_api_key(std::env::var("KIOSK_GATEWAY_KEY").ok())
            .with_required_key(config.requires_key)
    }

    /// Create from environment variables.
    ///
    /// - `KIOSK_GATEWAY_URL`: endpoint (default `http://localhost:8787/api/generate`)
    /// - `KIOSK_GATEWAY_KEY`: bearer credential (optional)
    /// - `KIOSK_GATEWAY_REQUIRES_KEY`: `1`/`true` to refuse running keyless
    #[must_use]
    pub fn from_env() -> Self {
        let endpoint =
            std::env::var("KIOSK_GATEWAY_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let requires_key = std::env::var("KIOSK_GATEWAY_REQUIRES_KEY")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        Self::new(endpoint)
            .with_api_key(std::env::var("KIOSK_GATEWAY_KEY").ok())
            .with_required_key(requires_key)
    }

    /// Set the bearer credential.
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Mark the credential as mandatory. With this set and no key present,
    /// [`ResponseGateway::generate`] fails before any request is sent - the
    /// engine-side mirror of the service's own missing-credential 5xx.
    #[must_use]
    pub fn with_required_key(mut self, requires_key: bool) -> Self {
        self.requires_key = requires_key;
        self
    }

    /// The configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for HttpGateway {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[async_trait]
impl ResponseGateway for HttpGateway {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(&self.endpoint)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok()
    }

    async fn generate(&self, prompt: &str) -> Result<PromptReply, GatewayError> {
        if self.requires_key && self.api_key.is_none() {
            return Err(GatewayError::Config(
                "gateway credential is not set".to_string(),
            ));
        }

        let request = PromptRequest {
            prompt: prompt.to_string(),
        };

        let mut builder = self.http_client.post(&self.endpoint).json(&request);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Prefer the structured error field when the body carries one.
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedReply(e.to_string()))?;

        match data.get("text").and_then(|t| t.as_str()) {
            Some(text) => Ok(PromptReply {
                text: text.to_string(),
            }),
            None => Err(GatewayError::MalformedReply(
                "reply is missing the text field".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_creation() {
        let gateway = HttpGateway::new("http://example.com/api/generate");
        assert_eq!(gateway.endpoint(), "http://example.com/api/generate");
        assert!(!gateway.requires_key);
        assert!(gateway.api_key.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let gateway = HttpGateway::default()
            .with_api_key(Some("secret".to_string()))
            .with_required_key(true);
        assert!(gateway.requires_key);
        assert_eq!(gateway.api_key.as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_missing_required_key_fails_without_network() {
        // Unroutable endpoint: proves the check happens before any request.
        let gateway = HttpGateway::new("http://[::1]:1/api/generate").with_required_key(true);
        let err = gateway.generate("hello").await.unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_transport_error() {
        let gateway =
            HttpGateway::with_timeout("http://127.0.0.1:1/api/generate", Duration::from_millis(200));
        let err = gateway.generate("hello").await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
