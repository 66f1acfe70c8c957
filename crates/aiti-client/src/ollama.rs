//! HTTP client for the Ollama generation endpoint.

use aiti_core::{ModelTag, OllamaConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::GenerateError;
use crate::source::ResponseSource;

/// Request body for `POST /api/generate`.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// The part of the response body we read.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// HTTP client for a non-streaming Ollama generation call.
#[derive(Debug, Clone, Default)]
pub struct OllamaClient {
    inner: reqwest::Client,
}

impl OllamaClient {
    /// Create a new client.
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Check if the Ollama server answers.
    pub async fn health(&self, config: &OllamaConfig) -> Result<bool, GenerateError> {
        let url = endpoint(&config.base_url, "/api/tags");
        debug!(url = %url, "Checking health");

        let response = self.inner.get(&url).timeout(config.timeout).send().await?;
        Ok(response.status().is_success())
    }

    /// Issue one generation request and return the text field.
    pub async fn generate_text(
        &self,
        prompt: &str,
        config: &OllamaConfig,
    ) -> Result<String, GenerateError> {
        let url = endpoint(&config.base_url, "/api/generate");
        debug!(url = %url, model = %config.model, "POST request");

        let body = GenerateRequest {
            model: &config.model,
            prompt,
            stream: false,
        };

        let response = self
            .inner
            .post(&url)
            .timeout(config.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Generation request failed");
            return Err(GenerateError::UpstreamUnavailable(format!(
                "HTTP {}: {}",
                status, url
            )));
        }

        let bytes = response.bytes().await?;
        let parsed: GenerateResponse = serde_json::from_slice(&bytes)
            .map_err(|e| GenerateError::UpstreamProtocolError(e.to_string()))?;

        debug!(text_len = parsed.response.len(), "Generation response received");
        Ok(parsed.response)
    }
}

#[async_trait]
impl ResponseSource for OllamaClient {
    async fn generate(
        &self,
        _model: ModelTag,
        prompt: &str,
        config: &OllamaConfig,
    ) -> Result<String, GenerateError> {
        self.generate_text(prompt, config).await
    }

    async fn health(&self, config: &OllamaConfig) -> Result<bool, GenerateError> {
        OllamaClient::health(self, config).await
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config_for(server: &MockServer) -> OllamaConfig {
        OllamaConfig {
            base_url: format!("{}/", server.uri()),
            model: "llama3".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_generate_sends_non_streaming_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_json(json!({
                "model": "llama3",
                "prompt": "hello",
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3",
                "response": "Hi there!",
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = OllamaClient::new()
            .generate_text("hello", &config_for(&server))
            .await
            .unwrap();
        assert_eq!(text, "Hi there!");
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = OllamaClient::new()
            .generate_text("hello", &config_for(&server))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_missing_field_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "done": true })))
            .mount(&server)
            .await;

        let err = OllamaClient::new()
            .generate_text("hello", &config_for(&server))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::UpstreamProtocolError(_)));
    }

    #[tokio::test]
    async fn test_wrong_type_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": 42 })))
            .mount(&server)
            .await;

        let err = OllamaClient::new()
            .generate_text("hello", &config_for(&server))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::UpstreamProtocolError(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = OllamaClient::new()
            .generate_text("hello", &config_for(&server))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::UpstreamProtocolError(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "response": "late" }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.timeout = Duration::from_millis(50);

        let err = OllamaClient::new()
            .generate_text("hello", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_is_unavailable() {
        let config = OllamaConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..OllamaConfig::default()
        };
        let err = OllamaClient::new()
            .generate_text("hello", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": [] })))
            .mount(&server)
            .await;

        assert!(OllamaClient::new().health(&config_for(&server)).await.unwrap());
    }
}
