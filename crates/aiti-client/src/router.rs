//! Dispatches each persona to the source that answers it.

use aiti_core::{ModelTag, OllamaConfig};
use async_trait::async_trait;
use tracing::debug;

use crate::canned::CannedSource;
use crate::error::GenerateError;
use crate::ollama::OllamaClient;
use crate::source::ResponseSource;

/// Default response source: canned personas answer locally, Ollama remotely.
#[derive(Debug, Clone, Default)]
pub struct ModelRouter {
    canned: CannedSource,
    ollama: OllamaClient,
}

impl ModelRouter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResponseSource for ModelRouter {
    async fn generate(
        &self,
        model: ModelTag,
        prompt: &str,
        config: &OllamaConfig,
    ) -> Result<String, GenerateError> {
        debug!(model = %model, remote = model.is_remote(), "Routing generation");
        if model.is_remote() {
            self.ollama.generate(model, prompt, config).await
        } else {
            self.canned.generate(model, prompt, config).await
        }
    }

    async fn health(&self, config: &OllamaConfig) -> Result<bool, GenerateError> {
        self.ollama.health(config).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn test_routes_by_persona() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "remote" })))
            .expect(1)
            .mount(&server)
            .await;

        let config = OllamaConfig {
            base_url: server.uri(),
            ..OllamaConfig::default()
        };
        let router = ModelRouter::new();

        let local = router.generate(ModelTag::AitiPro, "q", &config).await.unwrap();
        assert_eq!(local, CannedSource::reply(ModelTag::AitiPro, "q").unwrap());

        let remote = router.generate(ModelTag::Ollama, "q", &config).await.unwrap();
        assert_eq!(remote, "remote");
    }

    #[tokio::test]
    async fn test_health_reaches_ollama() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let config = OllamaConfig {
            base_url: server.uri(),
            ..OllamaConfig::default()
        };
        assert!(!ModelRouter::new().health(&config).await.unwrap());
    }
}
