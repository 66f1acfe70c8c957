//! The response source abstraction.

use aiti_core::{ModelTag, OllamaConfig};
use async_trait::async_trait;

use crate::error::GenerateError;

/// Produces the complete assistant text for a prompt.
#[async_trait]
pub trait ResponseSource: Send + Sync {
    /// Generate a reply for `prompt` using the persona `model`.
    ///
    /// `config` carries the remote endpoint settings; canned sources ignore it.
    async fn generate(
        &self,
        model: ModelTag,
        prompt: &str,
        config: &OllamaConfig,
    ) -> Result<String, GenerateError>;

    /// Check whether the remote endpoint answers. Local sources are always up.
    async fn health(&self, _config: &OllamaConfig) -> Result<bool, GenerateError> {
        Ok(true)
    }
}
