//! Deterministic canned replies for the local personas.

use aiti_core::{ModelTag, OllamaConfig};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::GenerateError;
use crate::source::ResponseSource;

/// Answers with a fixed template that embeds the prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedSource;

impl CannedSource {
    /// Build the reply text for a persona. The remote persona has no template.
    pub fn reply(model: ModelTag, prompt: &str) -> Option<String> {
        match model {
            ModelTag::Aiti => Some(format!(
                "This is a response from the basic Aiti model. I'm here to help answer your questions about \"{prompt}\". However, I'm limited compared to my pro version."
            )),
            ModelTag::AitiPro => Some(format!(
                "This is an advanced response from Aiti Pro model. I can provide more detailed and nuanced information about \"{prompt}\". With Aiti Pro, you get enhanced capabilities and more accurate responses based on the latest AI research."
            )),
            ModelTag::Ollama => None,
        }
    }
}

#[async_trait]
impl ResponseSource for CannedSource {
    async fn generate(
        &self,
        model: ModelTag,
        prompt: &str,
        _config: &OllamaConfig,
    ) -> Result<String, GenerateError> {
        debug!(model = %model, prompt_len = prompt.len(), "Generating canned reply");
        Self::reply(model, prompt).ok_or_else(|| {
            warn!(model = %model, "No canned reply for remote persona");
            GenerateError::UpstreamProtocolError(format!("{model} has no canned reply"))
        })
    }
}
