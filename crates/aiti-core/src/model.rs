//! Persona (model tag) definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::CoreError;

/// Backend persona that answers a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelTag {
    /// Fast canned responses for everyday questions.
    #[default]
    Aiti,
    /// Canned responses with the "advanced" template.
    AitiPro,
    /// Remote generation through an Ollama endpoint.
    Ollama,
}

impl ModelTag {
    /// All personas in selector order.
    pub fn all() -> &'static [ModelTag] {
        &[ModelTag::Aiti, ModelTag::AitiPro, ModelTag::Ollama]
    }

    /// Wire name used in configuration and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTag::Aiti => "aiti",
            ModelTag::AitiPro => "aiti-pro",
            ModelTag::Ollama => "ollama",
        }
    }

    /// Human-readable persona name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelTag::Aiti => "AITI Lite",
            ModelTag::AitiPro => "AITI Coder",
            ModelTag::Ollama => "Ollama",
        }
    }

    /// Two-letter badge.
    pub fn short_name(&self) -> &'static str {
        match self {
            ModelTag::Aiti => "AL",
            ModelTag::AitiPro => "AC",
            ModelTag::Ollama => "OL",
        }
    }

    /// Returns true if responses come from a remote endpoint.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Ollama)
    }

    /// Pause between revealed characters for this persona.
    pub fn reveal_delay(&self) -> Duration {
        match self {
            ModelTag::Aiti | ModelTag::AitiPro => Duration::from_millis(30),
            ModelTag::Ollama => Duration::from_millis(15),
        }
    }

    /// Next persona in selector order, wrapping around.
    pub fn next(&self) -> ModelTag {
        match self {
            ModelTag::Aiti => ModelTag::AitiPro,
            ModelTag::AitiPro => ModelTag::Ollama,
            ModelTag::Ollama => ModelTag::Aiti,
        }
    }
}

impl fmt::Display for ModelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelTag {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aiti" | "lite" => Ok(ModelTag::Aiti),
            "aiti-pro" | "coder" => Ok(ModelTag::AitiPro),
            "ollama" => Ok(ModelTag::Ollama),
            other => Err(CoreError::UnknownModel(other.to_string())),
        }
    }
}
