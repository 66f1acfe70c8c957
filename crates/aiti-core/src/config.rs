//! Session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::ModelTag;

/// Smallest accepted chain length.
pub const MIN_CHAIN_LENGTH: u8 = 1;

/// Largest accepted chain length.
pub const MAX_CHAIN_LENGTH: u8 = 10;

/// Connection settings for the Ollama generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server.
    pub base_url: String,

    /// Model name sent in the request body.
    pub model: String,

    /// Timeout for one generation request.
    #[serde(rename = "timeout_ms", with = "duration_millis")]
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Configuration a session starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Persona used for new messages.
    pub selected_model: ModelTag,

    /// How many prior messages count as context.
    pub chain_length: u8,

    /// Ollama endpoint settings.
    pub ollama: OllamaConfig,

    /// Overrides the per-persona reveal delay when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reveal_delay: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            selected_model: ModelTag::default(),
            chain_length: 5,
            ollama: OllamaConfig::default(),
            reveal_delay: None,
        }
    }
}

impl SessionConfig {
    /// Check all values are in range.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_chain_length(self.chain_length)
    }

    /// Reveal delay for a persona, honouring the override.
    pub fn reveal_delay_for(&self, model: ModelTag) -> Duration {
        self.reveal_delay.unwrap_or_else(|| model.reveal_delay())
    }
}

/// Check a chain length is within `MIN_CHAIN_LENGTH..=MAX_CHAIN_LENGTH`.
pub fn validate_chain_length(length: u8) -> Result<(), CoreError> {
    if (MIN_CHAIN_LENGTH..=MAX_CHAIN_LENGTH).contains(&length) {
        Ok(())
    } else {
        Err(CoreError::InvalidChainLength(length))
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_chain_length_bounds() {
        assert!(validate_chain_length(1).is_ok());
        assert!(validate_chain_length(10).is_ok());
        assert_eq!(validate_chain_length(0), Err(CoreError::InvalidChainLength(0)));
        assert_eq!(validate_chain_length(11), Err(CoreError::InvalidChainLength(11)));
    }

    #[test]
    fn test_reveal_delay_override() {
        let mut config = SessionConfig::default();
        assert_eq!(
            config.reveal_delay_for(ModelTag::Aiti),
            Duration::from_millis(30)
        );
        config.reveal_delay = Some(Duration::ZERO);
        assert_eq!(config.reveal_delay_for(ModelTag::Ollama), Duration::ZERO);
    }

    #[test]
    fn test_ollama_timeout_serializes_as_millis() {
        let json = serde_json::to_value(OllamaConfig::default()).unwrap();
        assert_eq!(json["timeout_ms"], 60_000);
    }

    #[test]
    fn test_sub_second_timeout_survives_round_trip() {
        let config = OllamaConfig {
            timeout: Duration::from_millis(500),
            ..OllamaConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: OllamaConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.timeout, Duration::from_millis(500));
    }
}
