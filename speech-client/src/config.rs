use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "aura-orpheus-en";
pub const DEFAULT_ENCODING: &str = "linear16";
pub const DEFAULT_CONTAINER: &str = "wav";

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Voice and output format requested from the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceOptions {
    /// Voice model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sample encoding (linear16 = 16-bit signed PCM)
    #[serde(default = "default_encoding")]
    pub encoding: String,

    /// Container wrapping the samples
    #[serde(default = "default_container")]
    pub container: String,

    /// Output sample rate; None lets the provider pick its default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

fn default_container() -> String {
    DEFAULT_CONTAINER.to_string()
}

impl Default for VoiceOptions {
    fn default() -> Self {
        Self {
            model: default_model(),
            encoding: default_encoding(),
            container: default_container(),
            sample_rate: None,
        }
    }
}

/// Provider-specific configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key (optional, can use env var instead)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Custom base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Whole-request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
    }
}

// The key must never reach logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_voice() {
        let voice = VoiceOptions::default();
        assert_eq!(voice.model, "aura-orpheus-en");
        assert_eq!(voice.encoding, "linear16");
        assert_eq!(voice.container, "wav");
        assert!(voice.sample_rate.is_none());
    }

    #[test]
    fn test_partial_voice_fills_defaults() {
        let voice: VoiceOptions =
            serde_json::from_str(r#"{"model":"aura-asteria-en","sample_rate":16000}"#).unwrap();
        assert_eq!(voice.model, "aura-asteria-en");
        assert_eq!(voice.encoding, "linear16");
        assert_eq!(voice.sample_rate, Some(16000));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ProviderConfig {
            api_key: Some("secret-key-123".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key-123"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_default_timeout() {
        let config = ProviderConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }
}
