//! Speech provider implementations

mod deepgram;
pub mod mock;

pub use deepgram::{DEEPGRAM_BASE_URL, DeepgramProvider};
pub use mock::MockProvider;

use crate::config::ProviderConfig;
use crate::error::{Result, SpeechError};
use crate::provider::SpeechProvider;

/// Supported provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Deepgram,
}

impl ProviderKind {
    /// Environment variables checked for this provider's API key, in order
    pub fn env_vars(&self) -> &'static [&'static str] {
        match self {
            Self::Deepgram => &["DEEPGRAM_API_KEY", "MY_DEEPGRAM_KEY"],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Deepgram => "Deepgram",
        }
    }
}

/// Create a provider instance
pub fn get_provider(kind: ProviderKind, config: &ProviderConfig) -> Result<Box<dyn SpeechProvider>> {
    match kind {
        ProviderKind::Deepgram => {
            let api_key = get_api_key(config, kind)?;
            Ok(Box::new(DeepgramProvider::new(api_key, config)?))
        }
    }
}

/// Get API key from config or environment variables
fn get_api_key(config: &ProviderConfig, kind: ProviderKind) -> Result<String> {
    // Check config first
    if let Some(key) = config.api_key.clone().filter(|k| !k.trim().is_empty()) {
        return Ok(key);
    }

    // Fall back to environment variables
    kind.env_vars()
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|k| !k.trim().is_empty()))
        .ok_or_else(|| SpeechError::MissingApiKey {
            provider: kind.display_name().to_string(),
            env_var: kind.env_vars()[0].to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_order() {
        assert_eq!(
            ProviderKind::Deepgram.env_vars(),
            &["DEEPGRAM_API_KEY", "MY_DEEPGRAM_KEY"]
        );
    }

    #[test]
    fn test_config_key_wins() {
        let config = ProviderConfig {
            api_key: Some("from-config".to_string()),
            ..Default::default()
        };
        assert_eq!(get_api_key(&config, ProviderKind::Deepgram).unwrap(), "from-config");
    }

    #[test]
    fn test_get_provider_with_config_key() {
        let config = ProviderConfig {
            api_key: Some("from-config".to_string()),
            ..Default::default()
        };
        let provider = get_provider(ProviderKind::Deepgram, &config).unwrap();
        assert_eq!(provider.name(), "Deepgram");
    }
}
