//! Deepgram text-to-speech provider
//!
//! Direct HTTP implementation of the Deepgram `/v1/speak` REST endpoint.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::error::{Result, SpeechError};
use crate::provider::{SpeechProvider, SpeechRequest, SpeechResponse};

pub const DEEPGRAM_BASE_URL: &str = "https://api.deepgram.com";
const SPEAK_PATH: &str = "/v1/speak";
const PROVIDER_NAME: &str = "Deepgram";

/// Provider for Deepgram Aura voices
pub struct DeepgramProvider {
    api_key: String,
    endpoint: String,
    client: Client,
}

impl DeepgramProvider {
    /// Create a new Deepgram provider. The HTTP client is built once and
    /// reused for every chunk.
    pub fn new(api_key: String, config: &ProviderConfig) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(SpeechError::MissingApiKey {
                provider: PROVIDER_NAME.to_string(),
                env_var: "DEEPGRAM_API_KEY".to_string(),
            });
        }

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .build()
            .map_err(|e| SpeechError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(DEEPGRAM_BASE_URL)
            .trim_end_matches('/');

        Ok(Self {
            api_key,
            endpoint: format!("{}{}", base_url, SPEAK_PATH),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Serialize)]
struct SpeakRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    err_msg: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// Pull a readable message out of a Deepgram error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.err_msg.or(e.reason))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl SpeechProvider for DeepgramProvider {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechResponse> {
        if request.text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let voice = &request.voice;
        let mut query: Vec<(&str, String)> = vec![
            ("model", voice.model.clone()),
            ("encoding", voice.encoding.clone()),
            ("container", voice.container.clone()),
        ];
        if let Some(rate) = voice.sample_rate {
            query.push(("sample_rate", rate.to_string()));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Token {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .query(&query)
            .json(&SpeakRequest {
                text: &request.text,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            log::debug!("{} returned HTTP {}", PROVIDER_NAME, status.as_u16());
            return Err(SpeechError::from_status(
                PROVIDER_NAME,
                status.as_u16(),
                error_message(&body),
                retry_after,
            ));
        }

        let audio = response.bytes().await?.to_vec();
        if audio.is_empty() {
            return Err(SpeechError::Network(
                "Empty audio payload in response".to_string(),
            ));
        }

        Ok(SpeechResponse { audio })
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VoiceOptions;

    #[test]
    fn test_rejects_blank_key() {
        let result = DeepgramProvider::new("  ".to_string(), &ProviderConfig::default());
        assert!(matches!(result, Err(SpeechError::MissingApiKey { .. })));
    }

    #[test]
    fn test_endpoint_from_base_url() {
        let config = ProviderConfig {
            base_url: Some("http://localhost:8080/".to_string()),
            ..Default::default()
        };
        let provider = DeepgramProvider::new("key".to_string(), &config).unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:8080/v1/speak");

        let provider = DeepgramProvider::new("key".to_string(), &ProviderConfig::default()).unwrap();
        assert_eq!(provider.endpoint(), "https://api.deepgram.com/v1/speak");
    }

    #[test]
    fn test_error_message_parsing() {
        let body = r#"{"err_code":"INVALID_AUTH","err_msg":"Invalid credentials.","request_id":"abc"}"#;
        assert_eq!(error_message(body), "Invalid credentials.");
        assert_eq!(error_message("  plain failure \n"), "plain failure");
    }

    #[tokio::test]
    async fn test_empty_text_fails_without_network() {
        let provider = DeepgramProvider::new("key".to_string(), &ProviderConfig::default()).unwrap();
        let request = SpeechRequest::new("   ", VoiceOptions::default());
        let result = provider.synthesize(&request).await;
        assert!(matches!(result, Err(SpeechError::EmptyText)));
    }
}
