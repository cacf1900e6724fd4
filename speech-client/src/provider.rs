use async_trait::async_trait;

use crate::config::VoiceOptions;
use crate::error::Result;

/// Request to send to a speech provider
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: VoiceOptions,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, voice: VoiceOptions) -> Self {
        Self {
            text: text.into(),
            voice,
        }
    }
}

/// Encoded audio returned by a speech provider
#[derive(Debug, Clone)]
pub struct SpeechResponse {
    pub audio: Vec<u8>,
}

/// Trait for text-to-speech providers
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize one piece of text into an encoded audio payload
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechResponse>;

    /// Get the provider name for display
    fn name(&self) -> &'static str;
}
