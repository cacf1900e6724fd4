//! Speech synthesis for single chunks, with retry.

pub mod retry;

pub use retry::{Backoff, RetryPolicy, synthesize_with_retry};

use crate::audio::{AudioBuffer, AudioFormatError};
use speech_client::{SpeechError, SpeechProvider, SpeechRequest, VoiceOptions};

/// Why a single synthesis call produced no audio.
#[derive(Debug)]
pub enum SynthesisFailure {
    /// The service call failed
    Service(SpeechError),
    /// The service answered with audio we cannot decode
    Decode(AudioFormatError),
}

/// Synthesize one chunk of text with a single remote call and decode the result.
pub async fn synthesize_chunk(
    provider: &dyn SpeechProvider,
    text: &str,
    voice: &VoiceOptions,
) -> Result<AudioBuffer, SynthesisFailure> {
    let request = SpeechRequest::new(text, voice.clone());
    let response = provider
        .synthesize(&request)
        .await
        .map_err(SynthesisFailure::Service)?;

    AudioBuffer::from_wav_bytes(&response.audio).map_err(SynthesisFailure::Decode)
}
