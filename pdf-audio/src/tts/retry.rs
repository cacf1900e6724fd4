//! Bounded retry around single-chunk synthesis.

use super::{SynthesisFailure, synthesize_chunk};
use crate::audio::AudioBuffer;
use crate::error::PipelineError;
use crate::text::TextChunk;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use speech_client::{SpeechError, SpeechProvider, VoiceOptions};
use std::time::Duration;

/// How the wait between attempts changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// Same delay before every retry
    #[default]
    Fixed,
    /// Delay multiplied by `backoff_factor` after each retry, capped at `max_delay`
    Exponential,
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per chunk, including the first
    pub max_attempts: u32,
    pub delay: Duration,
    pub backoff: Backoff,
    pub backoff_factor: f32,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
            backoff: Backoff::Fixed,
            backoff_factor: 2.0,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_attempts == 0 {
            return Err(PipelineError::Configuration(
                "retry attempts must be at least 1".to_string(),
            ));
        }
        if self.backoff == Backoff::Exponential
            && (!self.backoff_factor.is_finite() || self.backoff_factor < 1.0)
        {
            return Err(PipelineError::Configuration(format!(
                "backoff factor must be at least 1.0, got {}",
                self.backoff_factor
            )));
        }
        Ok(())
    }

    /// Delay to use after `current` for the next retry.
    pub fn next_delay(&self, current: Duration) -> Duration {
        match self.backoff {
            Backoff::Fixed => current,
            Backoff::Exponential => Duration::from_secs_f32(
                (current.as_secs_f32() * self.backoff_factor).min(self.max_delay.as_secs_f32()),
            ),
        }
    }
}

/// Synthesize `chunk`, retrying transient service failures.
///
/// Fatal service errors and undecodable audio are returned at once. When every
/// attempt fails transiently the result is
/// [`PipelineError::ChunkUnrecoverable`] carrying the chunk index.
pub async fn synthesize_with_retry(
    provider: &dyn SpeechProvider,
    chunk: TextChunk<'_>,
    voice: &VoiceOptions,
    policy: &RetryPolicy,
) -> Result<AudioBuffer, PipelineError> {
    policy.validate()?;

    let mut attempt = 0;
    let mut delay = policy.delay;

    loop {
        attempt += 1;

        let error = match synthesize_chunk(provider, chunk.text, voice).await {
            Ok(audio) => {
                if attempt > 1 {
                    info!("Chunk {} succeeded on attempt {}", chunk.index, attempt);
                }
                return Ok(audio);
            }
            Err(SynthesisFailure::Decode(source)) => {
                return Err(PipelineError::AudioFormat {
                    chunk_index: Some(chunk.index),
                    attempts: Some(attempt),
                    source,
                });
            }
            Err(SynthesisFailure::Service(e)) if !e.is_transient() => {
                return Err(PipelineError::FatalSynthesis {
                    chunk_index: chunk.index,
                    attempts: attempt,
                    source: e,
                });
            }
            Err(SynthesisFailure::Service(e)) => e,
        };

        warn!(
            "Chunk {} failed (attempt {}/{}): {}",
            chunk.index, attempt, policy.max_attempts, error
        );

        if attempt >= policy.max_attempts {
            return Err(PipelineError::ChunkUnrecoverable {
                chunk_index: chunk.index,
                attempts: attempt,
                source: error,
            });
        }

        let wait = match &error {
            SpeechError::RateLimited {
                retry_after: Some(secs),
            } => delay.max(Duration::from_secs(*secs)),
            _ => delay,
        };
        debug!("Retrying chunk {} in {:?}", chunk.index, wait);
        tokio::time::sleep(wait).await;
        delay = policy.next_delay(delay);
    }
}
