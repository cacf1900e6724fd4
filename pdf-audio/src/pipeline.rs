//! Sequential chunk synthesis and assembly into one audio file.

use crate::audio::{AudioBuffer, adjust_speed, write_wav};
use crate::error::PipelineError;
use crate::text::{DEFAULT_CHUNK_SIZE, Segments, segment};
use crate::tts::{RetryPolicy, synthesize_with_retry};
use log::{debug, error, info};
use speech_client::{SpeechProvider, VoiceOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest chunk the speech service accepts in one request.
pub const MAX_CHUNK_SIZE: usize = 2000;

/// Default playback speed; below 1.0 slows narration down.
pub const DEFAULT_SPEED_FACTOR: f64 = 0.9;

const MIN_SPEED_FACTOR: f64 = 0.25;
const MAX_SPEED_FACTOR: f64 = 4.0;

/// Settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum characters per synthesis request
    pub chunk_size: usize,
    /// Tempo scalar applied to every segment
    pub speed_factor: f64,
    pub retry: RetryPolicy,
    pub voice: VoiceOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            speed_factor: DEFAULT_SPEED_FACTOR,
            retry: RetryPolicy::default(),
            voice: VoiceOptions::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(PipelineError::Configuration(format!(
                "chunk size must be between 1 and {} characters, got {}",
                MAX_CHUNK_SIZE, self.chunk_size
            )));
        }
        if !(MIN_SPEED_FACTOR..=MAX_SPEED_FACTOR).contains(&self.speed_factor) {
            return Err(PipelineError::Configuration(format!(
                "speed factor must be between {} and {}, got {}",
                MIN_SPEED_FACTOR, MAX_SPEED_FACTOR, self.speed_factor
            )));
        }
        self.retry.validate()
    }
}

/// Progress after a chunk has been appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkProgress {
    /// Chunks finished so far
    pub completed: usize,
    /// Chunks in the document
    pub total: usize,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub chunks: usize,
    pub duration: Duration,
}

/// Drives chunks through synthesis one at a time and writes the combined audio.
pub struct Pipeline<'a> {
    provider: &'a dyn SpeechProvider,
    config: PipelineConfig,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline around a provider built once for the whole run.
    pub fn new(provider: &'a dyn SpeechProvider, config: PipelineConfig) -> Self {
        Self { provider, config }
    }

    /// Number of chunks `text` will be split into.
    pub fn chunk_count(&self, text: &str) -> Result<usize, PipelineError> {
        Ok(segment(text, self.config.chunk_size)?.len())
    }

    /// Synthesize `text` and write it to `output_path`.
    ///
    /// The first chunk that cannot be synthesized aborts the run; nothing is
    /// written in that case and any existing file at `output_path` is kept.
    pub async fn run<F>(
        &self,
        text: &str,
        output_path: &Path,
        mut on_progress: F,
    ) -> Result<RunSummary, PipelineError>
    where
        F: FnMut(ChunkProgress),
    {
        let result = self.run_inner(text, output_path, &mut on_progress).await;

        if let Err(ref e) = result {
            let attempts = match e.attempts() {
                Some(1) => " after 1 attempt".to_string(),
                Some(n) => format!(" after {} attempts", n),
                None => String::new(),
            };
            match e.chunk_index() {
                Some(index) => error!(
                    "Aborted at chunk {} during {}{}: {}",
                    index,
                    e.stage(),
                    attempts,
                    e
                ),
                None => error!("Aborted during {}: {}", e.stage(), e),
            }
        }

        result
    }

    async fn run_inner<F>(
        &self,
        text: &str,
        output_path: &Path,
        on_progress: &mut F,
    ) -> Result<RunSummary, PipelineError>
    where
        F: FnMut(ChunkProgress),
    {
        self.config.validate()?;

        let segments = segment(text, self.config.chunk_size)?;
        if segments.is_empty() {
            info!("No text to synthesize, writing empty audio");
        }
        info!(
            "Synthesizing {} chunk(s) with {} ({})",
            segments.len(),
            self.provider.name(),
            self.config.voice.model
        );

        let combined = self.assemble(&segments, on_progress).await?;
        let output_path = write_wav(&combined, output_path)?;
        let duration = combined.duration();

        info!(
            "Combined audio saved to {} ({:.1}s)",
            output_path.display(),
            duration.as_secs_f64()
        );

        Ok(RunSummary {
            output_path,
            chunks: segments.len(),
            duration,
        })
    }

    /// Synthesize, speed-adjust and append every chunk in index order.
    async fn assemble<F>(
        &self,
        segments: &Segments<'_>,
        on_progress: &mut F,
    ) -> Result<AudioBuffer, PipelineError>
    where
        F: FnMut(ChunkProgress),
    {
        let total = segments.len();
        let mut combined = AudioBuffer::empty();

        for chunk in segments {
            // Nothing to speak; the service refuses blank requests
            if chunk.text.trim().is_empty() {
                debug!("Chunk {}/{} is blank, skipping", chunk.index + 1, total);
                on_progress(ChunkProgress {
                    completed: chunk.index + 1,
                    total,
                });
                continue;
            }

            let audio =
                synthesize_with_retry(self.provider, chunk, &self.config.voice, &self.config.retry)
                    .await?;

            let format_err = |source| PipelineError::AudioFormat {
                chunk_index: Some(chunk.index),
                attempts: None,
                source,
            };
            let adjusted = adjust_speed(&audio, self.config.speed_factor).map_err(format_err)?;
            combined.append(&adjusted).map_err(format_err)?;

            info!("Chunk {}/{} complete", chunk.index + 1, total);
            on_progress(ChunkProgress {
                completed: chunk.index + 1,
                total,
            });
        }

        Ok(combined)
    }
}
