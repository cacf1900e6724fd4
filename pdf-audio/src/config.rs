//! pdf-audio configuration management.

use crate::error::PipelineError;
use crate::pipeline::{DEFAULT_SPEED_FACTOR, PipelineConfig};
use crate::text::DEFAULT_CHUNK_SIZE;
use crate::tts::{Backoff, RetryPolicy};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use speech_client::{ProviderConfig, VoiceOptions};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY_SECS: u64 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfAudioConfig {
    /// Tempo scalar applied to each segment (0.9 = 10% slower)
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f64,

    /// Attempts per chunk before the run is aborted
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Wait between attempts in seconds
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// fixed or exponential
    #[serde(default)]
    pub backoff: Backoff,

    /// Maximum characters per synthesis request
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Voice model and output format
    #[serde(default)]
    pub voice: VoiceOptions,

    /// Deepgram credential and endpoint overrides
    #[serde(default)]
    pub deepgram: ProviderConfig,
}

fn default_speed_factor() -> f64 {
    DEFAULT_SPEED_FACTOR
}

fn default_retries() -> u32 {
    DEFAULT_RETRIES
}

fn default_retry_delay_secs() -> u64 {
    DEFAULT_RETRY_DELAY_SECS
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for PdfAudioConfig {
    fn default() -> Self {
        Self {
            speed_factor: default_speed_factor(),
            retries: default_retries(),
            retry_delay_secs: default_retry_delay_secs(),
            backoff: Backoff::default(),
            chunk_size: default_chunk_size(),
            voice: VoiceOptions::default(),
            deepgram: ProviderConfig::default(),
        }
    }
}

impl PdfAudioConfig {
    /// Get the config file path: ~/.config/cli-programs/pdf-audio.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cli-programs")
            .join("pdf-audio.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: PdfAudioConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            backoff: self.backoff,
            ..RetryPolicy::fixed(self.retries, Duration::from_secs(self.retry_delay_secs))
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            chunk_size: self.chunk_size,
            speed_factor: self.speed_factor,
            retry: self.retry_policy(),
            voice: self.voice.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        self.pipeline_config().validate()
    }
}
