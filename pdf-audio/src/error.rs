//! Failure taxonomy for the synthesis pipeline.

use crate::audio::AudioFormatError;
use speech_client::SpeechError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error(
        "Chunk {chunk_index} rejected by the speech service (check credential and settings): {source}"
    )]
    FatalSynthesis {
        chunk_index: usize,
        attempts: u32,
        #[source]
        source: SpeechError,
    },

    #[error(
        "Chunk {chunk_index} failed after {attempts} attempts, connection looks unstable: {source}"
    )]
    ChunkUnrecoverable {
        chunk_index: usize,
        attempts: u32,
        #[source]
        source: SpeechError,
    },

    #[error("Unusable audio{}: {source}", .chunk_index.map(|i| format!(" for chunk {}", i)).unwrap_or_default())]
    AudioFormat {
        chunk_index: Option<usize>,
        /// Set when the payload came straight from a synthesis attempt
        attempts: Option<u32>,
        #[source]
        source: AudioFormatError,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract text from {}: {message}", .path.display())]
    Extraction { path: PathBuf, message: String },
}

impl PipelineError {
    /// Index of the chunk the failure belongs to, if any.
    pub fn chunk_index(&self) -> Option<usize> {
        match self {
            Self::FatalSynthesis { chunk_index, .. }
            | Self::ChunkUnrecoverable { chunk_index, .. } => Some(*chunk_index),
            Self::AudioFormat { chunk_index, .. } => *chunk_index,
            _ => None,
        }
    }

    /// Synthesis attempts made for the failing chunk, when known.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::FatalSynthesis { attempts, .. } | Self::ChunkUnrecoverable { attempts, .. } => {
                Some(*attempts)
            }
            Self::AudioFormat { attempts, .. } => *attempts,
            _ => None,
        }
    }

    /// Short name of the stage that failed, for the run summary.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::FatalSynthesis { .. } | Self::ChunkUnrecoverable { .. } => "synthesis",
            Self::AudioFormat { .. } => "audio processing",
            Self::Io { .. } => "output",
            Self::Extraction { .. } => "text extraction",
        }
    }
}
