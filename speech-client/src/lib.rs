//! Text-to-speech client library for the pdf-audio workspace
//!
//! Provides a provider trait over remote speech synthesis services, a typed
//! error taxonomy that separates retryable failures from fatal ones, and:
//! - Deepgram Aura (REST `/v1/speak`)
//! - Mock (scriptable, for tests)

pub mod config;
pub mod error;
pub mod provider;
pub mod providers;

pub use config::{ProviderConfig, VoiceOptions};
pub use error::{ErrorKind, Result, SpeechError};
pub use provider::{SpeechProvider, SpeechRequest, SpeechResponse};
pub use providers::{DeepgramProvider, MockProvider, ProviderKind, get_provider};
