//! Mock speech provider for testing
//!
//! Simulates transient and fatal failures so retry and abort behaviour can be
//! exercised without a network.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, SpeechError};
use crate::provider::{SpeechProvider, SpeechRequest, SpeechResponse};

/// A mock provider for testing retry and abort behaviour
pub struct MockProvider {
    /// Number of times to fail before succeeding (0 = always succeed)
    fail_count: usize,
    /// Error to return on failure
    fail_with: Option<SpeechError>,
    /// Per-call outcomes consumed before falling back to `fail_count` logic
    script: Mutex<VecDeque<Result<Vec<u8>>>>,
    /// Payload returned on success
    audio: Vec<u8>,
    /// Current call count
    call_count: AtomicUsize,
    /// Texts received, in call order
    texts: Mutex<Vec<String>>,
}

impl MockProvider {
    fn build(fail_count: usize, fail_with: Option<SpeechError>, audio: Vec<u8>) -> Self {
        Self {
            fail_count,
            fail_with,
            script: Mutex::new(VecDeque::new()),
            audio,
            call_count: AtomicUsize::new(0),
            texts: Mutex::new(Vec::new()),
        }
    }

    /// Create a provider that always returns `audio`
    pub fn always_succeeds(audio: Vec<u8>) -> Self {
        Self::build(0, None, audio)
    }

    /// Create a provider that always fails with the given error
    pub fn always_fails(error: SpeechError) -> Self {
        Self::build(usize::MAX, Some(error), Vec::new())
    }

    /// Create a provider that fails `n` times with the given error, then succeeds
    pub fn fails_then_succeeds(n: usize, error: SpeechError, audio: Vec<u8>) -> Self {
        Self::build(n, Some(error), audio)
    }

    /// Create a provider that plays back `outcomes` one call at a time, then
    /// returns `audio` for every later call
    pub fn scripted(outcomes: Vec<Result<Vec<u8>>>, audio: Vec<u8>) -> Self {
        let provider = Self::build(0, None, audio);
        *provider.script.lock().unwrap() = outcomes.into();
        provider
    }

    /// Get the number of times synthesize() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Texts passed to synthesize(), in call order
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechProvider for MockProvider {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechResponse> {
        let call_num = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.texts.lock().unwrap().push(request.text.clone());

        if let Some(outcome) = self.script.lock().unwrap().pop_front() {
            return outcome.map(|audio| SpeechResponse { audio });
        }

        if call_num < self.fail_count {
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
        }

        Ok(SpeechResponse {
            audio: self.audio.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
