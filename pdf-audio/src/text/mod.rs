//! Text processing for TTS: cleaning and segmenting.

mod cleaner;
pub mod segmenter;

pub use cleaner::clean_text;
pub use segmenter::{DEFAULT_CHUNK_SIZE, Segments, segment};

/// A piece of document text sent to the speech service in one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChunk<'a> {
    /// Zero-based position of the chunk in the document
    pub index: usize,
    /// The text content
    pub text: &'a str,
}

impl<'a> TextChunk<'a> {
    /// Create a new text chunk.
    pub fn new(index: usize, text: &'a str) -> Self {
        Self { index, text }
    }
}
