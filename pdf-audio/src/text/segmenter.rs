//! Fixed-length text segmentation for synthesis requests.

use super::TextChunk;
use crate::error::PipelineError;

/// Default chunk length in characters, kept under Deepgram's 2000-character
/// request limit.
pub const DEFAULT_CHUNK_SIZE: usize = 1990;

/// Split `text` into consecutive chunks of at most `max_len` characters.
///
/// Every chunk but the last holds exactly `max_len` characters and joining
/// the chunks in order gives back `text`.
pub fn segment(text: &str, max_len: usize) -> Result<Segments<'_>, PipelineError> {
    if max_len == 0 {
        return Err(PipelineError::Configuration(
            "chunk size must be at least 1 character".to_string(),
        ));
    }

    let count = text.chars().count().div_ceil(max_len);
    Ok(Segments {
        text,
        max_len,
        count,
    })
}

/// A restartable view of a text split into chunks.
#[derive(Debug, Clone, Copy)]
pub struct Segments<'a> {
    text: &'a str,
    max_len: usize,
    count: usize,
}

impl<'a> Segments<'a> {
    /// Number of chunks, known before iterating.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterate the chunks from the start. Can be called repeatedly.
    pub fn iter(&self) -> SegmentIter<'a> {
        SegmentIter {
            rest: self.text,
            max_len: self.max_len,
            index: 0,
        }
    }
}

impl<'a> IntoIterator for &Segments<'a> {
    type Item = TextChunk<'a>;
    type IntoIter = SegmentIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the chunks of a [`Segments`].
#[derive(Debug, Clone)]
pub struct SegmentIter<'a> {
    rest: &'a str,
    max_len: usize,
    index: usize,
}

impl<'a> Iterator for SegmentIter<'a> {
    type Item = TextChunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        // Byte offset of the first char past this chunk
        let end = self
            .rest
            .char_indices()
            .nth(self.max_len)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());

        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;

        let chunk = TextChunk::new(self.index, head);
        self.index += 1;
        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn texts(text: &str, max_len: usize) -> Vec<String> {
        segment(text, max_len)
            .unwrap()
            .iter()
            .map(|c| c.text.to_string())
            .collect()
    }

    #[test]
    fn test_exact_split() {
        assert_eq!(texts("abcdefghij", 3), vec!["abc", "def", "ghi", "j"]);
    }

    #[test]
    fn test_short_text_single_chunk() {
        assert_eq!(texts("Hello world.", 1990), vec!["Hello world."]);
    }

    #[test]
    fn test_empty_text() {
        let segments = segment("", 1990).unwrap();
        assert_eq!(segments.len(), 0);
        assert!(segments.is_empty());
        assert_eq!(segments.iter().count(), 0);
    }

    #[test]
    fn test_zero_max_len_is_config_error() {
        let result = segment("text", 0);
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        let text = "héllo wörld ✓";
        let chunks = texts(text, 4);
        assert_eq!(chunks, vec!["héll", "o wö", "rld ", "✓"]);
    }

    #[test]
    fn test_chunk_indices() {
        let segments = segment("abcdefg", 2).unwrap();
        let indices: Vec<usize> = segments.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_restartable() {
        let segments = segment("the quick brown fox", 5).unwrap();
        let first: Vec<_> = segments.iter().collect();
        let second: Vec<_> = (&segments).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), segments.len());
    }

    #[test]
    fn test_scenario_lengths() {
        let text = "x".repeat(4500);
        let segments = segment(&text, 1990).unwrap();
        assert_eq!(segments.len(), 3);
        let lengths: Vec<usize> = segments.iter().map(|c| c.text.chars().count()).collect();
        assert_eq!(lengths, vec![1990, 1990, 520]);
    }

    proptest! {
        #[test]
        fn prop_concat_reconstructs(text in "\\PC{0,300}", max_len in 1usize..64) {
            let segments = segment(&text, max_len).unwrap();
            let joined: String = segments.iter().map(|c| c.text).collect();
            prop_assert_eq!(joined, text);
        }

        #[test]
        fn prop_chunk_count(text in "\\PC{0,300}", max_len in 1usize..64) {
            let segments = segment(&text, max_len).unwrap();
            let expected = text.chars().count().div_ceil(max_len);
            prop_assert_eq!(segments.len(), expected);
            prop_assert_eq!(segments.iter().count(), expected);
        }

        #[test]
        fn prop_only_last_is_short(text in "\\PC{0,300}", max_len in 1usize..64) {
            let chunks: Vec<_> = segment(&text, max_len).unwrap().iter().collect();
            for (i, chunk) in chunks.iter().enumerate() {
                let len = chunk.text.chars().count();
                prop_assert!(len >= 1 && len <= max_len);
                if i + 1 < chunks.len() {
                    prop_assert_eq!(len, max_len);
                }
            }
        }
    }
}
