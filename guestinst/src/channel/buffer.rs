//! Sliding-window buffer for console output.
//!
//! Unmatched output is kept only up to `search_depth` bytes, so a long
//! running guest script can print as much as it likes without the buffer
//! growing. A match consumes everything up to and including the matched text,
//! which means a prompt is only ever matched once.

use bytes::{Buf, BytesMut};

use super::patterns::PromptMatcher;

/// Buffer for accumulating console output and searching it for patterns.
#[derive(Debug)]
pub struct PatternBuffer {
    /// Output received since the last match.
    window: BytesMut,

    /// How many unmatched bytes to keep.
    search_depth: usize,
}

impl PatternBuffer {
    /// Create a new pattern buffer with the specified search depth.
    ///
    /// # Arguments
    ///
    /// * `search_depth` - Number of unmatched bytes retained between reads.
    ///   Must be at least as long as the longest pattern waited for.
    pub fn new(search_depth: usize) -> Self {
        Self {
            window: BytesMut::with_capacity(search_depth * 2),
            search_depth,
        }
    }

    /// Append already-cleaned output.
    pub fn extend(&mut self, data: &[u8]) {
        self.window.extend_from_slice(data);
    }

    /// Search the retained output for `pattern`.
    ///
    /// On a match, returns the output that preceded it and drops everything
    /// through the end of the match.
    pub fn take_match<M: PromptMatcher + ?Sized>(&mut self, pattern: &M) -> Option<Vec<u8>> {
        let range = pattern.find_match(&self.window)?;
        let before = self.window[..range.start].to_vec();
        self.window.advance(range.end);
        Some(before)
    }

    /// Drop old output so at most `search_depth` bytes remain.
    pub fn trim(&mut self) {
        if self.window.len() > self.search_depth {
            let excess = self.window.len() - self.search_depth;
            self.window.advance(excess);
        }
    }

    /// Get a reference to the retained output.
    pub fn as_slice(&self) -> &[u8] {
        &self.window
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(4096)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Pattern;

    #[test]
    fn test_match_consumes_through_pattern() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"output\n# rest");

        let before = buffer.take_match(&Pattern::literal("\n# ")).unwrap();
        assert_eq!(before, b"output");
        assert_eq!(buffer.as_slice(), b"rest");
    }

    #[test]
    fn test_prompt_matched_only_once() {
        let mut buffer = PatternBuffer::new(100);
        let prompt = Pattern::literal("\n# ");
        buffer.extend(b"\n# ");

        assert!(buffer.take_match(&prompt).is_some());
        assert!(buffer.take_match(&prompt).is_none());
    }

    #[test]
    fn test_no_match_leaves_buffer() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"Booting in 5 sec");
        assert!(buffer.take_match(&Pattern::literal("seconds")).is_none());
        assert_eq!(buffer.len(), 16);
    }

    #[test]
    fn test_match_split_across_extends() {
        let mut buffer = PatternBuffer::new(100);
        let pattern = Pattern::literal("seconds");
        buffer.extend(b"Booting in 5 sec");
        buffer.trim();
        assert!(buffer.take_match(&pattern).is_none());
        buffer.extend(b"onds");
        assert_eq!(buffer.take_match(&pattern).unwrap(), b"Booting in 5 ");
    }

    #[test]
    fn test_trim_keeps_tail() {
        let mut buffer = PatternBuffer::new(10);
        buffer.extend(&[b'x'; 100]);
        buffer.extend(b"\n#");
        buffer.trim();
        assert_eq!(buffer.len(), 10);
        buffer.extend(b" ");
        assert!(buffer.take_match(&Pattern::literal("\n# ")).is_some());
    }

    #[test]
    fn test_trim_drops_old_match() {
        let mut buffer = PatternBuffer::new(10);
        buffer.extend(b"seconds");
        buffer.extend(&[b'x'; 100]);
        buffer.trim();
        assert!(buffer.take_match(&Pattern::literal("seconds")).is_none());
    }
}
