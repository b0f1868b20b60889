//! Bounded accumulator for console output awaiting a match.

use super::pattern::Pattern;

/// Unconsumed output of one DUT.
///
/// A successful match consumes everything up to and including the matched
/// text, so each expectation only sees output that arrived after the last one.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    data: Vec<u8>,
    limit: usize,
}

impl OutputBuffer {
    pub fn new(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Append output, dropping the oldest bytes beyond the limit.
    pub fn push(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
        if self.data.len() > self.limit {
            let excess = self.data.len() - self.limit;
            self.data.drain(..excess);
        }
    }

    /// Consume through the first match, returning `(before, matched)`.
    pub fn take_match(&mut self, pattern: &Pattern) -> Option<(String, String)> {
        let range = pattern.find(&self.data)?;
        let before = String::from_utf8_lossy(&self.data[..range.start]).into_owned();
        let matched = String::from_utf8_lossy(&self.data[range.clone()]).into_owned();
        self.data.drain(..range.end);
        Some((before, matched))
    }

    /// The last `max` bytes, for error reports.
    pub fn tail(&self, max: usize) -> String {
        let start = self.data.len().saturating_sub(max);
        String::from_utf8_lossy(&self.data[start..]).into_owned()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
