//! What an expectation waits for.

use crate::error::{HarnessError, HarnessResult};
use std::fmt;
use std::ops::Range;

/// A literal substring or a regular expression matched against raw output.
#[derive(Debug, Clone)]
pub enum Pattern {
    Literal(String),
    Regex(regex::bytes::Regex),
}

impl Pattern {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn regex(expr: &str) -> HarnessResult<Self> {
        regex::bytes::Regex::new(expr)
            .map(Self::Regex)
            .map_err(|source| HarnessError::InvalidPattern {
                pattern: expr.to_string(),
                source,
            })
    }

    /// Byte range of the first match in `haystack`.
    pub fn find(&self, haystack: &[u8]) -> Option<Range<usize>> {
        match self {
            Self::Literal(needle) => memchr::memmem::find(haystack, needle.as_bytes())
                .map(|start| start..start + needle.len()),
            Self::Regex(re) => re.find(haystack).map(|m| m.range()),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "{text:?}"),
            Self::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

impl From<&str> for Pattern {
    fn from(text: &str) -> Self {
        Self::Literal(text.to_string())
    }
}

impl From<String> for Pattern {
    fn from(text: String) -> Self {
        Self::Literal(text)
    }
}

impl From<&String> for Pattern {
    fn from(text: &String) -> Self {
        Self::Literal(text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_find() {
        let p = Pattern::from("Advertising started");
        let hay = b"uart:~$ bt advertise on\r\nAdvertising started\r\n";
        let range = p.find(hay).unwrap();
        assert_eq!(&hay[range], b"Advertising started");
        assert!(Pattern::from("Scanning").find(hay).is_none());
    }

    #[test]
    fn test_regex_find_channel_address() {
        let p = Pattern::regex(r"Channel 0x[0-9a-fA-F]+ connected").unwrap();
        let hay = b"Channel 0x2000a248 connected\r\n";
        assert!(p.find(hay).is_some());
        assert!(p.find(b"Channel connected").is_none());
    }

    #[test]
    fn test_invalid_regex() {
        let err = Pattern::regex("Channel (").unwrap_err();
        assert!(matches!(err, HarnessError::InvalidPattern { .. }));
    }

    #[test]
    fn test_display() {
        assert_eq!(Pattern::from("bt_hci_core").to_string(), "\"bt_hci_core\"");
        assert_eq!(Pattern::regex("a+").unwrap().to_string(), "/a+/");
    }
}
