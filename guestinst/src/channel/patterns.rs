//! Pattern matching utilities for console output.

use std::fmt;
use std::ops::Range;

use memchr::memmem::Finder;
use regex::bytes::Regex;

/// Trait for console output matching - literal or regex, extensible for custom matchers.
pub trait PromptMatcher: Send + Sync {
    /// Returns the byte range of the first match, or None if no match.
    fn find_match(&self, data: &[u8]) -> Option<Range<usize>>;

    /// Check if the data matches the pattern.
    fn is_match(&self, data: &[u8]) -> bool {
        self.find_match(data).is_some()
    }
}

impl PromptMatcher for Regex {
    fn find_match(&self, data: &[u8]) -> Option<Range<usize>> {
        self.find(data).map(|m| m.range())
    }
}

/// Something to wait for in the console output.
#[derive(Clone)]
pub enum Pattern {
    /// Exact substring, matched anywhere in the output.
    Literal {
        text: String,
        finder: Finder<'static>,
    },

    /// Regular expression over raw bytes.
    Regex(Regex),
}

impl Pattern {
    /// Create a literal substring pattern.
    pub fn literal(text: impl Into<String>) -> Self {
        let text = text.into();
        let finder = Finder::new(text.as_bytes()).into_owned();
        Pattern::Literal { text, finder }
    }

    /// Create a regex pattern.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Pattern::Regex(Regex::new(pattern)?))
    }

    /// The pattern source, for logs and errors.
    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Literal { text, .. } => text,
            Pattern::Regex(re) => re.as_str(),
        }
    }

    /// Length of the longest match this pattern can need, if bounded.
    pub fn max_len(&self) -> Option<usize> {
        match self {
            Pattern::Literal { text, .. } => Some(text.len()),
            Pattern::Regex(_) => None,
        }
    }
}

impl PromptMatcher for Pattern {
    fn find_match(&self, data: &[u8]) -> Option<Range<usize>> {
        match self {
            Pattern::Literal { text, finder } => finder
                .find(data)
                .map(|start| start..start + text.len()),
            Pattern::Regex(re) => re.find_match(data),
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal { text, .. } => f.debug_tuple("Literal").field(text).finish(),
            Pattern::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl From<&str> for Pattern {
    fn from(text: &str) -> Self {
        Pattern::literal(text)
    }
}
