//! Source line type.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Replacement for characters that cannot appear in well-formed markup.
const FILLER: char = ' ';

/// A single physical line of the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Line number in the source (1-indexed)
    pub number: usize,

    /// Sanitized line text, without the line terminator
    pub text: String,
}

impl Line {
    /// Create a line, sanitizing its text.
    pub fn new(number: usize, text: impl AsRef<str>) -> Self {
        Self {
            number,
            text: sanitize(text.as_ref()),
        }
    }

    /// Check if the line holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Line text without surrounding whitespace.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Character count of the trimmed text.
    pub fn trimmed_len(&self) -> usize {
        self.trimmed().chars().count()
    }
}

/// Make a raw line safe for any structured output.
///
/// Drops a trailing carriage return, replaces control characters other than
/// tab with a space, and normalizes to NFC.
pub fn sanitize(raw: &str) -> String {
    let raw = raw.strip_suffix('\r').unwrap_or(raw);
    raw.nfc()
        .map(|c| {
            if c != '\t' && (c.is_control() || c == '\u{FFFE}' || c == '\u{FFFF}') {
                FILLER
            } else {
                c
            }
        })
        .collect()
}
