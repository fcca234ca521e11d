//! Line classification: headings, breaks, page numbers, punctuation.
//!
//! The segmenter depends only on the [`LineClassifier`] trait. The
//! [`DefaultLineClassifier`] carries a small English-biased rule set that
//! recognises the conventions common in plain-text etexts.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::HeadingKind;

/// Minimum number of non-whitespace characters in a break line.
pub const BREAK_MIN_LEN: usize = 10;

/// Longest line still considered an all-capitals title.
const TITLE_MAX_LEN: usize = 60;

/// Characters used for dividers and ornamental framing.
pub const DECORATIVE_CHARS: &[char] = &[
    '*', '-', '=', '_', '~', '#', '+', '.', '^', '<', '>', '|', '/', '\\', ':', '\u{b7}',
    '\u{2022}', '\u{2014}', '\u{2013}',
];

/// Characters that close a phrase without ending it; looked through when
/// checking for terminal punctuation.
const CLOSERS: &[char] = &[
    '"', '\'', '\u{201D}', '\u{2019}', ')', ']', '}', '\u{BB}', '_',
];

/// Characters that open a quotation at the start of a line.
const LEFT_QUOTES: &[char] = &['"', '\u{201C}', '\u{2018}', '\u{AB}', '`'];

static CHAPTER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(chapter|book|part|volume|canto|act|scene|section|letter|stave|fytte)\s+([0-9]+|[ivxlcdm]+|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth|last|the\s+[a-z]+)\b\.?(\s*[-:.\x{2014}]\s*.{0,80})?$",
    )
    .unwrap()
});

static SUB_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[IVXLCDM]{1,7}\.?(\s+[^a-z\s].{0,60})?$").unwrap());

static OTHER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(preface|introduction|contents|table of contents|prologue|epilogue|appendix|index|glossary|footnotes|notes|afterword|foreword|dedication|postscript|conclusion|the end|finis)[.:]?$",
    )
    .unwrap()
});

static PAGE_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\[({<\-]*\s*(?:(?:page|p\.?)\s*)?\d{1,4}\s*[\])}>\-]*$").unwrap()
});

static BRACKETED_ROMAN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[\[({\-]\s*[ivxlcdm]{1,7}\s*[\])}\-]$").unwrap());

/// Rules deciding what a single line is, independent of its neighbours.
pub trait LineClassifier {
    /// Heading classification of a line.
    fn classify_heading(&self, line: &str) -> HeadingKind;

    /// Check if a line is a decorative divider.
    fn is_break(&self, line: &str) -> bool;

    /// Check if a line is a page-number artifact.
    fn is_page_number(&self, line: &str) -> bool;
}

/// Rule-based classifier for English plain-text etexts.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLineClassifier;

impl DefaultLineClassifier {
    /// Create a new classifier.
    pub fn new() -> Self {
        Self
    }
}

impl LineClassifier for DefaultLineClassifier {
    fn classify_heading(&self, line: &str) -> HeadingKind {
        let line = line.trim();
        if line.is_empty() {
            return HeadingKind::None;
        }

        if OTHER_REGEX.is_match(line) {
            HeadingKind::Other
        } else if CHAPTER_REGEX.is_match(line) {
            HeadingKind::Chapter
        } else if SUB_REGEX.is_match(line) {
            HeadingKind::Sub
        } else if is_capitals_title(line) {
            HeadingKind::Title
        } else {
            HeadingKind::None
        }
    }

    fn is_break(&self, line: &str) -> bool {
        let mut count = 0;
        for c in line.chars().filter(|c| !c.is_whitespace()) {
            if !is_decorative(c) {
                return false;
            }
            count += 1;
        }
        count >= BREAK_MIN_LEN
    }

    fn is_page_number(&self, line: &str) -> bool {
        let line = line.trim();
        !line.is_empty() && (PAGE_NUMBER_REGEX.is_match(line) || BRACKETED_ROMAN_REGEX.is_match(line))
    }
}

fn is_capitals_title(line: &str) -> bool {
    let letters = line.chars().filter(|c| c.is_alphabetic()).count();
    letters >= 2
        && line.chars().count() <= TITLE_MAX_LEN
        && !line.chars().any(|c| c.is_lowercase())
        && !ends_with_independent_punctuation(line)
}

/// Punctuation classes for line endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuation {
    /// Ends a sentence or an independent phrase
    Independent,
    /// Continues a clause or a word onto the next line
    Dependent,
}

/// Classify a punctuation character.
pub fn punctuation_kind(c: char) -> Option<Punctuation> {
    match c {
        '.' | '!' | '?' | ':' | ';' | '\u{2026}' => Some(Punctuation::Independent),
        ',' | '-' | '\u{2013}' | '\u{2014}' | '&' | '(' | '[' | '{' | '/' => {
            Some(Punctuation::Dependent)
        }
        _ => None,
    }
}

/// Punctuation class of the last meaningful character of a line.
///
/// Closing quotes and brackets are looked through, so `He left."` ends with
/// independent punctuation.
pub fn trailing_punctuation(line: &str) -> Option<Punctuation> {
    line.trim_end()
        .chars()
        .rev()
        .find(|c| !CLOSERS.contains(c))
        .and_then(punctuation_kind)
}

/// Check if a line ends with sentence-ending punctuation.
pub fn ends_with_independent_punctuation(line: &str) -> bool {
    trailing_punctuation(line) == Some(Punctuation::Independent)
}

/// Check if a line ends with punctuation that continues onto the next line.
pub fn ends_with_dependent_punctuation(line: &str) -> bool {
    trailing_punctuation(line) == Some(Punctuation::Dependent)
}

/// Check if a line opens with a quotation mark.
pub fn starts_with_left_quote(line: &str) -> bool {
    line.trim_start()
        .chars()
        .next()
        .is_some_and(|c| LEFT_QUOTES.contains(&c))
}

/// Check if a character is ornamental.
pub fn is_decorative(c: char) -> bool {
    DECORATIVE_CHARS.contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_break_detection() {
        let c = DefaultLineClassifier::new();
        assert!(c.is_break("**********"));
        assert!(c.is_break("  * * * * * * * * * *  "));
        assert!(c.is_break("-----------------------------"));
        assert!(!c.is_break("***"));
        assert!(!c.is_break("*****END*****"));
        assert!(!c.is_break(""));
    }

    #[test]
    fn test_page_numbers() {
        let c = DefaultLineClassifier::new();
        assert!(c.is_page_number("42"));
        assert!(c.is_page_number("  [Page 117]  "));
        assert!(c.is_page_number("- 12 -"));
        assert!(c.is_page_number("p. 9"));
        assert!(c.is_page_number("[xiv]"));
        assert!(!c.is_page_number("1993 was a year"));
        assert!(!c.is_page_number("xiv"));
        assert!(!c.is_page_number(""));
    }

    #[test]
    fn test_heading_kinds() {
        let c = DefaultLineClassifier::new();
        assert_eq!(c.classify_heading("CHAPTER I"), HeadingKind::Chapter);
        assert_eq!(c.classify_heading("Chapter 12. The Storm"), HeadingKind::Chapter);
        assert_eq!(c.classify_heading("BOOK THE FIRST"), HeadingKind::Chapter);
        assert_eq!(c.classify_heading("IV."), HeadingKind::Sub);
        assert_eq!(c.classify_heading("PREFACE"), HeadingKind::Other);
        assert_eq!(c.classify_heading("The End."), HeadingKind::Other);
        assert_eq!(c.classify_heading("EVANGELINE"), HeadingKind::Title);
        assert_eq!(
            c.classify_heading("Part of the story was lost."),
            HeadingKind::None
        );
        assert_eq!(c.classify_heading("it was a dark night"), HeadingKind::None);
        assert_eq!(c.classify_heading("STOP."), HeadingKind::None);
    }

    #[test]
    fn test_trailing_punctuation() {
        assert!(ends_with_independent_punctuation("He left."));
        assert!(ends_with_independent_punctuation("\"Where?\""));
        assert!(ends_with_independent_punctuation("as follows:  "));
        assert!(ends_with_dependent_punctuation("a hyphen-"));
        assert!(ends_with_dependent_punctuation("and then,"));
        assert!(!ends_with_independent_punctuation("no ending"));
        assert_eq!(trailing_punctuation(""), None);
    }

    #[test]
    fn test_left_quote() {
        assert!(starts_with_left_quote("\"Hello,\" she said."));
        assert!(starts_with_left_quote("\u{201C}Curly quotes"));
        assert!(!starts_with_left_quote("'Tis the season"));
        assert!(!starts_with_left_quote("plain"));
    }
}
