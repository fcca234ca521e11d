//! Cleanup of extracted metadata strings.
//!
//! All three functions iterate their stripping rules to a fixed point, so
//! applying any of them twice gives the same result as applying it once.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters trimmed from both ends of an extracted value.
const EDGE_CHARS: &[char] = &[
    '*', '_', '=', '~', '#', '-', ',', ';', ':', '.', '"', '\u{201C}', '\u{201D}', '|', '/',
    '\\', '<', '>', '+', '\u{2014}', '\u{2013}',
];

static CONTENTS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\n\s*contents\b").unwrap());

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static TRAILING_BRACKET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(?:\([^()]*\)|\[[^\[\]]*\]|\{[^{}]*\})\s*$").unwrap());

static TRAILING_BY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i),\s*by(?:\s+\S.*)?$").unwrap());

static LEADING_BY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^by\s+").unwrap());

static RIGHTS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[\s,.;:]*all\s+rights\s+reserved\W*$").unwrap());

static COPYRIGHT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[\s,.;:]*(?:copyright|\(c\)|\x{a9})\s*(?:\(c\)|\x{a9})?\s*\d{4}\b.*$").unwrap()
});

/// Shared cleanup for any extracted value.
///
/// Cuts at a line break followed by "contents" (table-of-contents
/// bleed-through), collapses whitespace runs, then trims edge punctuation and
/// decorative characters and drops trailing bracket groups until nothing
/// changes.
pub fn tidy(s: &str) -> String {
    let cut = CONTENTS_REGEX.find(s).map_or(s, |m| &s[..m.start()]);
    let mut value = WHITESPACE_REGEX.replace_all(cut, " ").into_owned();

    loop {
        let trimmed = trim_edges(&value);
        let next = TRAILING_BRACKET_REGEX.replace(trimmed, "").into_owned();
        if next == value {
            return value;
        }
        value = next;
    }
}

/// Cleanup for titles: also drops a trailing ", by ..." clause, "all rights
/// reserved" and copyright notices. A bare " by " is left alone, since
/// titles such as "Stand by Me" contain one.
pub fn tidy_title(s: &str) -> String {
    fixed_point(s, |value| {
        let value = TRAILING_BY_REGEX.replace(value, "");
        strip_notices(&value)
    })
}

/// Cleanup for authors: also drops a leading "by", "all rights reserved" and
/// copyright notices.
pub fn tidy_author(s: &str) -> String {
    fixed_point(s, |value| {
        let value = LEADING_BY_REGEX.replace(value, "");
        strip_notices(&value)
    })
}

fn strip_notices(value: &str) -> String {
    let value = RIGHTS_REGEX.replace(value, "");
    COPYRIGHT_REGEX.replace(&value, "").into_owned()
}

fn fixed_point(s: &str, strip: impl Fn(&str) -> String) -> String {
    let mut value = tidy(s);
    loop {
        let next = tidy(&strip(&value));
        if next == value {
            return value;
        }
        value = next;
    }
}

fn trim_edges(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || EDGE_CHARS.contains(&c))
}
