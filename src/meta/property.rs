//! `Name: value` header properties.

use super::header::HeaderText;
use crate::parser::is_decorative;

/// Value of a `name:` property on a single line.
///
/// The name is matched case-insensitively at the start of the line once
/// surrounding decorative characters are trimmed.
pub fn property_value<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let line = trim_decorative(line);
    let head = line.get(..name.len())?;
    if !head.eq_ignore_ascii_case(name) {
        return None;
    }
    let rest = line[name.len()..].trim_start();
    rest.strip_prefix(':').map(str::trim)
}

/// First usable value of a property in the header.
///
/// Lines whose value is empty or repeats the property name (an unfilled
/// template) are skipped.
pub fn property(header: &HeaderText, name: &str) -> Option<String> {
    header
        .lines()
        .iter()
        .filter_map(|line| property_value(&line.text, name))
        .find(|value| !value.is_empty() && !value.eq_ignore_ascii_case(name))
        .map(str::to_string)
}

/// Trim whitespace and decorative characters from both ends.
pub fn trim_decorative(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || is_decorative(c))
}
