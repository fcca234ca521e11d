//! Project-name and work-token matching.
//!
//! Etext headers name the distributing project ("Project Gutenberg", with a
//! few spelling variants) followed closely by a token naming the kind of work
//! ("Etext", "EBook", "Edition", a possessive "'s", ...). The text after that
//! token is where titles and authors usually sit.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::is_decorative;

/// Maximum distance in characters between the project token and the work
/// token.
pub const WORK_TOKEN_WINDOW: usize = 12;

static PROJECT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)project\s*gutenb[eu]rg").unwrap());

static WORK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)['\x{2019}]s\b|\be-?texts?\b|\be-?books?\b|\beditions?\b|\bbooks?\b").unwrap()
});

static LEADING_WORK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:['\x{2019}]s\b|e-?texts?\b|e-?books?\b|editions?\b|books?\b)").unwrap()
});

/// Position of a project token and the work token that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkToken {
    /// Byte range of the project name
    pub project: Range<usize>,
    /// Byte range of the work token run
    pub work: Range<usize>,
}

impl WorkToken {
    /// Text following the work token.
    pub fn rest<'a>(&self, line: &'a str) -> &'a str {
        &line[self.work.end..]
    }
}

/// Check if text mentions the project name.
pub fn contains_project(text: &str) -> bool {
    PROJECT_REGEX.is_match(text)
}

/// Find a project token followed by a work token within
/// [`WORK_TOKEN_WINDOW`] characters.
///
/// Consecutive work tokens ("'s EBook") are taken as one run.
pub fn find_work_token(line: &str) -> Option<WorkToken> {
    PROJECT_REGEX.find_iter(line).find_map(|project| {
        let after = &line[project.end()..];
        let work = WORK_REGEX.find(after)?;
        if after[..work.start()].chars().count() > WORK_TOKEN_WINDOW {
            return None;
        }

        let mut end = project.end() + work.end();
        while let Some(next) = LEADING_WORK_REGEX.find(&line[end..]) {
            end += next.end();
        }

        Some(WorkToken {
            project: project.range(),
            work: project.end() + work.start()..end,
        })
    })
}

/// Byte offset just past a work token run opening the line.
pub fn leading_work_token(line: &str) -> Option<usize> {
    let first = LEADING_WORK_REGEX.find(line)?;
    let mut end = first.end();
    while let Some(next) = LEADING_WORK_REGEX.find(&line[end..]) {
        end += next.end();
    }
    Some(end)
}

/// Check if the project name is the last thing on a line.
pub fn ends_with_project(line: &str) -> bool {
    PROJECT_REGEX.find_iter(line).last().is_some_and(|m| {
        line[m.end()..]
            .chars()
            .all(|c| c.is_whitespace() || is_decorative(c))
    })
}

/// Check if a line closes the etext: it opens with "end" once decorative
/// characters are dropped, and names the project.
pub fn is_end_marker(line: &str) -> bool {
    let body = line.trim_start_matches(|c: char| c.is_whitespace() || is_decorative(c));
    body.get(..3).is_some_and(|head| head.eq_ignore_ascii_case("end")) && contains_project(body)
}
