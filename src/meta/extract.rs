//! Bibliographic field extraction from the header region.
//!
//! Title and author are recovered by ordered rule tables: each rule is an
//! independent function over the [`HeaderText`], the first one producing a
//! value wins, and the winning rule is logged.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::header::{HeaderLine, HeaderText};
use super::property::{property, trim_decorative};
use super::tidy::{tidy, tidy_author, tidy_title};
use super::tokens::{contains_project, ends_with_project, find_work_token, leading_work_token};
use crate::model::{Block, Envelope, Metadata};
use crate::parser::{ends_with_dependent_punctuation, is_decorative};

/// Longest line accepted as a global `By ...` author line.
pub const MAX_BY_LINE_LEN: usize = 128;

/// A named extraction strategy.
pub type Rule = (&'static str, fn(&HeaderText) -> Option<String>);

/// Title strategies in priority order.
pub const TITLE_RULES: &[Rule] = &[
    ("title property", title_property),
    ("work token", title_after_work_token),
    ("work token lookback", title_after_split_work_token),
];

/// Author strategies in priority order.
pub const AUTHOR_RULES: &[Rule] = &[
    ("author property", author_property),
    ("by after work token", author_after_work_token),
    ("possessive title", author_from_possessive_title),
    ("by after title", author_after_title),
];

/// Words that never end a complete title.
const CONNECTOR_WORDS: &[&str] = &[
    "of", "and", "the", "a", "an", "in", "on", "to", "for", "with", "or", "at", "from", "into",
    "upon", "&",
];

/// Author values that are really sentence fragments.
const REJECTED_AUTHORS: &[&str] = &["himself", "herself", "author", "several"];

static LEADING_WORDS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:\s*\b(?:of|is|from|the)\b)+").unwrap());

static TRANSITION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\bpresents?|\be-?texts?\s+of|\be-?books?\s+of|\bedition\s+of|\bbook\s+of|\brelease\s+of|\bversion\s+of|\bentitled)\W*$")
        .unwrap()
});

static BY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|[\s*,])by(?:[\s*]+|$)").unwrap());

static BY_LINE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\W*by\s+(\S.*)$").unwrap());

static EDITED_BY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bedited\s+by\s+(\S.*)$").unwrap());

static GLOBAL_BY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^By\s+(\S.*)$").unwrap());

static POSSESSIVE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)['\x{2019}]s\s+\S").unwrap());

static SKIPPED_DESCRIPTION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)should\s+be\s+named|copyright\s+laws\s+are\s+changing").unwrap());

static EBOOK_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[\s*e-?(?:book|text)\s*#\s*(\d+)\s*\]").unwrap());

/// Extracts [`Metadata`] from a document's header.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract metadata from the header ranges of a located envelope.
    ///
    /// Without a header every field is absent.
    pub fn extract(&self, blocks: &[Block], envelope: &Envelope) -> Metadata {
        let ranges = envelope.header_ranges();
        if ranges.is_empty() {
            return Metadata::default();
        }
        let header = HeaderText::from_blocks(blocks, &ranges);
        self.extract_from_header(&header)
    }

    /// Extract every field from a header.
    pub fn extract_from_header(&self, header: &HeaderText) -> Metadata {
        Metadata {
            title: title(header),
            author: author(header),
            description: description(header),
            language: language(header),
            release_date: release_date(header),
            ebook_number: ebook_number(header),
        }
    }
}

/// Work title.
pub fn title(header: &HeaderText) -> Option<String> {
    apply_rules("title", TITLE_RULES, header)
}

/// Work author.
///
/// A `By ...` line anywhere in the header replaces the rule result when it
/// strictly extends it.
pub fn author(header: &HeaderText) -> Option<String> {
    let found = apply_rules("author", AUTHOR_RULES, header)?;

    let extended = header
        .lines()
        .iter()
        .filter(|l| l.text.chars().count() < MAX_BY_LINE_LEN && !contains_project(&l.text))
        .filter_map(|l| GLOBAL_BY_REGEX.captures(&l.text))
        .map(|caps| tidy_author(&caps[1]))
        .find(|candidate| candidate.len() > found.len() && candidate.contains(found.as_str()));

    match extended {
        Some(candidate) => {
            log::debug!("author extended by global By line: {:?}", candidate);
            Some(candidate)
        }
        None => Some(found),
    }
}

/// Header lines without the filename and copyright notices, joined.
pub fn description(header: &HeaderText) -> Option<String> {
    let parts: Vec<&str> = header
        .lines()
        .iter()
        .filter(|l| !SKIPPED_DESCRIPTION_REGEX.is_match(&l.text))
        .map(|l| trim_decorative(&l.text))
        .filter(|t| !t.is_empty())
        .collect();
    non_empty(parts.join(" "))
}

/// Declared language.
pub fn language(header: &HeaderText) -> Option<String> {
    property(header, "Language").and_then(|v| non_empty(tidy(&v)))
}

/// Declared release date.
///
/// Accepts "March 1, 1994", "March, 1994" and "March 1994"; a date without a
/// day is taken as the first of the month.
pub fn release_date(header: &HeaderText) -> Option<NaiveDate> {
    let value = property(header, "Release Date")?;
    let value = value.split('[').next().unwrap_or_default().trim();
    parse_release_date(value)
}

/// Catalogue number from an `[EBook #N]` or `[Etext #N]` tag.
pub fn ebook_number(header: &HeaderText) -> Option<u32> {
    header
        .lines()
        .iter()
        .find_map(|l| EBOOK_NUMBER_REGEX.captures(&l.text))
        .and_then(|caps| caps[1].parse().ok())
}

fn parse_release_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%B %d, %Y") {
        return Some(date);
    }
    let month_year = value.replace(',', " ");
    let month_year = month_year.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDate::parse_from_str(&format!("1 {}", month_year), "%d %B %Y").ok()
}

fn apply_rules(field: &str, rules: &[Rule], header: &HeaderText) -> Option<String> {
    rules.iter().find_map(|(name, rule)| {
        let value = rule(header)?;
        log::debug!("{} from rule '{}': {:?}", field, name, value);
        Some(value)
    })
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

// Title rules

fn title_property(header: &HeaderText) -> Option<String> {
    property(header, "Title").and_then(|v| non_empty(tidy_title(&v)))
}

fn title_after_work_token(header: &HeaderText) -> Option<String> {
    header.lines().iter().enumerate().find_map(|(i, line)| {
        let token = find_work_token(&line.text)?;
        title_from(header, i, token.rest(&line.text))
    })
}

/// Project name closing one line, work token opening the next.
fn title_after_split_work_token(header: &HeaderText) -> Option<String> {
    (1..header.len()).find_map(|i| {
        if !ends_with_project(header.text(i - 1)?) {
            return None;
        }
        let line = header.text(i)?;
        let offset = leading_work_token(line)?;
        title_from(header, i, &line[offset..])
    })
}

/// Title from the text following a work token on line `index`.
fn title_from(header: &HeaderText, index: usize, rest: &str) -> Option<String> {
    let line = header.text(index)?;
    let rest = trim_decorative(LEADING_WORDS_REGEX.replace(rest, "").as_ref()).to_string();
    let rest = trim_decorative(before_last_by(&rest)).to_string();

    let raw = if rest.is_empty() || TRANSITION_REGEX.is_match(line) {
        header.text(index + 1)?.to_string()
    } else if continues(&rest, line) {
        match header.next_in_block(index) {
            Some(next) => format!("{} {}", rest, trim_decorative(next)),
            None => rest,
        }
    } else {
        rest
    };
    non_empty(tidy_title(&raw))
}

/// Text before the last delimited "by" that has an author after it, so a
/// title containing "by" keeps it.
fn before_last_by(text: &str) -> &str {
    BY_REGEX
        .find_iter(text)
        .filter(|m| !text[m.end()..].trim().is_empty())
        .last()
        .map_or(text, |m| &text[..m.start()])
}

/// Check if a title fragment runs on into the next line.
fn continues(fragment: &str, line: &str) -> bool {
    let last_word = fragment
        .split_whitespace()
        .last()
        .unwrap_or_default()
        .to_lowercase();
    CONNECTOR_WORDS.contains(&last_word.as_str())
        || ends_with_dependent_punctuation(fragment)
        || is_wrapped(line)
}

/// Check if a line opens and closes with decorative characters.
fn is_wrapped(line: &str) -> bool {
    let trimmed = line.trim();
    let decorative = |c: Option<char>| c.is_some_and(is_decorative);
    decorative(trimmed.chars().next()) && decorative(trimmed.chars().last())
}

// Author rules

fn author_property(header: &HeaderText) -> Option<String> {
    ["Author", "Authors"]
        .iter()
        .filter_map(|name| property(header, name))
        .find_map(|v| accept_author(&v))
}

fn author_after_work_token(header: &HeaderText) -> Option<String> {
    header.lines().iter().enumerate().find_map(|(i, line)| {
        let token = find_work_token(&line.text)?;
        let rest = token.rest(&line.text);
        let by = BY_REGEX.find_iter(rest).last()?;
        let after = rest[by.end()..].trim();
        if after.is_empty() {
            accept_author(header.text(i + 1)?)
        } else {
            accept_author(after)
        }
    })
}

fn author_from_possessive_title(header: &HeaderText) -> Option<String> {
    let title = title(header)?;
    let caps = POSSESSIVE_REGEX.captures(&title)?;
    accept_author(&caps[1])
}

/// `by X` on a line after the title line, else `edited by X` anywhere.
fn author_after_title(header: &HeaderText) -> Option<String> {
    let title_line = header
        .lines()
        .iter()
        .position(|l| find_work_token(&l.text).is_some())
        .map_or(0, |i| i + 1);

    let outside_boilerplate = |l: &&HeaderLine| !contains_project(&l.text);

    header.lines()[title_line.min(header.len())..]
        .iter()
        .filter(outside_boilerplate)
        .find_map(|l| BY_LINE_REGEX.captures(&l.text))
        .and_then(|caps| accept_author(&caps[1]))
        .or_else(|| {
            header
                .lines()
                .iter()
                .filter(outside_boilerplate)
                .find_map(|l| EDITED_BY_REGEX.captures(&l.text))
                .and_then(|caps| accept_author(&caps[1]))
        })
}

fn accept_author(raw: &str) -> Option<String> {
    let author = tidy_author(raw);
    if author.is_empty() || REJECTED_AUTHORS.iter().any(|r| author.eq_ignore_ascii_case(r)) {
        return None;
    }
    Some(author)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Boundary;

    fn header(paragraphs: &[&str]) -> HeaderText {
        HeaderText::from_paragraphs(paragraphs)
    }

    #[test]
    fn test_evangeline() {
        let h = header(&["The Project Gutenberg Etext of Evangeline, by Henry W. Longfellow"]);
        assert_eq!(title(&h).as_deref(), Some("Evangeline"));
        assert!(author(&h).unwrap().contains("Henry W. Longfellow"));
    }

    #[test]
    fn test_properties_win() {
        let h = header(&[
            "The Project Gutenberg EBook of Pride and Prejudice, by Jane Austen",
            "Title: Pride and Prejudice\nAuthor: Jane Austen\nLanguage: English",
        ]);
        let metadata = MetadataExtractor::new().extract_from_header(&h);
        assert_eq!(metadata.title.as_deref(), Some("Pride and Prejudice"));
        assert_eq!(metadata.author.as_deref(), Some("Jane Austen"));
        assert_eq!(metadata.language.as_deref(), Some("English"));
    }

    #[test]
    fn test_rejected_property_falls_through() {
        let h = header(&[
            "Author: Several",
            "Project Gutenberg's Etext of Collected Essays, by Various Hands",
        ]);
        assert_eq!(author(&h).as_deref(), Some("Various Hands"));
    }

    #[test]
    fn test_transition_takes_next_line() {
        let h = header(&["The Project Gutenberg Etext of", "THE TIME MACHINE", "by H. G. Wells"]);
        assert_eq!(title(&h).as_deref(), Some("THE TIME MACHINE"));
        assert_eq!(author(&h).as_deref(), Some("H. G. Wells"));

        let h = header(&["Project Gutenberg Etext presents", "Walden"]);
        assert_eq!(title(&h).as_deref(), Some("Walden"));
    }

    #[test]
    fn test_connector_merges_continuation() {
        let h = header(&["The Project Gutenberg Etext of The Adventures of\nTom Sawyer"]);
        assert_eq!(title(&h).as_deref(), Some("Adventures of Tom Sawyer"));
    }

    #[test]
    fn test_lookback_across_lines() {
        let h = header(&["This is the Project Gutenberg\nEtext of Walden, by Henry David Thoreau"]);
        assert_eq!(title(&h).as_deref(), Some("Walden"));
    }

    #[test]
    fn test_by_at_line_end_takes_next_line() {
        let h = header(&["The Project Gutenberg Etext of Hamlet, by\nWilliam Shakespeare"]);
        assert_eq!(title(&h).as_deref(), Some("Hamlet"));
        assert_eq!(author(&h).as_deref(), Some("William Shakespeare"));
    }

    #[test]
    fn test_decorated_continuation_line() {
        let h = header(&["**The Project Gutenberg Etext of The Tragedy of**\n**Julius Caesar**"]);
        assert_eq!(title(&h).as_deref(), Some("Tragedy of Julius Caesar"));
    }

    #[test]
    fn test_title_containing_by() {
        let h = header(&["The Project Gutenberg Etext of Stand by Me, by Stephen King"]);
        assert_eq!(title(&h).as_deref(), Some("Stand by Me"));
        assert_eq!(author(&h).as_deref(), Some("Stephen King"));
    }

    #[test]
    fn test_degenerate_authors_rejected() {
        for name in ["Himself", "herself", "AUTHOR"] {
            let line = format!("The Project Gutenberg Etext of Memoirs, by {}", name);
            let h = header(&[line.as_str()]);
            assert_eq!(author(&h), None, "accepted {:?}", name);
        }

        let h = header(&["Author: Author", "Project Gutenberg Etext of Walden, by Henry David Thoreau"]);
        assert_eq!(author(&h).as_deref(), Some("Henry David Thoreau"));
    }

    #[test]
    fn test_possessive_title_author() {
        let h = header(&["Project Gutenberg Etext of Shakespeare's Sonnets"]);
        assert_eq!(author(&h).as_deref(), Some("Shakespeare"));
    }

    #[test]
    fn test_global_by_extends_author() {
        let h = header(&[
            "The Project Gutenberg Etext of Leaves of Grass, by Whitman",
            "By Walt Whitman",
        ]);
        assert_eq!(author(&h).as_deref(), Some("Walt Whitman"));
    }

    #[test]
    fn test_edited_by() {
        let h = header(&["Project Gutenberg Etext", "A Book of Verses", "Edited by John Smith"]);
        assert_eq!(author(&h).as_deref(), Some("John Smith"));
    }

    #[test]
    fn test_description_skips_notices() {
        let h = header(&[
            "** Evangeline **",
            "Copyright laws are changing all over the world.",
            "This file should be named evang10.txt",
            "An etext for everyone",
        ]);
        assert_eq!(
            description(&h).as_deref(),
            Some("Evangeline An etext for everyone")
        );
    }

    #[test]
    fn test_release_date_and_number() {
        let h = header(&["Release Date: March, 1994  [EBook #1]"]);
        assert_eq!(release_date(&h), NaiveDate::from_ymd_opt(1994, 3, 1));
        assert_eq!(ebook_number(&h), Some(1));

        let h = header(&["Release Date: January 26, 2008 [Etext #1342]"]);
        assert_eq!(release_date(&h), NaiveDate::from_ymd_opt(2008, 1, 26));
        assert_eq!(ebook_number(&h), Some(1342));
    }

    #[test]
    fn test_no_header_no_metadata() {
        let blocks = vec![Block::paragraph(&["Just some text."])];
        let metadata = MetadataExtractor::new().extract(&blocks, &Envelope::default());
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_extract_from_envelope() {
        let blocks = vec![
            Block::paragraph(&["The Project Gutenberg Etext of Evangeline, by Henry W. Longfellow"]),
            Block::paragraph(&["This is the poem."]),
        ];
        let envelope = Envelope {
            header: Some(Boundary::new(0, 1)),
            ..Default::default()
        };
        let metadata = MetadataExtractor::new().extract(&blocks, &envelope);
        assert_eq!(metadata.title.as_deref(), Some("Evangeline"));
        assert!(metadata.description.unwrap().starts_with("The Project Gutenberg"));
    }
}
