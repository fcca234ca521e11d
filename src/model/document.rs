//! Document-level types.

use super::Block;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A segmented text document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Bibliographic metadata recovered from the front matter
    pub metadata: Metadata,

    /// Blocks in source order
    pub blocks: Vec<Block>,

    /// Located front-matter and back-matter regions
    pub envelope: Envelope,

    /// Formatting conventions inferred during calibration
    pub profile: LineSpacingProfile,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the document has any blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks outside the header, small print and footer.
    pub fn body(&self) -> Vec<&Block> {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.envelope.contains(*i))
            .map(|(_, b)| b)
            .collect()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Inferred line-spacing conventions of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpacingProfile {
    /// Physical lines (blanks included) making up one logical line, >= 1
    pub line_spacing: usize,

    /// Whether paragraph ends are inferred from line lengths
    pub paragraph_sensing: bool,
}

impl LineSpacingProfile {
    /// Profile for single-spaced text with blank-line paragraph breaks.
    pub const SINGLE: LineSpacingProfile = LineSpacingProfile {
        line_spacing: 1,
        paragraph_sensing: false,
    };

    /// Create a profile; spacing is clamped to at least 1.
    pub fn new(line_spacing: usize, paragraph_sensing: bool) -> Self {
        Self {
            line_spacing: line_spacing.max(1),
            paragraph_sensing,
        }
    }
}

impl Default for LineSpacingProfile {
    fn default() -> Self {
        Self::SINGLE
    }
}

/// A half-open range `[start, end)` of block indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    /// First block index (inclusive)
    pub start: usize,
    /// Last block index (exclusive)
    pub end: usize,
}

impl Boundary {
    /// Create a boundary.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of blocks covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the range covers no blocks.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if a block index falls inside the range.
    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }
}

/// Front-matter and back-matter regions of a document.
///
/// The header may be split: a small-print section located after the header
/// end is reported separately and logically belongs to the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Leading boilerplate
    pub header: Option<Boundary>,

    /// Legal small print found apart from the header
    pub small_print: Option<Boundary>,

    /// Trailing boilerplate
    pub footer: Option<Boundary>,
}

impl Envelope {
    /// Check if nothing was located.
    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.small_print.is_none() && self.footer.is_none()
    }

    /// Ranges that make up the logical header, in document order.
    pub fn header_ranges(&self) -> Vec<Boundary> {
        self.header.iter().chain(self.small_print.iter()).copied().collect()
    }

    /// Check if a block index belongs to any located region.
    pub fn contains(&self, index: usize) -> bool {
        [self.header, self.small_print, self.footer]
            .iter()
            .flatten()
            .any(|b| b.contains(index))
    }
}

/// Bibliographic metadata.
///
/// Every field is independently optional; absence is the common outcome on
/// atypical input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Work title
    pub title: Option<String>,

    /// Work author
    pub author: Option<String>,

    /// Free-text description built from the header
    pub description: Option<String>,

    /// Language as declared in the header
    pub language: Option<String>,

    /// Release date as declared in the header
    pub release_date: Option<NaiveDate>,

    /// Etext catalogue number, e.g. 1 for "[EBook #1]"
    pub ebook_number: Option<u32>,
}

impl Metadata {
    /// Check if no field was recovered.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.description.is_none()
            && self.language.is_none()
            && self.release_date.is_none()
            && self.ebook_number.is_none()
    }

    /// Convert metadata to YAML frontmatter format.
    pub fn to_yaml_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];

        if let Some(ref title) = self.title {
            lines.push(format!("title: \"{}\"", escape_yaml(title)));
        }
        if let Some(ref author) = self.author {
            lines.push(format!("author: \"{}\"", escape_yaml(author)));
        }
        if let Some(ref language) = self.language {
            lines.push(format!("language: \"{}\"", escape_yaml(language)));
        }
        if let Some(ref date) = self.release_date {
            lines.push(format!("release_date: {}", date.format("%Y-%m-%d")));
        }
        if let Some(number) = self.ebook_number {
            lines.push(format!("ebook_number: {}", number));
        }
        if let Some(ref description) = self.description {
            lines.push(format!("description: \"{}\"", escape_yaml(description)));
        }

        lines.push("---".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.profile, LineSpacingProfile::SINGLE);
    }

    #[test]
    fn test_metadata_frontmatter() {
        let metadata = Metadata {
            title: Some("Evangeline".to_string()),
            author: Some("Henry W. Longfellow".to_string()),
            release_date: NaiveDate::from_ymd_opt(1993, 8, 1),
            ebook_number: Some(1),
            ..Default::default()
        };

        let yaml = metadata.to_yaml_frontmatter();
        assert!(yaml.contains("title: \"Evangeline\""));
        assert!(yaml.contains("author: \"Henry W. Longfellow\""));
        assert!(yaml.contains("release_date: 1993-08-01"));
        assert!(yaml.contains("ebook_number: 1"));
        assert!(!yaml.contains("language"));
    }

    #[test]
    fn test_empty_metadata() {
        assert!(Metadata::default().is_empty());
    }

    #[test]
    fn test_envelope_contains() {
        let envelope = Envelope {
            header: Some(Boundary::new(0, 3)),
            small_print: None,
            footer: Some(Boundary::new(8, 10)),
        };
        assert!(envelope.contains(1));
        assert!(!envelope.contains(5));
        assert!(envelope.contains(9));
        assert!(!Envelope::default().contains(0));
    }

    #[test]
    fn test_body_skips_small_print() {
        let doc = Document {
            blocks: ["header", "legal", "legal", "body", "more body", "footer"]
                .iter()
                .map(|t| Block::paragraph(&[*t]))
                .collect(),
            envelope: Envelope {
                header: Some(Boundary::new(0, 1)),
                small_print: Some(Boundary::new(1, 3)),
                footer: Some(Boundary::new(5, 6)),
            },
            ..Default::default()
        };
        let body: Vec<String> = doc.body().iter().map(|b| b.plain_text()).collect();
        assert_eq!(body, vec!["body", "more body"]);
    }

    #[test]
    fn test_header_ranges_order() {
        let envelope = Envelope {
            header: Some(Boundary::new(0, 5)),
            small_print: Some(Boundary::new(40, 60)),
            footer: None,
        };
        let ranges = envelope.header_ranges();
        assert_eq!(ranges, vec![Boundary::new(0, 5), Boundary::new(40, 60)]);
    }

    #[test]
    fn test_profile_clamps_spacing() {
        assert_eq!(LineSpacingProfile::new(0, true).line_spacing, 1);
    }
}
