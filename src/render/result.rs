//! Rendering result with metadata and statistics.

use crate::model::{Block, Metadata};
use serde::{Deserialize, Serialize};

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (Markdown, text, etc.)
    pub content: String,

    /// Document metadata (copied from source document)
    pub metadata: Metadata,

    /// Extraction statistics
    pub stats: ExtractionStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, metadata: Metadata, stats: ExtractionStats) -> Self {
        Self {
            content,
            metadata,
            stats,
        }
    }
}

/// Statistics collected during rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Number of paragraphs rendered
    pub paragraph_count: u32,

    /// Number of headings rendered
    pub heading_count: u32,

    /// Number of breaks rendered
    pub break_count: u32,

    /// Number of source lines in rendered blocks
    pub line_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of blocks counted.
    pub fn block_count(&self) -> u32 {
        self.paragraph_count + self.heading_count + self.break_count
    }

    /// Count a block and its text.
    pub fn add_block(&mut self, block: &Block) {
        match block {
            Block::Paragraph { .. } => self.paragraph_count += 1,
            Block::Heading { .. } => self.heading_count += 1,
            Block::Break { .. } => {
                self.break_count += 1;
                self.line_count += 1;
                return;
            }
        }
        self.line_count += block.lines().len() as u32;
        self.count_text(&block.plain_text());
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.paragraph_count += other.paragraph_count;
        self.heading_count += other.heading_count;
        self.break_count += other.break_count;
        self.line_count += other.line_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingKind;

    #[test]
    fn test_extraction_stats_count_text() {
        let mut stats = ExtractionStats::new();
        stats.count_text("Hello, world! This is a test.");

        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.char_count, 24);
    }

    #[test]
    fn test_add_block() {
        let mut stats = ExtractionStats::new();
        stats.add_block(&Block::heading(HeadingKind::Chapter, &["CHAPTER I"]));
        stats.add_block(&Block::paragraph(&["It was a dark", "and stormy night."]));
        stats.add_block(&Block::Break {
            line: crate::model::Line::new(9, "**********"),
        });

        assert_eq!(stats.block_count(), 3);
        assert_eq!(stats.line_count, 4);
        assert_eq!(stats.word_count, 9);
    }

    #[test]
    fn test_extraction_stats_merge() {
        let mut stats1 = ExtractionStats {
            paragraph_count: 5,
            break_count: 2,
            ..Default::default()
        };
        let stats2 = ExtractionStats {
            paragraph_count: 3,
            heading_count: 4,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.paragraph_count, 8);
        assert_eq!(stats1.heading_count, 4);
        assert_eq!(stats1.break_count, 2);
    }
}
