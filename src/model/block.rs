//! Block-level types produced by segmentation.

use super::Line;
use serde::{Deserialize, Serialize};

/// Heading classification of a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingKind {
    /// Ordinary body text
    #[default]
    None,
    /// A work title (short all-capitals line)
    Title,
    /// Chapter, book, part, act and similar numbered divisions
    Chapter,
    /// A bare numeral subdivision such as "IV."
    Sub,
    /// Named front/back matter: preface, contents, epilogue, ...
    Other,
}

impl HeadingKind {
    /// Check if this kind marks a heading at all.
    pub fn is_heading(&self) -> bool {
        !matches!(self, HeadingKind::None)
    }

    /// Markdown heading level used when rendering.
    pub fn level(&self) -> u8 {
        match self {
            HeadingKind::Title => 1,
            HeadingKind::Chapter | HeadingKind::Other => 2,
            HeadingKind::Sub => 3,
            HeadingKind::None => 0,
        }
    }
}

/// A content block of the segmented document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of body text, one entry per source line
    Paragraph {
        /// Lines of the paragraph
        lines: Vec<Line>,
    },

    /// A heading
    Heading {
        /// Heading classification
        kind: HeadingKind,
        /// Lines of the heading
        lines: Vec<Line>,
    },

    /// A decorative divider line
    Break {
        /// The divider as it appeared in the source
        line: Line,
    },
}

impl Block {
    /// Create a paragraph from plain strings, numbering lines from 1.
    pub fn paragraph<S: AsRef<str>>(lines: &[S]) -> Self {
        Block::Paragraph {
            lines: numbered(lines),
        }
    }

    /// Create a heading from plain strings, numbering lines from 1.
    pub fn heading<S: AsRef<str>>(kind: HeadingKind, lines: &[S]) -> Self {
        Block::Heading {
            kind,
            lines: numbered(lines),
        }
    }

    /// Lines held by this block.
    pub fn lines(&self) -> &[Line] {
        match self {
            Block::Paragraph { lines } | Block::Heading { lines, .. } => lines,
            Block::Break { line } => std::slice::from_ref(line),
        }
    }

    /// Plain text with source line breaks preserved.
    pub fn plain_text(&self) -> String {
        self.lines()
            .iter()
            .map(|l| l.trimmed())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Heading kind, or `HeadingKind::None` for non-heading blocks.
    pub fn heading_kind(&self) -> HeadingKind {
        match self {
            Block::Heading { kind, .. } => *kind,
            _ => HeadingKind::None,
        }
    }

    /// Check if this block is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Block::Paragraph { .. })
    }

    /// Check if this block is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading { .. })
    }

    /// Check if this block is a break.
    pub fn is_break(&self) -> bool {
        matches!(self, Block::Break { .. })
    }
}

fn numbered<S: AsRef<str>>(lines: &[S]) -> Vec<Line> {
    lines
        .iter()
        .enumerate()
        .map(|(i, text)| Line::new(i + 1, text))
        .collect()
}
