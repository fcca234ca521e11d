//! Flattened line view of the header region.

use crate::model::{Block, Boundary};

/// One header line with the index of the block it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine {
    /// Trimmed line text
    pub text: String,
    /// Index of the source block in the document
    pub block: usize,
}

/// The header region as a flat sequence of non-blank lines.
///
/// Metadata rules look at lines, not blocks, but some of them only merge a
/// continuation when it belongs to the same paragraph, so each line keeps
/// its block index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderText {
    lines: Vec<HeaderLine>,
}

impl HeaderText {
    /// Collect the lines of the given block ranges, in order.
    ///
    /// Ranges are clamped to the block slice.
    pub fn from_blocks(blocks: &[Block], ranges: &[Boundary]) -> Self {
        let mut lines = Vec::new();
        for range in ranges {
            let end = range.end.min(blocks.len());
            for index in range.start.min(end)..end {
                for line in blocks[index].lines() {
                    if line.is_blank() {
                        continue;
                    }
                    lines.push(HeaderLine {
                        text: line.trimmed().to_string(),
                        block: index,
                    });
                }
            }
        }
        Self { lines }
    }

    /// Build directly from strings, one block per string; lines split on `\n`.
    pub fn from_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> Self {
        let lines = paragraphs
            .iter()
            .enumerate()
            .flat_map(|(block, text)| {
                text.as_ref()
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(move |l| HeaderLine {
                        text: l.to_string(),
                        block,
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        Self { lines }
    }

    /// All header lines.
    pub fn lines(&self) -> &[HeaderLine] {
        &self.lines
    }

    /// Text of the line at `index`.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|l| l.text.as_str())
    }

    /// The line after `index` if it belongs to the same block.
    pub fn next_in_block(&self, index: usize) -> Option<&str> {
        let current = self.lines.get(index)?;
        self.lines
            .get(index + 1)
            .filter(|next| next.block == current.block)
            .map(|next| next.text.as_str())
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the header holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
