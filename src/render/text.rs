//! Plain text rendering for segmented documents.

use crate::error::Result;
use crate::model::{Block, Document};

use super::RenderOptions;

/// Convert a document to plain text.
///
/// Blocks are separated by a blank line. Paragraph lines are joined with a
/// space unless line breaks are preserved.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    let separator = if options.preserve_line_breaks { "\n" } else { " " };

    let output = options
        .select_blocks(doc)?
        .into_iter()
        .map(|block| match block {
            Block::Break { .. } => options.break_marker.clone(),
            _ => block
                .lines()
                .iter()
                .map(|l| l.trimmed())
                .collect::<Vec<_>>()
                .join(separator),
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(output.trim().to_string())
}
