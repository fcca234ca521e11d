//! Markdown rendering for segmented documents.

use crate::error::Result;
use crate::model::{Block, Document, HeadingKind, Line};

use super::{ExtractionStats, RenderOptions, RenderResult};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Convert a document to Markdown with statistics.
pub fn to_markdown_with_stats(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render_with_stats(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
    stats: ExtractionStats,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            stats: ExtractionStats::new(),
        }
    }

    /// Render a document to Markdown.
    pub fn render(mut self, doc: &Document) -> Result<String> {
        self.render_internal(doc)
    }

    /// Render a document to Markdown with extraction statistics.
    pub fn render_with_stats(mut self, doc: &Document) -> Result<RenderResult> {
        self.options.collect_stats = true;
        let content = self.render_internal(doc)?;
        Ok(RenderResult::new(content, doc.metadata.clone(), self.stats))
    }

    fn render_internal(&mut self, doc: &Document) -> Result<String> {
        let mut output = String::new();

        if self.options.include_frontmatter && !doc.metadata.is_empty() {
            output.push_str(&doc.metadata.to_yaml_frontmatter());
            output.push('\n');
        }

        for block in self.options.select_blocks(doc)? {
            if self.options.collect_stats {
                self.stats.add_block(block);
            }
            self.render_block(&mut output, block);
        }

        Ok(output.trim().to_string())
    }

    fn render_block(&self, output: &mut String, block: &Block) {
        match block {
            Block::Paragraph { lines } => {
                self.render_lines(output, lines);
                output.push_str("\n\n");
            }
            Block::Heading { kind, lines } => self.render_heading(output, *kind, lines),
            Block::Break { .. } => {
                output.push_str(&self.options.break_marker);
                output.push_str("\n\n");
            }
        }
    }

    fn render_heading(&self, output: &mut String, kind: HeadingKind, lines: &[Line]) {
        let level = kind.level().min(self.options.max_heading_level).max(1);
        output.push_str(&"#".repeat(level as usize));
        output.push(' ');

        // A heading is always one Markdown line
        let text = lines.iter().map(|l| l.trimmed()).collect::<Vec<_>>().join(" ");
        output.push_str(&self.escape(&text));
        output.push_str("\n\n");
    }

    fn render_lines(&self, output: &mut String, lines: &[Line]) {
        let separator = if self.options.preserve_line_breaks {
            "  \n"
        } else {
            " "
        };
        let text = lines
            .iter()
            .map(|l| self.escape(l.trimmed()))
            .collect::<Vec<_>>()
            .join(separator);
        output.push_str(&text);
    }

    fn escape(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }
}

/// Escape special Markdown characters.
/// Only escape characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    // A leading '#' would turn body text into a heading
    if result.starts_with('#') {
        result.insert(0, '\\');
    }
    result
}
