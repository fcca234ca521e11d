//! Rendering options and configuration.

use crate::error::{Error, Result};
use crate::model::{Block, Document};

/// Default marker written for break blocks.
pub const DEFAULT_BREAK_MARKER: &str = "* * *";

/// Options for rendering document content.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Include YAML frontmatter with metadata
    pub include_frontmatter: bool,

    /// Leave out the located header, small print and footer
    pub strip_envelope: bool,

    /// Preserve source line breaks inside paragraphs
    pub preserve_line_breaks: bool,

    /// Maximum heading level (1-6)
    pub max_heading_level: u8,

    /// Text written in place of a break block
    pub break_marker: String,

    /// Escape special Markdown characters
    pub escape_special_chars: bool,

    /// Collect extraction statistics during rendering
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum heading level.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, 6);
        self
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable envelope stripping.
    pub fn with_envelope_stripped(mut self, strip: bool) -> Self {
        self.strip_envelope = strip;
        self
    }

    /// Enable or disable line break preservation.
    pub fn with_line_breaks(mut self, preserve: bool) -> Self {
        self.preserve_line_breaks = preserve;
        self
    }

    /// Set the break marker.
    pub fn with_break_marker(mut self, marker: impl Into<String>) -> Self {
        self.break_marker = marker.into();
        self
    }

    /// Enable or disable Markdown escaping.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Enable statistics collection during rendering.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }

    /// Blocks to render, in order.
    ///
    /// With envelope stripping, blocks inside located regions are skipped,
    /// unless that would leave nothing at all (a header spanning the whole
    /// document). Fails when a located region ends past the last block,
    /// which only happens for documents assembled or deserialized by hand.
    pub fn select_blocks<'a>(&self, doc: &'a Document) -> Result<Vec<&'a Block>> {
        let len = doc.blocks.len();
        let regions = [
            doc.envelope.header,
            doc.envelope.small_print,
            doc.envelope.footer,
        ];
        if let Some(b) = regions.iter().flatten().find(|b| b.end > len || b.start > b.end) {
            return Err(Error::Precondition(format!(
                "envelope region {}..{} outside document of {} blocks",
                b.start, b.end, len
            )));
        }

        if self.strip_envelope && !doc.envelope.is_empty() {
            let body = doc.body();
            if !body.is_empty() {
                return Ok(body);
            }
            log::debug!("Envelope covers the whole document; rendering everything");
        }
        Ok(doc.blocks.iter().collect())
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_frontmatter: false,
            strip_envelope: false,
            preserve_line_breaks: false,
            max_heading_level: 6,
            break_marker: DEFAULT_BREAK_MARKER.to_string(),
            escape_special_chars: true,
            collect_stats: false,
        }
    }
}
