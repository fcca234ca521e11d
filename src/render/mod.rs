//! Rendering module for converting documents to various output formats.

mod json;
mod markdown;
mod options;
mod result;
mod text;

pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, to_markdown_with_stats, MarkdownRenderer};
pub use options::{RenderOptions, DEFAULT_BREAK_MARKER};
pub use result::{ExtractionStats, RenderResult};
pub use text::to_text;
