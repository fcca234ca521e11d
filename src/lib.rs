//! # untxt
//!
//! Structure recovery for unformatted plain-text documents.
//!
//! This library turns a plain-text stream into paragraphs, headings and
//! breaks, locates the legal front and back matter of Project
//! Gutenberg-style etexts, and extracts bibliographic metadata from it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use untxt::{parse_file, render};
//!
//! fn main() -> untxt::Result<()> {
//!     // Parse a text file
//!     let doc = parse_file("evangeline.txt")?;
//!
//!     // Convert to Markdown
//!     let options = render::RenderOptions::default();
//!     let markdown = render::to_markdown(&doc, &options)?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Line-spacing calibration**: single, double and ragged layouts
//! - **Paragraph sensing**: paragraphs without blank-line separators
//! - **Envelope location**: header, small print and footer
//! - **Metadata extraction**: title, author, language, release date
//! - **Multiple output formats**: Markdown, plain text, JSON
//! - **Parallel processing**: Uses Rayon for batches of documents

pub mod detect;
pub mod error;
pub mod meta;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_encoding_from_bytes, detect_encoding_from_path, TextEncoding};
pub use error::{Error, Result};
pub use meta::{BoundaryLocator, MetadataExtractor};
pub use model::{
    Block, Boundary, Document, Envelope, HeadingKind, Line, LineSpacingProfile, Metadata,
};
pub use parser::{
    DefaultLineClassifier, LineBuffer, LineClassifier, ParagraphSegmenter, ParseOptions,
    TextParser,
};
pub use render::{ExtractionStats, JsonFormat, RenderOptions, RenderResult};

use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Parse a text file and return a segmented document.
///
/// # Example
///
/// ```no_run
/// use untxt::parse_file;
///
/// let doc = parse_file("evangeline.txt").unwrap();
/// println!("Blocks: {}", doc.block_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let parser = TextParser::open(path)?;
    parser.parse()
}

/// Parse a text file with custom options.
///
/// # Example
///
/// ```no_run
/// use untxt::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new()
///     .strict()
///     .segment_only();
/// let doc = parse_file_with_options("notes.txt", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let parser = TextParser::open_with_options(path, options)?;
    parser.parse()
}

/// Parse text that is already in memory.
pub fn parse_str(text: &str) -> Result<Document> {
    TextParser::from_str(text).parse()
}

/// Parse in-memory text with custom options.
pub fn parse_str_with_options(text: &str, options: ParseOptions) -> Result<Document> {
    TextParser::from_str_with_options(text, options).parse()
}

/// Parse text from bytes, detecting the encoding.
///
/// # Example
///
/// ```no_run
/// use untxt::parse_bytes;
///
/// let data = std::fs::read("evangeline.txt").unwrap();
/// let doc = parse_bytes(&data).unwrap();
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    let parser = TextParser::from_bytes(data)?;
    parser.parse()
}

/// Parse text from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Document> {
    let parser = TextParser::from_bytes_with_options(data, options)?;
    parser.parse()
}

/// Parse text from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    let parser = TextParser::from_reader(reader)?;
    parser.parse()
}

/// Parse text from a reader with custom options.
pub fn parse_reader_with_options<R: Read>(reader: R, options: ParseOptions) -> Result<Document> {
    let parser = TextParser::from_reader_with_options(reader, options)?;
    parser.parse()
}

/// Parse several files, one result per path in input order.
///
/// Files are processed in parallel unless `options.parallel` is off.
pub fn parse_files<P>(paths: &[P], options: &ParseOptions) -> Vec<Result<Document>>
where
    P: AsRef<Path> + Sync,
{
    log::debug!(
        "Parsing {} files ({})",
        paths.len(),
        if options.parallel { "parallel" } else { "sequential" }
    );

    if options.parallel {
        paths
            .par_iter()
            .map(|p| parse_file_with_options(p, options.clone()))
            .collect()
    } else {
        paths
            .iter()
            .map(|p| parse_file_with_options(p, options.clone()))
            .collect()
    }
}

/// Extract bibliographic metadata from a text file.
///
/// # Example
///
/// ```no_run
/// use untxt::extract_metadata;
///
/// let metadata = extract_metadata("evangeline.txt").unwrap();
/// println!("{:?}", metadata.title);
/// ```
pub fn extract_metadata<P: AsRef<Path>>(path: P) -> Result<Metadata> {
    let doc = parse_file(path)?;
    Ok(doc.metadata)
}

/// Extract plain text from a text file, one blank line between blocks.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    Ok(doc.plain_text())
}

/// Convert a text file to Markdown.
///
/// # Example
///
/// ```no_run
/// use untxt::to_markdown;
///
/// let markdown = to_markdown("evangeline.txt").unwrap();
/// std::fs::write("evangeline.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    let options = RenderOptions::default();
    render::to_markdown(&doc, &options)
}

/// Convert a text file to Markdown with custom options.
///
/// # Example
///
/// ```no_run
/// use untxt::{to_markdown_with_options, RenderOptions};
///
/// let options = RenderOptions::new()
///     .with_frontmatter(true)
///     .with_envelope_stripped(true);
/// let markdown = to_markdown_with_options("evangeline.txt", &options).unwrap();
/// ```
pub fn to_markdown_with_options<P: AsRef<Path>>(
    path: P,
    options: &RenderOptions,
) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_markdown(&doc, options)
}

/// Convert a text file to reflowed plain text.
pub fn to_text<P: AsRef<Path>>(path: P, options: &RenderOptions) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_text(&doc, options)
}

/// Convert a text file to JSON.
///
/// # Example
///
/// ```no_run
/// use untxt::{to_json, JsonFormat};
///
/// let json = to_json("evangeline.txt", JsonFormat::Pretty).unwrap();
/// std::fs::write("evangeline.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_json(&doc, format)
}

/// Builder for parsing and converting text documents.
///
/// # Example
///
/// ```no_run
/// use untxt::Untxt;
///
/// let markdown = Untxt::new()
///     .with_frontmatter()
///     .strip_envelope()
///     .parse("evangeline.txt")?
///     .to_markdown()?;
/// # Ok::<(), untxt::Error>(())
/// ```
pub struct Untxt {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl Untxt {
    /// Create a new Untxt builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Fail on undecodable bytes instead of replacing them.
    pub fn strict(mut self) -> Self {
        self.parse_options = self.parse_options.strict();
        self
    }

    /// Segment only, without envelope or metadata.
    pub fn segment_only(mut self) -> Self {
        self.parse_options = self.parse_options.segment_only();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parse_options = self.parse_options.sequential();
        self
    }

    /// Set the calibration window size in lines.
    pub fn with_preload_lines(mut self, lines: usize) -> Self {
        self.parse_options = self.parse_options.with_preload_lines(lines);
        self
    }

    /// Enable frontmatter in output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Leave the envelope out of rendered output.
    pub fn strip_envelope(mut self) -> Self {
        self.render_options = self.render_options.with_envelope_stripped(true);
        self
    }

    /// Keep source line breaks inside paragraphs.
    pub fn with_line_breaks(mut self) -> Self {
        self.render_options = self.render_options.with_line_breaks(true);
        self
    }

    /// Set the break marker.
    pub fn with_break_marker(mut self, marker: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_break_marker(marker);
        self
    }

    /// Parse a text file and return a result wrapper.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<UntxtResult> {
        let parser = TextParser::open_with_options(path, self.parse_options)?;
        let document = parser.parse()?;
        Ok(UntxtResult {
            document,
            render_options: self.render_options,
        })
    }

    /// Parse text from bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<UntxtResult> {
        let parser = TextParser::from_bytes_with_options(data, self.parse_options)?;
        let document = parser.parse()?;
        Ok(UntxtResult {
            document,
            render_options: self.render_options,
        })
    }

    /// Parse in-memory text.
    pub fn parse_str(self, text: &str) -> Result<UntxtResult> {
        let document = TextParser::from_str_with_options(text, self.parse_options).parse()?;
        Ok(UntxtResult {
            document,
            render_options: self.render_options,
        })
    }

    /// Parse several files, keeping each file's path alongside its result.
    pub fn parse_all(self, paths: &[PathBuf]) -> Vec<(PathBuf, Result<UntxtResult>)> {
        let results = parse_files(paths, &self.parse_options);
        paths
            .iter()
            .cloned()
            .zip(results)
            .map(|(path, result)| {
                let result = result.map(|document| UntxtResult {
                    document,
                    render_options: self.render_options.clone(),
                });
                (path, result)
            })
            .collect()
    }
}

impl Default for Untxt {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of parsing a text document.
pub struct UntxtResult {
    /// The parsed document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl UntxtResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to Markdown with extraction statistics.
    pub fn to_markdown_with_stats(&self) -> Result<RenderResult> {
        render::to_markdown_with_stats(&self.document, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get plain text with source line breaks.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Get the metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.document.metadata
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
