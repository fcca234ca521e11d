//! Plain-text document parser.

use std::io::{self, Read};
use std::path::Path;

use crate::detect::{decode_bytes, TextEncoding};
use crate::error::{Error, Result};
use crate::meta::{BoundaryLocator, MetadataExtractor};
use crate::model::Document;

use super::buffer::LineBuffer;
use super::calibrate::{BlankRunCollapser, LineStatisticsSampler};
use super::classify::{DefaultLineClassifier, LineClassifier};
use super::options::{ExtractMode, ParseOptions};
use super::segmenter::ParagraphSegmenter;

/// Plain-text document parser.
///
/// Runs the whole pipeline over one document: preload and calibrate, segment
/// into blocks, then locate the envelope and extract metadata.
pub struct TextParser {
    text: String,
    encoding: TextEncoding,
    options: ParseOptions,
    classifier: Box<dyn LineClassifier>,
}

impl TextParser {
    /// Open a text file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a text file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        log::debug!("Read {} bytes from {}", data.len(), path.as_ref().display());
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse text from bytes of any supported encoding.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse text from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let (text, encoding) = decode_bytes(data, options.is_lossy())?;
        Ok(Self::with_text(text, encoding, options))
    }

    /// Parse text from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse text from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse already decoded text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        Self::from_str_with_options(text, ParseOptions::default())
    }

    /// Parse already decoded text with custom options.
    pub fn from_str_with_options(text: &str, options: ParseOptions) -> Self {
        Self::with_text(text.to_string(), TextEncoding::Utf8, options)
    }

    fn with_text(text: String, encoding: TextEncoding, options: ParseOptions) -> Self {
        Self {
            text,
            encoding,
            options,
            classifier: Box::new(DefaultLineClassifier::new()),
        }
    }

    /// Replace the line classifier.
    pub fn with_classifier(mut self, classifier: Box<dyn LineClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Encoding the input was decoded from.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Options in use.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse the document and return a structured Document.
    pub fn parse(&self) -> Result<Document> {
        self.parse_lines(self.text.lines().map(|line| Ok(line.to_string())))
    }

    /// Run the pipeline over an arbitrary line source.
    ///
    /// The source is read once; I/O errors from it propagate unchanged.
    pub fn parse_lines<I>(&self, lines: I) -> Result<Document>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        if self.options.preload_lines == 0 {
            return Err(Error::Precondition(
                "calibration needs a preload window of at least one line".to_string(),
            ));
        }

        let mut buffer = LineBuffer::with_capacity(lines, self.options.preload_lines);
        buffer.preload()?;
        BlankRunCollapser::new().collapse(buffer.window_mut());
        let profile = LineStatisticsSampler::new().calibrate(buffer.window());

        let segmenter = ParagraphSegmenter::new(self.classifier.as_ref(), profile);
        let blocks = segmenter.segment(&mut buffer)?;

        let mut document = Document {
            blocks,
            profile,
            ..Default::default()
        };

        if self.options.extract_mode == ExtractMode::Full {
            document.envelope = BoundaryLocator::new().locate(&document.blocks);
            document.metadata =
                MetadataExtractor::new().extract(&document.blocks, &document.envelope);
        }

        log::debug!(
            "Parsed {} blocks from {} lines",
            document.block_count(),
            buffer.lines_read()
        );
        Ok(document)
    }
}
