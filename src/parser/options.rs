//! Parsing options and configuration.

use super::buffer::DEFAULT_PRELOAD_LINES;

/// Options for parsing text documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode for undecodable input
    pub error_mode: ErrorMode,

    /// What to extract from the document
    pub extract_mode: ExtractMode,

    /// Number of lines read ahead for calibration
    pub preload_lines: usize,

    /// Whether batch parsing may use parallel processing
    pub parallel: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (replace undecodable bytes instead of failing).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable strict mode (fail on undecodable bytes).
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Set extract mode.
    pub fn with_extract_mode(mut self, mode: ExtractMode) -> Self {
        self.extract_mode = mode;
        self
    }

    /// Segment only, skipping envelope location and metadata.
    pub fn segment_only(mut self) -> Self {
        self.extract_mode = ExtractMode::SegmentOnly;
        self
    }

    /// Set the calibration window size in lines.
    pub fn with_preload_lines(mut self, lines: usize) -> Self {
        self.preload_lines = lines;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Whether undecodable input is replaced rather than rejected.
    pub fn is_lossy(&self) -> bool {
        self.error_mode == ErrorMode::Lenient
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            extract_mode: ExtractMode::Full,
            preload_lines: DEFAULT_PRELOAD_LINES,
            parallel: true,
        }
    }
}

/// Error handling mode during decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on undecodable input
    Strict,
    /// Replace undecodable sequences and continue
    #[default]
    Lenient,
}

/// What to extract from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Blocks, envelope and metadata
    #[default]
    Full,
    /// Blocks only
    SegmentOnly,
}
