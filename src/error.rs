//! Error types for untxt library.

use std::io;
use thiserror::Error;

/// Result type alias for untxt operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while segmenting a text document.
///
/// Heuristic non-matches (no title, no header, ...) are never errors; they
/// show up as `None` fields on the returned document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the line source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input bytes could not be decoded as text.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A required anchor for the operation is missing.
    #[error("Precondition not met: {0}")]
    Precondition(String),

    /// Error during rendering (Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Precondition("preload window holds no lines".to_string());
        assert_eq!(
            err.to_string(),
            "Precondition not met: preload window holds no lines"
        );

        let err = Error::Encoding("invalid UTF-16 sequence".to_string());
        assert_eq!(err.to_string(), "Encoding error: invalid UTF-16 sequence");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
