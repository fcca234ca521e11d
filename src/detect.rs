//! Text encoding detection and decoding.

use crate::error::{Error, Result};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Encoding of a text source, as detected from its leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 with a byte-order mark
    Utf8Bom,
    /// UTF-8 without a byte-order mark
    Utf8,
    /// UTF-16 little endian (BOM `FF FE`)
    Utf16Le,
    /// UTF-16 big endian (BOM `FE FF`)
    Utf16Be,
    /// Single-byte Windows-1252 / Latin-1 fallback
    Windows1252,
}

impl TextEncoding {
    /// Length of the byte-order mark for this encoding.
    pub fn bom_len(&self) -> usize {
        match self {
            TextEncoding::Utf8Bom => 3,
            TextEncoding::Utf16Le | TextEncoding::Utf16Be => 2,
            TextEncoding::Utf8 | TextEncoding::Windows1252 => 0,
        }
    }

    fn codec(&self) -> &'static Encoding {
        match self {
            TextEncoding::Utf8 | TextEncoding::Utf8Bom => UTF_8,
            TextEncoding::Utf16Le => UTF_16LE,
            TextEncoding::Utf16Be => UTF_16BE,
            TextEncoding::Windows1252 => WINDOWS_1252,
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TextEncoding::Utf8Bom => "UTF-8 (BOM)",
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf16Le => "UTF-16LE",
            TextEncoding::Utf16Be => "UTF-16BE",
            TextEncoding::Windows1252 => "Windows-1252",
        };
        f.write_str(name)
    }
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// How many leading bytes are inspected when sniffing a file.
const SNIFF_LEN: usize = 4096;

/// Detect the encoding of a file from its first bytes.
pub fn detect_encoding_from_path<P: AsRef<Path>>(path: P) -> Result<TextEncoding> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file).take(SNIFF_LEN as u64);
    let mut head = Vec::with_capacity(SNIFF_LEN);
    reader.read_to_end(&mut head)?;
    // The sniffed prefix may cut a multi-byte sequence in half
    Ok(detect(&head, true))
}

/// Detect the encoding of a complete byte slice.
///
/// A byte-order mark wins. Without one, the data is UTF-8 if it validates,
/// otherwise Windows-1252. A multi-byte sequence cut off at the end counts
/// as invalid, since the slice is the whole input.
pub fn detect_encoding_from_bytes(data: &[u8]) -> TextEncoding {
    detect(data, false)
}

fn detect(data: &[u8], prefix: bool) -> TextEncoding {
    if data.starts_with(UTF8_BOM) {
        return TextEncoding::Utf8Bom;
    }
    if data.starts_with(UTF16_LE_BOM) {
        return TextEncoding::Utf16Le;
    }
    if data.starts_with(UTF16_BE_BOM) {
        return TextEncoding::Utf16Be;
    }

    match std::str::from_utf8(data) {
        Ok(_) => TextEncoding::Utf8,
        // error_len() is None when the input ends in the middle of a sequence
        Err(e) if prefix && e.error_len().is_none() => TextEncoding::Utf8,
        Err(_) => TextEncoding::Windows1252,
    }
}

/// Decode bytes into a string, returning the detected encoding.
///
/// With `lossy` set, invalid sequences become U+FFFD; otherwise they are an
/// [`Error::Encoding`].
pub fn decode_bytes(data: &[u8], lossy: bool) -> Result<(String, TextEncoding)> {
    let encoding = detect_encoding_from_bytes(data);
    let body = &data[encoding.bom_len()..];
    let codec = encoding.codec();

    let text = if lossy {
        let (text, had_errors) = codec.decode_without_bom_handling(body);
        if had_errors {
            log::warn!("Input contained undecodable {} sequences", encoding);
        }
        text.into_owned()
    } else {
        codec
            .decode_without_bom_handling_and_without_replacement(body)
            .ok_or_else(|| Error::Encoding(format!("malformed {} input", encoding)))?
            .into_owned()
    };

    Ok((text, encoding))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_boms() {
        assert_eq!(
            detect_encoding_from_bytes(b"\xEF\xBB\xBFhello"),
            TextEncoding::Utf8Bom
        );
        assert_eq!(
            detect_encoding_from_bytes(b"\xFF\xFEh\x00"),
            TextEncoding::Utf16Le
        );
        assert_eq!(
            detect_encoding_from_bytes(b"\xFE\xFF\x00h"),
            TextEncoding::Utf16Be
        );
    }

    #[test]
    fn test_detect_plain_utf8_and_fallback() {
        assert_eq!(detect_encoding_from_bytes(b"plain ascii"), TextEncoding::Utf8);
        assert_eq!(
            detect_encoding_from_bytes("caf\u{e9}".as_bytes()),
            TextEncoding::Utf8
        );
        assert_eq!(
            detect_encoding_from_bytes(b"caf\xE9 au lait"),
            TextEncoding::Windows1252
        );
    }

    #[test]
    fn test_truncated_utf8_prefix_is_still_utf8() {
        // "é" is C3 A9; cut after the lead byte
        assert_eq!(detect(b"caf\xC3", true), TextEncoding::Utf8);
        assert_eq!(detect_encoding_from_bytes(b"caf\xC3"), TextEncoding::Windows1252);
    }

    #[test]
    fn test_truncated_utf8_tail_decodes_strictly() {
        let (text, encoding) = decode_bytes(b"Hello world \xE2\x80", false).unwrap();
        assert_eq!(encoding, TextEncoding::Windows1252);
        assert!(text.starts_with("Hello world "));
    }

    #[test]
    fn test_sniffed_file_tolerates_cut_sequence() {
        let mut data = vec![b'a'; SNIFF_LEN - 1];
        data.extend_from_slice("\u{e9}".as_bytes());
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, &data).unwrap();

        assert_eq!(detect_encoding_from_path(file.path()).unwrap(), TextEncoding::Utf8);
    }

    #[test]
    fn test_decode_lossy_replaces_lone_surrogate() {
        let (text, encoding) = decode_bytes(&[0xFF, 0xFE, b'a', 0x00, 0x00, 0xD8], true).unwrap();
        assert_eq!(encoding, TextEncoding::Utf16Le);
        assert_eq!(text, "a\u{FFFD}");
    }

    #[test]
    fn test_decode_utf16_le() {
        let data = b"\xFF\xFEH\x00i\x00";
        let (text, encoding) = decode_bytes(data, false).unwrap();
        assert_eq!(text, "Hi");
        assert_eq!(encoding, TextEncoding::Utf16Le);
    }

    #[test]
    fn test_decode_windows_1252_quotes() {
        let (text, encoding) = decode_bytes(b"\x93quoted\x94 caf\xE9", false).unwrap();
        assert_eq!(text, "\u{201C}quoted\u{201D} caf\u{e9}");
        assert_eq!(encoding, TextEncoding::Windows1252);
    }

    #[test]
    fn test_decode_strips_utf8_bom() {
        let (text, _) = decode_bytes(b"\xEF\xBB\xBFTitle: X", false).unwrap();
        assert_eq!(text, "Title: X");
    }

    #[test]
    fn test_decode_odd_utf16_strict_fails() {
        let result = decode_bytes(b"\xFF\xFEH\x00i", false);
        assert!(matches!(result, Err(Error::Encoding(_))));
    }
}
