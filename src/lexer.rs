//! Input normalization: text decoding and line-ending cleanup.
//!
//! The lexer has no knowledge of sections or columns. It turns whatever the
//! user uploaded into one `\n`-terminated UTF-8 string for the section reader.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::Error;

/// Text encodings tried, in order, when decoding raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// UTF-8 with an optional byte-order mark (Excel, modern tools).
    Utf8Sig,
    /// UTF-8 without a byte-order mark.
    Utf8,
    /// Windows Western European; five byte values are undefined.
    Windows1252,
    /// ISO 8859-1; accepts every byte sequence.
    Latin1,
}

/// Candidate encodings. The last entry never fails.
pub const ENCODINGS: [Encoding; 4] = [
    Encoding::Utf8Sig,
    Encoding::Utf8,
    Encoding::Windows1252,
    Encoding::Latin1,
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Code points for bytes 0x80..=0x9F in Windows-1252. `None` is undefined.
const WINDOWS_1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

impl Encoding {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8Sig => "utf-8-sig",
            Self::Utf8 => "utf-8",
            Self::Windows1252 => "cp1252",
            Self::Latin1 => "latin-1",
        }
    }

    /// Decode `bytes`, or `None` if they are not valid in this encoding.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                String::from_utf8(body.to_vec()).ok()
            }
            Self::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
            Self::Windows1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => WINDOWS_1252_HIGH[usize::from(b - 0x80)],
                    _ => Some(char::from(b)),
                })
                .collect(),
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Normalized input text and the encoding it was decoded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexed {
    pub text: String,
    pub encoding: Encoding,
}

/// Decode bytes with the first candidate encoding that accepts them.
pub fn decode_bytes(bytes: &[u8]) -> Result<(String, Encoding), Error> {
    decode_with(bytes, &ENCODINGS)
}

fn decode_with(bytes: &[u8], candidates: &[Encoding]) -> Result<(String, Encoding), Error> {
    candidates
        .iter()
        .find_map(|&enc| enc.decode(bytes).map(|text| (text, enc)))
        .ok_or_else(|| Error::Decode {
            tried: candidates.iter().map(|e| e.name()).collect(),
        })
}

/// Convert `\r\n` and lone `\r` line endings to `\n`.
///
/// CRLF is replaced first so a Windows line ending yields a single newline.
#[must_use]
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Lex raw bytes (an upload or file contents).
pub fn lex_bytes(bytes: &[u8]) -> Result<Lexed, Error> {
    let (text, encoding) = decode_bytes(bytes)?;
    Ok(Lexed {
        text: normalize_line_endings(&text),
        encoding,
    })
}

/// Lex text that is already decoded; only line endings are normalized.
#[must_use]
pub fn lex_str(text: &str) -> Lexed {
    Lexed {
        text: normalize_line_endings(text),
        encoding: Encoding::Utf8,
    }
}

/// Read a byte stream to the end and lex it.
pub fn lex_reader<R: Read>(mut reader: R) -> Result<Lexed, Error> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    lex_bytes(&bytes)
}

/// Read a file and lex it.
pub fn lex_path(path: &Path) -> Result<Lexed, Error> {
    let bytes = fs::read(path)?;
    lex_bytes(&bytes)
}
