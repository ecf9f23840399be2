//! Lex → parse → compile in one call.

use std::io::Read;
use std::path::Path;

use crate::compiler::{Compiled, compile_with};
use crate::error::Error;
use crate::lexer::{self, Encoding, Lexed};
use crate::parser::{parse, unrecognized_sections};
use crate::sections::Sections;

/// A compiled plot plus the encoding its input was decoded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub compiled: Compiled,
    pub encoding: Encoding,
    /// Sections that were present but not read.
    pub unrecognized_sections: Vec<String>,
}

fn run_lexed(lexed: Lexed, genome_end: u32) -> Result<Output, Error> {
    let sections = Sections::read(&lexed.text);
    let ast = parse(&sections)?;
    let compiled = compile_with(&ast, genome_end)?;
    Ok(Output {
        compiled,
        encoding: lexed.encoding,
        unrecognized_sections: unrecognized_sections(&sections),
    })
}

/// Compile raw bytes, e.g. an uploaded file.
pub fn run_bytes(bytes: &[u8], genome_end: u32) -> Result<Output, Error> {
    run_lexed(lexer::lex_bytes(bytes)?, genome_end)
}

pub fn run_reader<R: Read>(reader: R, genome_end: u32) -> Result<Output, Error> {
    run_lexed(lexer::lex_reader(reader)?, genome_end)
}

pub fn run_path(path: &Path, genome_end: u32) -> Result<Output, Error> {
    run_lexed(lexer::lex_path(path)?, genome_end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CompileError, ParseError};
    use crate::nl43::{EXAMPLE_CSV, GENOME_END};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn example_through_every_entry_point() {
        let from_bytes = run_bytes(EXAMPLE_CSV.as_bytes(), GENOME_END).unwrap();
        assert_eq!(from_bytes.compiled.transcripts.len(), 12);

        let from_reader = run_reader(EXAMPLE_CSV.as_bytes(), GENOME_END).unwrap();
        assert_eq!(from_reader, from_bytes);

        let mut f = NamedTempFile::new().unwrap();
        f.write_all(EXAMPLE_CSV.as_bytes()).unwrap();
        let from_path = run_path(f.path(), GENOME_END).unwrap();
        assert_eq!(from_path, from_bytes);
    }

    #[test]
    fn windows_export_with_bom_and_crlf() {
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend(EXAMPLE_CSV.replace('\n', "\r\n").into_bytes());
        let output = run_bytes(&bytes, GENOME_END).unwrap();
        assert_eq!(output.encoding, Encoding::Utf8Sig);
        assert_eq!(output.compiled.title.as_deref(), Some("My plot A"));
    }

    #[test]
    fn bracketed_title_is_reported_as_a_section() {
        let text = EXAMPLE_CSV.replace("My plot A", "[Draft]");
        let output = run_bytes(text.as_bytes(), GENOME_END).unwrap();
        assert_eq!(output.compiled.title, None);
        assert_eq!(output.unrecognized_sections, vec!["Draft".to_string()]);

        let clean = run_bytes(EXAMPLE_CSV.as_bytes(), GENOME_END).unwrap();
        assert!(clean.unrecognized_sections.is_empty());
    }

    #[test]
    fn cp1252_labels() {
        let bytes: Vec<u8> = EXAMPLE_CSV
            .replace(",vif,", ",<vif>,")
            .bytes()
            .map(|b| match b {
                b'<' => 0x93,
                b'>' => 0x94,
                _ => b,
            })
            .collect();

        let output = run_bytes(&bytes, GENOME_END).unwrap();
        assert_eq!(output.encoding, Encoding::Windows1252);
        assert_eq!(
            output.compiled.transcripts[0].label.as_deref(),
            Some("\u{201C}vif\u{201D}")
        );
    }

    #[test]
    fn custom_genome_end() {
        let input = "[donors]\nname,position\n[acceptors]\nname,position\n[transcripts]\nfragments\n1-end\n";
        let output = run_bytes(input.as_bytes(), 500).unwrap();
        assert_eq!(output.compiled.transcripts[0].fragments[0].end, 500);
    }

    #[test]
    fn errors_carry_their_stage() {
        let missing = run_bytes(b"[donors]\nname,position\n", GENOME_END).unwrap_err();
        assert!(matches!(
            missing,
            Error::Parse(ParseError::MissingSection {
                section: "transcripts",
                ..
            })
        ));

        let input = "[donors]\nname,position\nD1,743\n[acceptors]\nname,position\n[transcripts]\nfragments\n1-800\n";
        let invalid = run_bytes(input.as_bytes(), GENOME_END).unwrap_err();
        assert!(matches!(
            invalid,
            Error::Compile(CompileError::InvalidFragmentEnd { end: 800, .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_path(&dir.path().join("absent.csv"), GENOME_END).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
