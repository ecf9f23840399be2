//! Multi-section CSV reader.
//!
//! A file is split into blocks introduced by `[name]` header lines. Each
//! block body is independently readable as CSV, either as raw records or as
//! header-keyed rows.

use std::fmt;

use csv::ReaderBuilder;

use crate::error::Error;

/// One CSV data row keyed by its header columns, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    #[must_use]
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Value for `column`, matching header names trimmed and case-insensitively.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(column))
            .map(|(_, value)| value.as_str())
    }

    /// Trimmed value for `column`, with blank mapped to `None`.
    #[must_use]
    pub fn non_blank(&self, column: &str) -> Option<&str> {
        self.get(column).map(str::trim).filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, value)| value.trim().is_empty())
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{key}': '{value}'")?;
        }
        write!(f, "}}")
    }
}

/// A named block of CSV text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Name as declared between the brackets, surrounding whitespace removed.
    pub name: String,
    /// 1-based line number of the `[name]` header.
    pub line: usize,
    body: String,
}

impl Section {
    /// Raw CSV records, without header interpretation.
    pub fn records(&self) -> Result<Vec<Vec<String>>, Error> {
        read_records(&self.body)
    }

    /// Data rows keyed by the section's first record.
    pub fn rows(&self) -> Result<Vec<Row>, Error> {
        Ok(read_table(&self.body)?.1)
    }
}

/// All sections of one input, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    sections: Vec<Section>,
}

impl Sections {
    /// Split normalized text into sections. Lines before the first header are ignored.
    #[must_use]
    pub fn read(text: &str) -> Self {
        let mut sections = Vec::new();
        let mut current: Option<Section> = None;

        for (line_num, line) in text.split('\n').enumerate() {
            if let Some(name) = section_header(line) {
                sections.extend(current.take());
                current = Some(Section {
                    name: name.to_string(),
                    line: line_num + 1,
                    body: String::new(),
                });
            } else if let Some(section) = current.as_mut() {
                section.body.push_str(line);
                section.body.push('\n');
            }
        }
        sections.extend(current);

        Self { sections }
    }

    /// Section names, case preserved, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }
}

/// Recognize `[name]`, tolerating surrounding whitespace and the trailing
/// commas spreadsheet exports add to pad every line to the same width.
fn section_header(line: &str) -> Option<&str> {
    let trimmed = line.trim().trim_end_matches(',').trim_end();
    let inner = trimmed.strip_prefix('[')?.strip_suffix(']')?;
    let name = inner.trim();
    if name.is_empty() { None } else { Some(name) }
}

/// Read CSV text into raw records. Empty lines produce no record.
pub fn read_records(text: &str) -> Result<Vec<Vec<String>>, Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_string).collect());
    }
    Ok(records)
}

/// Read CSV text whose first record is a header. Returns the header and
/// the data rows; missing trailing cells are absent from a row.
pub fn read_table(text: &str) -> Result<(Vec<String>, Vec<Row>), Error> {
    let mut records = read_records(text)?.into_iter();
    let header = match records.next() {
        Some(header) => header,
        None => return Ok((Vec::new(), Vec::new())),
    };

    let rows = records
        .map(|values| {
            let fields = values
                .into_iter()
                .enumerate()
                .map(|(i, value)| (header.get(i).cloned().unwrap_or_default(), value))
                .collect();
            Row::new(fields)
        })
        .collect();

    Ok((header, rows))
}
