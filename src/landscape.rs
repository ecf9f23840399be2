//! Proviral landscape tables: validation and per-sample track assembly.
//!
//! Input is a single CSV table with one row per aligned region. Validation
//! produces errors (the table cannot be plotted) and warnings (it can, but
//! some rows look suspicious). Assembly groups consecutive rows of the same
//! sample into one track.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::config::LandscapeConfig;
use crate::defect::{self, Defect};
use crate::error::{Error, LandscapeError};
use crate::lexer;
use crate::sections::{Row, read_table};

pub const SAMPLE: &str = "samp_name";
pub const REF_START: &str = "ref_start";
pub const REF_END: &str = "ref_end";
pub const DEFECT: &str = "defect";
pub const IS_DEFECTIVE: &str = "is_defective";
pub const IS_INVERTED: &str = "is_inverted";
pub const HIGHLIGHTED: &str = "highlighted";

pub const REQUIRED_COLUMNS: [&str; 6] = [
    SAMPLE,
    REF_START,
    REF_END,
    DEFECT,
    IS_DEFECTIVE,
    IS_INVERTED,
];

const BOOLEAN_COLUMNS: [&str; 2] = [IS_DEFECTIVE, IS_INVERTED];
const STANDARD_BOOLEANS: [&str; 6] = ["0", "1", "true", "false", "t", "f"];
const TRUTHY: [&str; 5] = ["1", "true", "t", "yes", "y"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One finding from [`validate`]. Row numbers are 1-based data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LandscapeIssue {
    NoHeader,
    MissingColumn {
        column: &'static str,
    },
    MissingSampleName {
        row: usize,
    },
    MissingCoordinates {
        row: usize,
    },
    NonIntegerCoordinates {
        row: usize,
        start: String,
        end: String,
    },
    NegativeCoordinates {
        row: usize,
        start: i64,
        end: i64,
    },
    StartNotBeforeEnd {
        row: usize,
        start: i64,
        end: i64,
    },
    EmptyDefect {
        row: usize,
    },
    NonStandardBoolean {
        row: usize,
        column: &'static str,
        value: String,
    },
}

impl LandscapeIssue {
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::NoHeader
            | Self::MissingColumn { .. }
            | Self::MissingSampleName { .. }
            | Self::MissingCoordinates { .. }
            | Self::NonIntegerCoordinates { .. } => Severity::Error,
            Self::NegativeCoordinates { .. }
            | Self::StartNotBeforeEnd { .. }
            | Self::EmptyDefect { .. }
            | Self::NonStandardBoolean { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for LandscapeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoHeader => write!(f, "No CSV header found or file is empty."),
            Self::MissingColumn { column } => write!(f, "Missing required column: '{column}'"),
            Self::MissingSampleName { row } => {
                write!(f, "Row {row}: missing sample name ('{SAMPLE}').")
            }
            Self::MissingCoordinates { row } => {
                write!(f, "Row {row}: missing '{REF_START}' or '{REF_END}'.")
            }
            Self::NonIntegerCoordinates { row, start, end } => write!(
                f,
                "Row {row}: '{REF_START}' and '{REF_END}' must be integers (got '{start}'/'{end}')."
            ),
            Self::NegativeCoordinates { row, start, end } => {
                write!(f, "Row {row}: start/end negative: {start}/{end}.")
            }
            Self::StartNotBeforeEnd { row, start, end } => write!(
                f,
                "Row {row}: '{REF_START}' >= '{REF_END}' ({start} >= {end})."
            ),
            Self::EmptyDefect { row } => write!(f, "Row {row}: empty '{DEFECT}' field."),
            Self::NonStandardBoolean { row, column, value } => write!(
                f,
                "Row {row}: column '{column}' has non-standard value '{value}'. Expected 0/1 or True/False."
            ),
        }
    }
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<LandscapeIssue>,
    pub warnings: Vec<LandscapeIssue>,
    /// Data rows looked at, blank ones included.
    pub inspected: usize,
}

impl ValidationReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, issue: LandscapeIssue) {
        match issue.severity() {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
    }
}

/// A header plus data rows read from landscape CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandscapeTable {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl LandscapeTable {
    /// Read normalized CSV text.
    pub fn read(text: &str) -> Result<Self, Error> {
        let (header, rows) = read_table(text)?;
        Ok(Self { header, rows })
    }

    /// Read and lex a CSV file.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        Self::read(&lexer::lex_path(path)?.text)
    }

    fn has_column(&self, column: &str) -> bool {
        self.header
            .iter()
            .any(|h| h.trim().eq_ignore_ascii_case(column))
    }
}

/// Check the header and up to `max_rows` data rows.
#[must_use]
pub fn validate(table: &LandscapeTable, max_rows: usize) -> ValidationReport {
    let mut report = ValidationReport::default();

    if table.header.iter().all(|h| h.trim().is_empty()) {
        report.push(LandscapeIssue::NoHeader);
        return report;
    }

    for column in REQUIRED_COLUMNS {
        if !table.has_column(column) {
            report.push(LandscapeIssue::MissingColumn { column });
        }
    }

    for (i, row) in table.rows.iter().take(max_rows).enumerate() {
        report.inspected += 1;
        if row.is_blank() {
            continue;
        }
        validate_row(i + 1, row, &mut report);
    }

    report
}

fn validate_row(row_num: usize, row: &Row, report: &mut ValidationReport) {
    if row.non_blank(SAMPLE).is_none() {
        report.push(LandscapeIssue::MissingSampleName { row: row_num });
    }

    let (Some(start), Some(end)) = (row.non_blank(REF_START), row.non_blank(REF_END)) else {
        report.push(LandscapeIssue::MissingCoordinates { row: row_num });
        return;
    };
    let (Ok(start), Ok(end)) = (start.parse::<i64>(), end.parse::<i64>()) else {
        report.push(LandscapeIssue::NonIntegerCoordinates {
            row: row_num,
            start: start.to_string(),
            end: end.to_string(),
        });
        return;
    };

    if start < 0 || end < 0 {
        report.push(LandscapeIssue::NegativeCoordinates {
            row: row_num,
            start,
            end,
        });
    }
    if start >= end {
        report.push(LandscapeIssue::StartNotBeforeEnd {
            row: row_num,
            start,
            end,
        });
    }

    if row.non_blank(DEFECT).is_none() {
        report.push(LandscapeIssue::EmptyDefect { row: row_num });
    }

    for column in BOOLEAN_COLUMNS {
        let Some(value) = row.non_blank(column) else {
            continue;
        };
        let lowered = value.to_lowercase();
        if !STANDARD_BOOLEANS.contains(&lowered.as_str()) {
            report.push(LandscapeIssue::NonStandardBoolean {
                row: row_num,
                column,
                value: value.to_string(),
            });
        }
    }
}

/// Loose boolean used by the `highlighted` column.
#[must_use]
pub fn is_truthy(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    TRUTHY.contains(&lowered.as_str())
}

/// One plotted interval, already clamped to the plot window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub start: u32,
    pub end: u32,
    pub defect: Defect,
    pub colour: &'static str,
    pub highlighted: bool,
}

/// All segments of one sample, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleTrack {
    pub sample: String,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub defect: Defect,
    pub colour: &'static str,
}

/// Render-ready proviral landscape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Landscape {
    pub start_pos: u32,
    pub end_pos: u32,
    pub tracks: Vec<SampleTrack>,
    pub legend: Vec<LegendEntry>,
}

impl Landscape {
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.tracks.iter().flat_map(|track| track.segments.iter())
    }
}

/// Group rows into sample tracks. Blank rows and `NonHIV` rows are skipped.
pub fn build(table: &LandscapeTable, config: &LandscapeConfig) -> Result<Landscape, LandscapeError> {
    let window = i64::from(config.start_pos)..=i64::from(config.end_pos);
    let clamp = |value: i64| value.clamp(*window.start(), *window.end()) as u32;

    let mut tracks: Vec<SampleTrack> = Vec::new();

    for (i, row) in table.rows.iter().enumerate() {
        if row.is_blank() {
            continue;
        }
        let defect_name = row.non_blank(DEFECT).unwrap_or_default();
        if defect_name == defect::NON_HIV {
            continue;
        }

        let start = coordinate(row, i + 1, REF_START)?;
        let end = coordinate(row, i + 1, REF_END)?;
        let defect = Defect::from_name(defect_name);
        let highlighted = row.get(HIGHLIGHTED).is_some_and(is_truthy);
        let colour = match defect.highlight_colour() {
            Some(highlight) if highlighted => highlight,
            _ => defect.colour(),
        };
        let segment = Segment {
            start: clamp(start),
            end: clamp(end),
            defect,
            colour,
            highlighted,
        };

        let sample = row.non_blank(SAMPLE).unwrap_or_default();
        match tracks.last_mut() {
            Some(track) if track.sample == sample => track.segments.push(segment),
            _ => tracks.push(SampleTrack {
                sample: sample.to_string(),
                segments: vec![segment],
            }),
        }
    }

    let seen = tracks
        .iter()
        .flat_map(|track| track.segments.iter().map(|segment| &segment.defect));
    let legend = defect::legend_order(seen)
        .into_iter()
        .map(|defect| LegendEntry {
            colour: defect.colour(),
            defect,
        })
        .collect();

    Ok(Landscape {
        start_pos: config.start_pos,
        end_pos: config.end_pos,
        tracks,
        legend,
    })
}

fn coordinate(row: &Row, row_num: usize, column: &'static str) -> Result<i64, LandscapeError> {
    let value = row.non_blank(column).unwrap_or_default();
    value
        .parse()
        .map_err(|_| LandscapeError::InvalidCoordinate {
            row: row_num,
            column,
            value: value.to_string(),
        })
}

/// Validate, then build if no errors were found. Warnings are returned
/// alongside the landscape.
pub fn assemble(
    table: &LandscapeTable,
    config: &LandscapeConfig,
) -> Result<(ValidationReport, Landscape), LandscapeError> {
    let report = validate(table, config.max_inspect_rows);
    if !report.is_ok() {
        return Err(LandscapeError::Rejected {
            errors: report.errors,
        });
    }
    let landscape = build(table, config)?;
    Ok((report, landscape))
}
