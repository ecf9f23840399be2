//! Error types for the isoplot library.
//!
//! Every validation failure is its own variant carrying the structured data a
//! caller needs to build a row-specific diagnostic. `Display` renders the
//! plain-text version of that diagnostic.

use std::fmt;

use thiserror::Error;

use crate::ast::SiteType;
use crate::colour::Colour;
use crate::landscape::LandscapeIssue;
use crate::sections::Row;

/// Errors that can occur anywhere in the isoplot pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The CSV reader rejected a section body.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// None of the candidate encodings could decode the input.
    #[error("could not decode input; tried encodings: {}", .tried.join(", "))]
    Decode { tried: Vec<&'static str> },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Landscape(#[from] LandscapeError),
}

/// Text surrounding a fragment token within its `fragments` cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentContext {
    pub previous: String,
    pub next: String,
}

impl fmt::Display for FragmentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|HERE|{}", self.previous, self.next)
    }
}

/// Syntactic errors raised while reading sections into the AST.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(
        "missing required [{section}] section; found sections: [{}]",
        .found.join(", ")
    )]
    MissingSection {
        section: &'static str,
        found: Vec<String>,
    },

    #[error(
        "multiple sections with the same name (case-insensitive): {}",
        format_groups(.duplicates)
    )]
    DuplicateSections { duplicates: Vec<Vec<String>> },

    #[error(
        "title section should contain at most one non-empty row, but found {}: {}",
        .rows.len(),
        format_groups(.rows)
    )]
    TitleTooManyRows { rows: Vec<Vec<String>> },

    #[error(
        "title row should contain exactly one non-empty value, but found {}",
        format_group(.row)
    )]
    TitleTooManyColumns { row: Vec<String> },

    #[error("missing 'fragments' field in transcript row; row data: {row}")]
    MissingFragments { row: Row },

    #[error("empty fragment string found\ncontext: {context}")]
    EmptyFragment { context: FragmentContext },

    #[error("invalid fragment string '{fragment}'; expected format 'start-end'\ncontext: {context}")]
    InvalidDashPattern {
        fragment: String,
        context: FragmentContext,
    },

    #[error("fragment start '{start}' is not a valid integer in fragment '{fragment}'\ncontext: {context}")]
    NotIntegerStart {
        start: String,
        fragment: String,
        context: FragmentContext,
    },

    #[error("fragment start {start} must be positive (>= 1) in fragment '{fragment}'\ncontext: {context}")]
    NotPositiveStart {
        start: u32,
        fragment: String,
        context: FragmentContext,
    },

    #[error("fragment end '{end}' is not a valid integer or 'end' keyword in fragment '{fragment}'\ncontext: {context}")]
    NotIntegerEnd {
        end: String,
        fragment: String,
        context: FragmentContext,
    },

    #[error("fragment end {end} must be positive (>= 1) in fragment '{fragment}'\ncontext: {context}")]
    NotPositiveEnd {
        end: u32,
        fragment: String,
        context: FragmentContext,
    },

    #[error("fragment end {end} cannot be less than start {start} in fragment '{fragment}'\ncontext: {context}")]
    EndLessThanStart {
        start: u32,
        end: u32,
        fragment: String,
        context: FragmentContext,
    },

    #[error("missing 'name' field in {site_type} row; row data: {row}")]
    MissingSiteName { site_type: SiteType, row: Row },

    #[error("missing 'position' field for {site_type} '{name}'; row data: {row}")]
    MissingSitePosition {
        site_type: SiteType,
        name: String,
        row: Row,
    },

    #[error(
        "invalid position '{position}' for {site_type} '{name}'; position must be a non-negative integer; row data: {row}"
    )]
    InvalidSitePosition {
        site_type: SiteType,
        name: String,
        position: String,
        row: Row,
    },

    #[error(
        "invalid colour '{colour}' for {site_type} '{name}'; allowed colours are: {}; row data: {row}",
        Colour::names().join(", ")
    )]
    InvalidSpliceSiteColour {
        site_type: SiteType,
        name: String,
        colour: String,
        row: Row,
    },
}

/// Semantic errors raised while compiling the AST.
///
/// Transcript and fragment numbers are 1-based, as shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(
        "duplicate {site_type} name '{name}' found at positions: {}; each {site_type} must have a unique name",
        format_positions(.positions)
    )]
    DuplicateSiteName {
        site_type: SiteType,
        name: String,
        positions: Vec<u32>,
    },

    #[error("transcript {transcript} has no fragments; each transcript must have at least one fragment")]
    EmptyTranscript { transcript: usize },

    #[error(
        "conflicting colours for fragment {fragment} in transcript {transcript}: \
         fragment {start}-{end} touches splice sites with different colours \
         (start {start} is '{start_colour}', end {end} is '{end_colour}')"
    )]
    ConflictingFragmentColours {
        transcript: usize,
        fragment: usize,
        start: u32,
        end: u32,
        start_colour: Colour,
        end_colour: Colour,
    },

    #[error(
        "invalid start for fragment {fragment} in transcript {transcript}: \
         position {start} is not 1 or an acceptor site; valid start positions: {}",
        format_positions(&sorted(.valid_starts))
    )]
    InvalidFragmentStart {
        transcript: usize,
        fragment: usize,
        start: u32,
        valid_starts: Vec<u32>,
    },

    #[error(
        "invalid end for fragment {fragment} in transcript {transcript}: \
         position {end} is not a donor site or the genome end; valid end positions: {}",
        format_positions(&sorted(.valid_ends))
    )]
    InvalidFragmentEnd {
        transcript: usize,
        fragment: usize,
        end: u32,
        valid_ends: Vec<u32>,
    },

    #[error(
        "fragment {fragment} in transcript {transcript} ends before it starts: \
         start {start} is past the genome end {end}"
    )]
    EndBeforeStart {
        transcript: usize,
        fragment: usize,
        start: u32,
        end: u32,
    },

    #[error(
        "overlapping fragments in transcript {transcript}: fragment {fragment} ({}-{}) overlaps \
         with fragment {} ({}-{}); a fragment must end before the next one starts",
        .current.0, .current.1, .fragment + 1, .next.0, .next.1
    )]
    OverlappingFragments {
        transcript: usize,
        fragment: usize,
        current: (u32, u32),
        next: (u32, u32),
    },
}

/// Errors raised while assembling a proviral landscape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LandscapeError {
    #[error("landscape input failed validation with {} error(s)", .errors.len())]
    Rejected { errors: Vec<LandscapeIssue> },

    #[error("row {row}: '{column}' must be an integer, got '{value}'")]
    InvalidCoordinate {
        row: usize,
        column: &'static str,
        value: String,
    },
}

fn format_group(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("'{v}'")).collect();
    format!("[{}]", quoted.join(", "))
}

fn format_groups(groups: &[Vec<String>]) -> String {
    let inner: Vec<String> = groups.iter().map(|g| format_group(g)).collect();
    format!("[{}]", inner.join(", "))
}

fn format_positions(positions: &[u32]) -> String {
    let parts: Vec<String> = positions.iter().map(u32::to_string).collect();
    parts.join(", ")
}

fn sorted(positions: &[u32]) -> Vec<u32> {
    let mut out = positions.to_vec();
    out.sort_unstable();
    out
}
