//! Parse-time value types.
//!
//! These records are produced once by the parser and only read afterwards.

use std::fmt;

use serde::Serialize;

use crate::colour::Colour;

/// Which side of an intron a splice site marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteType {
    Donor,
    Acceptor,
}

impl fmt::Display for SiteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Donor => write!(f, "donor"),
            Self::Acceptor => write!(f, "acceptor"),
        }
    }
}

/// End coordinate of a fragment as written in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentEnd {
    Position(u32),
    /// The `end` keyword: extends to the genome's terminal coordinate.
    GenomeEnd,
}

impl FragmentEnd {
    #[must_use]
    pub fn resolve(self, genome_end: u32) -> u32 {
        match self {
            Self::Position(pos) => pos,
            Self::GenomeEnd => genome_end,
        }
    }
}

/// Inclusive genomic interval `[start, end]` of one transcript part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start: u32,
    pub end: FragmentEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub fragments: Vec<Fragment>,
    pub label: Option<String>,
    pub group: Option<String>,
    pub comment: Option<String>,
}

/// A named donor or acceptor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceSite {
    pub name: String,
    pub position: u32,
    pub colour: Option<Colour>,
}

/// Syntactically valid contents of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast {
    pub title: Option<String>,
    pub transcripts: Vec<Transcript>,
    pub donors: Vec<SpliceSite>,
    pub acceptors: Vec<SpliceSite>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_end() {
        assert_eq!(FragmentEnd::Position(743).resolve(9632), 743);
        assert_eq!(FragmentEnd::GenomeEnd.resolve(9632), 9632);
    }

    #[test]
    fn site_type_display() {
        assert_eq!(SiteType::Donor.to_string(), "donor");
        assert_eq!(SiteType::Acceptor.to_string(), "acceptor");
    }
}
