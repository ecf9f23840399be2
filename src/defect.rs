//! Proviral defect categories and their plot colours.

use std::fmt;

use serde::{Serialize, Serializer};

/// Defect label that marks non-HIV sequence; such rows are not plotted.
pub const NON_HIV: &str = "NonHIV";

/// Fill colour for categories without an assigned colour.
pub const NEUTRAL_COLOUR: &str = "#999999";

/// Proviral defect category from the `defect` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Defect {
    Intact,
    InferredIntact,
    Hypermut,
    LargeDeletion,
    InternalInversion,
    FiveDefect,
    /// Any label outside the known set, kept verbatim.
    Other(String),
}

/// Known categories in legend order.
const KNOWN: [Defect; 6] = [
    Defect::Intact,
    Defect::InferredIntact,
    Defect::Hypermut,
    Defect::LargeDeletion,
    Defect::InternalInversion,
    Defect::FiveDefect,
];

impl Defect {
    /// Map a `defect` cell to a category. Matching is exact.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Intact" => Self::Intact,
            "Inferred_Intact" => Self::InferredIntact,
            "Hypermut" => Self::Hypermut,
            "LargeDeletion" => Self::LargeDeletion,
            "InternalInversion" => Self::InternalInversion,
            "5DEFECT" => Self::FiveDefect,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Intact => "Intact",
            Self::InferredIntact => "Inferred_Intact",
            Self::Hypermut => "Hypermut",
            Self::LargeDeletion => "LargeDeletion",
            Self::InternalInversion => "InternalInversion",
            Self::FiveDefect => "5DEFECT",
            Self::Other(name) => name,
        }
    }

    /// Position in the fixed legend order; `None` for unrecognized labels.
    #[must_use]
    pub fn rank(&self) -> Option<usize> {
        KNOWN.iter().position(|known| known == self)
    }

    #[must_use]
    pub fn colour(&self) -> &'static str {
        match self {
            Self::Intact | Self::InferredIntact => "#a0da39",
            Self::Hypermut => "#1fa187",
            Self::LargeDeletion => "#365c8d",
            Self::InternalInversion => "#7f0584",
            Self::FiveDefect => "#440154",
            Self::Other(_) => NEUTRAL_COLOUR,
        }
    }

    /// Alternative colour for highlighted segments, if the category has one.
    #[must_use]
    pub fn highlight_colour(&self) -> Option<&'static str> {
        match self {
            Self::LargeDeletion | Self::InternalInversion => Some("#AFAFAF"),
            _ => None,
        }
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Defect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Distinct categories from `seen`: known ones by rank, then unrecognized
/// ones in first-seen order.
#[must_use]
pub fn legend_order<'a, I>(seen: I) -> Vec<Defect>
where
    I: IntoIterator<Item = &'a Defect>,
{
    let mut known = [false; KNOWN.len()];
    let mut others: Vec<Defect> = Vec::new();

    for defect in seen {
        match defect.rank() {
            Some(rank) => known[rank] = true,
            None => {
                if !others.contains(defect) {
                    others.push(defect.clone());
                }
            }
        }
    }

    KNOWN
        .iter()
        .zip(known)
        .filter(|(_, present)| *present)
        .map(|(defect, _)| defect.clone())
        .chain(others)
        .collect()
}
