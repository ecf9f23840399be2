//! Constrained colour palette for splice sites and the fragments touching them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Brown,
    Grey,
}

/// A colour name outside the palette.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown colour '{0}'")]
pub struct UnknownColour(pub String);

impl Colour {
    pub const ALL: [Colour; 9] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Blue,
        Self::Purple,
        Self::Pink,
        Self::Brown,
        Self::Grey,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Brown => "brown",
            Self::Grey => "grey",
        }
    }

    /// Canonical names of every palette colour, in palette order.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.name()).collect()
    }
}

impl FromStr for Colour {
    type Err = UnknownColour;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        if lowered == "gray" {
            return Ok(Self::Grey);
        }
        Self::ALL
            .into_iter()
            .find(|c| c.name() == lowered)
            .ok_or_else(|| UnknownColour(s.to_string()))
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Red".parse::<Colour>().unwrap(), Colour::Red);
        assert_eq!(" BLUE ".parse::<Colour>().unwrap(), Colour::Blue);
    }

    #[test]
    fn gray_alias() {
        assert_eq!("gray".parse::<Colour>().unwrap(), Colour::Grey);
        assert_eq!(Colour::Grey.to_string(), "grey");
    }

    #[test]
    fn unknown_colour() {
        let err = "magenta".parse::<Colour>().unwrap_err();
        assert_eq!(err, UnknownColour("magenta".to_string()));
    }

    #[test]
    fn display_round_trip() {
        for colour in Colour::ALL {
            assert_eq!(colour.to_string().parse::<Colour>().unwrap(), colour);
        }
    }
}
