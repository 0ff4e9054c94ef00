//! Five-a-side position types and normalization.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Player positions used for scoring and squad composition.
///
/// Positions are entered as free text by administrators, so parsing never
/// fails: the first letter decides (`G` goalkeeper, `D` defender,
/// `M` midfielder) and anything else is treated as an attacker.
///
/// # Examples
///
/// ```rust
/// use fantasy_fives::Position;
///
/// assert_eq!(Position::normalize("Goalkeeper"), Position::GK);
/// assert_eq!(Position::normalize("forward"), Position::ATT);
/// assert_eq!(Position::normalize(""), Position::ATT);
/// assert_eq!(Position::MID.to_string(), "MID");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Position {
    GK,
    DEF,
    MID,
    ATT,
}

impl Position {
    pub const ALL: [Position; 4] = [Position::GK, Position::DEF, Position::MID, Position::ATT];

    /// Map any spelling of a position onto one of the four buckets.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('G') => Position::GK,
            Some('D') => Position::DEF,
            Some('M') => Position::MID,
            _ => Position::ATT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::GK => "GK",
            Position::DEF => "DEF",
            Position::MID => "MID",
            Position::ATT => "ATT",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Position {
    fn from(raw: String) -> Self {
        Position::normalize(&raw)
    }
}

impl FromStr for Position {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Position::normalize(s))
    }
}
