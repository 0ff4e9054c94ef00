//! Raw match events for one player in one gameweek, and the MVP award.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Podium place in a gameweek MVP ranking, always 1, 2 or 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MvpRank(u8);

impl MvpRank {
    pub const FIRST: MvpRank = MvpRank(1);
    pub const SECOND: MvpRank = MvpRank(2);
    pub const THIRD: MvpRank = MvpRank(3);

    pub fn new(rank: u8) -> Option<Self> {
        (1..=3).contains(&rank).then_some(Self(rank))
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// Zero-based index into a `[first, second, third]` table.
    pub fn index(&self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for MvpRank {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        MvpRank::new(value).ok_or_else(|| format!("MVP rank must be 1-3, got {value}"))
    }
}

impl From<MvpRank> for u8 {
    fn from(rank: MvpRank) -> u8 {
        rank.0
    }
}

impl fmt::Display for MvpRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.0 {
            1 => "st",
            2 => "nd",
            _ => "rd",
        };
        write!(f, "{}{}", self.0, suffix)
    }
}

/// The single source of a player's MVP bonus.
///
/// A stat carries exactly one of these, so a podium finish can never be
/// counted twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "source", content = "rank", rename_all = "snake_case")]
pub enum MvpAward {
    #[default]
    None,
    /// Placed by the peer vote tally.
    Voted(MvpRank),
    /// Placed by the internal performance rating.
    Rated(MvpRank),
}

impl MvpAward {
    pub fn rank(&self) -> Option<MvpRank> {
        match self {
            MvpAward::None => None,
            MvpAward::Voted(rank) | MvpAward::Rated(rank) => Some(*rank),
        }
    }

    /// Rank as stored and displayed: 0 when there is no award.
    pub fn rank_number(&self) -> u8 {
        self.rank().map_or(0, |r| r.get())
    }

    /// Storage tag for the award source.
    pub fn source(&self) -> &'static str {
        match self {
            MvpAward::None => "none",
            MvpAward::Voted(_) => "voted",
            MvpAward::Rated(_) => "rated",
        }
    }

    /// Rebuild an award from its stored `(source, rank)` pair.
    pub fn from_parts(source: &str, rank: u8) -> Self {
        match (source, MvpRank::new(rank)) {
            ("voted", Some(rank)) => MvpAward::Voted(rank),
            ("rated", Some(rank)) => MvpAward::Rated(rank),
            _ => MvpAward::None,
        }
    }
}

/// Match events recorded for one player in one gameweek.
///
/// `clean_sheet` is a count because a gameweek can span several matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub goals: u32,
    pub assists: u32,
    pub clean_sheet: u32,
    pub saves: u32,
    pub defensive_errors: u32,
    pub own_goals: u32,
    pub minutes_played: u32,
    pub penalties_scored: u32,
    pub penalties_saved: u32,
    pub penalties_missed: u32,
    pub nutmegs: u32,
    pub matches_won: u32,
    #[serde(default)]
    pub mvp: MvpAward,
}

impl StatLine {
    pub fn played(&self) -> bool {
        self.minutes_played > 0
    }
}
