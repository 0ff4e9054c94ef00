//! Achievement badges derived from a single gameweek stat line.
//!
//! Badges are cosmetic. They never feed back into points.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::scoring::stat::{MvpRank, StatLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Sniper,
    Maestro,
    TheWall,
    PenaltyKiller,
    MinisterOfDefense,
    Goat,
    AnkleBreaker,
    LuckyCharm,
    DoubleAgent,
    BrainFreeze,
    WalkingDisaster,
}

impl Badge {
    pub const ALL: [Badge; 11] = [
        Badge::Sniper,
        Badge::Maestro,
        Badge::TheWall,
        Badge::PenaltyKiller,
        Badge::MinisterOfDefense,
        Badge::Goat,
        Badge::AnkleBreaker,
        Badge::LuckyCharm,
        Badge::DoubleAgent,
        Badge::BrainFreeze,
        Badge::WalkingDisaster,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Badge::Sniper => "sniper",
            Badge::Maestro => "maestro",
            Badge::TheWall => "the_wall",
            Badge::PenaltyKiller => "penalty_killer",
            Badge::MinisterOfDefense => "minister_of_defense",
            Badge::Goat => "goat",
            Badge::AnkleBreaker => "ankle_breaker",
            Badge::LuckyCharm => "lucky_charm",
            Badge::DoubleAgent => "double_agent",
            Badge::BrainFreeze => "brain_freeze",
            Badge::WalkingDisaster => "walking_disaster",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Badge::Sniper => "Sniper (5+ Goals)",
            Badge::Maestro => "The Maestro (4+ Assists)",
            Badge::TheWall => "The Wall (10+ Saves)",
            Badge::PenaltyKiller => "Penalty Killer",
            Badge::MinisterOfDefense => "Minister of Defense",
            Badge::Goat => "The GOAT (MVP 1st)",
            Badge::AnkleBreaker => "Ankle Breaker (2+ Nutmegs)",
            Badge::LuckyCharm => "Lucky Charm (4+ Wins)",
            Badge::DoubleAgent => "Double Agent (Own Goal)",
            Badge::BrainFreeze => "Brain Freeze (Missed Penalty)",
            Badge::WalkingDisaster => "Walking Disaster (2+ Errors)",
        }
    }

    /// Whether the badge marks a bad day rather than an achievement.
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            Badge::DoubleAgent | Badge::BrainFreeze | Badge::WalkingDisaster
        )
    }

    fn earned(&self, stat: &StatLine) -> bool {
        match self {
            Badge::Sniper => stat.goals >= 5,
            Badge::Maestro => stat.assists >= 4,
            Badge::TheWall => stat.saves >= 10,
            Badge::PenaltyKiller => stat.penalties_saved >= 1,
            Badge::MinisterOfDefense => stat.clean_sheet >= 2,
            Badge::Goat => stat.mvp.rank() == Some(MvpRank::FIRST),
            Badge::AnkleBreaker => stat.nutmegs >= 2,
            Badge::LuckyCharm => stat.matches_won >= 4,
            Badge::DoubleAgent => stat.own_goals > 0,
            Badge::BrainFreeze => stat.penalties_missed > 0,
            Badge::WalkingDisaster => stat.defensive_errors >= 2,
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Badge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Badge::ALL
            .into_iter()
            .find(|badge| badge.slug() == s)
            .ok_or_else(|| format!("Unrecognized badge: {s:?}"))
    }
}

/// Every badge the stat line earns, computed from scratch.
pub fn derive_badges(stat: &StatLine) -> BTreeSet<Badge> {
    Badge::ALL
        .into_iter()
        .filter(|badge| badge.earned(stat))
        .collect()
}

/// Comma-separated slugs, the storage form of a badge set.
pub fn encode_badges(badges: &BTreeSet<Badge>) -> String {
    badges
        .iter()
        .map(Badge::slug)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse the storage form. Unknown slugs are skipped so retired badges do
/// not break old rows.
pub fn decode_badges(raw: &str) -> BTreeSet<Badge> {
    raw.split(',')
        .map(str::trim)
        .filter(|slug| !slug.is_empty())
        .filter_map(|slug| slug.parse().ok())
        .collect()
}
