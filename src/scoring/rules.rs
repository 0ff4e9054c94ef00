//! Scoring rules table: position -> event -> points.
//!
//! The table is plain data. It deserializes from the `[scoring]` section of
//! the config file so a league can swap rulesets without code changes.

use serde::{Deserialize, Serialize};

use crate::cli::types::Position;

/// Points a single position earns per event.
///
/// Penalty events (`defensive_error`, `own_goal`, `penalty_missed`) hold the
/// magnitude that is subtracted, so they are written as positive numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRules {
    /// Awarded once for any minutes on the pitch.
    pub presence: i32,
    pub goal: i32,
    pub assist: i32,
    pub clean_sheet: i32,
    /// Awarded per full block of saves (see [`ScoringRules::save_block_size`]).
    pub save_block: i32,
    pub defensive_error: i32,
    pub own_goal: i32,
    pub penalty_scored: i32,
    pub penalty_saved: i32,
    pub penalty_missed: i32,
    pub nutmeg: i32,
    pub match_won: i32,
    /// Bonus for finishing 1st, 2nd and 3rd in the gameweek MVP podium.
    pub mvp_podium: [i32; 3],
}

impl PositionRules {
    fn outfield(goal: i32, clean_sheet: i32) -> Self {
        Self {
            presence: 1,
            goal,
            assist: 3,
            clean_sheet,
            save_block: 0,
            defensive_error: 2,
            own_goal: 2,
            penalty_scored: 3,
            penalty_saved: 5,
            penalty_missed: 2,
            nutmeg: 2,
            match_won: 1,
            mvp_podium: [3, 2, 1],
        }
    }
}

/// A complete ruleset covering all four positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Saves are counted in whole blocks of this size; partial blocks score nothing.
    pub save_block_size: u32,
    /// Lowest total a single player can score in one gameweek.
    pub points_floor: i32,
    pub gk: PositionRules,
    pub def: PositionRules,
    pub mid: PositionRules,
    pub att: PositionRules,
}

impl ScoringRules {
    /// The five-a-side table: goalkeepers are rewarded for clean sheets and
    /// saves, attackers get the least for keeping a clean sheet.
    pub fn classic() -> Self {
        Self {
            save_block_size: 3,
            points_floor: -10,
            gk: PositionRules {
                save_block: 1,
                ..PositionRules::outfield(6, 5)
            },
            def: PositionRules::outfield(5, 3),
            mid: PositionRules::outfield(5, 2),
            att: PositionRules::outfield(4, 1),
        }
    }

    pub fn for_position(&self, position: Position) -> &PositionRules {
        match position {
            Position::GK => &self.gk,
            Position::DEF => &self.def,
            Position::MID => &self.mid,
            Position::ATT => &self.att,
        }
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::classic()
    }
}
