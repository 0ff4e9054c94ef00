//! Fantasy points calculator.

use serde::{Deserialize, Serialize};

use crate::cli::types::Position;
use crate::scoring::rules::ScoringRules;
use crate::scoring::stat::{MvpAward, StatLine};


pub const TOTAL_LABEL: &str = "Total";
pub const FLOOR_LABEL: &str = "Floor adjustment";

/// One labelled contribution to a player's points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownLine {
    pub label: String,
    pub points: i32,
}

/// Ordered explanation of a player's points, ending with a `Total` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsBreakdown {
    pub lines: Vec<BreakdownLine>,
}

impl PointsBreakdown {
    pub fn get(&self, label: &str) -> Option<i32> {
        self.lines
            .iter()
            .find(|line| line.label == label)
            .map(|line| line.points)
    }

    pub fn total(&self) -> i32 {
        self.get(TOTAL_LABEL).unwrap_or_default()
    }
}

/// `n` events worth `per` points each, saturating at the `i32` bounds.
fn scaled(n: u32, per: i32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX).saturating_mul(per)
}

fn saturating_total<'a>(lines: impl IntoIterator<Item = &'a BreakdownLine>) -> i32 {
    lines
        .into_iter()
        .fold(0i32, |acc, line| acc.saturating_add(line.points))
}

/// Builds the labelled contributions in display order. Zero lines are skipped.
fn line_items(stat: &StatLine, position: Position, rules: &ScoringRules) -> Vec<BreakdownLine> {
    let table = rules.for_position(position);
    let mut lines = Vec::new();
    let mut push = |label: String, points: i32| {
        if points != 0 {
            lines.push(BreakdownLine { label, points });
        }
    };

    if stat.played() {
        push("Appearance".to_string(), table.presence);
    }
    push(
        format!("Goals ({}x)", stat.goals),
        scaled(stat.goals, table.goal),
    );
    push(
        format!("Penalties Scored ({}x)", stat.penalties_scored),
        scaled(stat.penalties_scored, table.penalty_scored),
    );
    push(
        format!("Assists ({}x)", stat.assists),
        scaled(stat.assists, table.assist),
    );
    push(
        format!("Clean Sheets ({}x)", stat.clean_sheet),
        scaled(stat.clean_sheet, table.clean_sheet),
    );
    if let Some(blocks) = stat.saves.checked_div(rules.save_block_size) {
        push(
            format!("Saves ({}x)", stat.saves),
            scaled(blocks, table.save_block),
        );
    }
    push(
        format!("Penalty Saves ({}x)", stat.penalties_saved),
        scaled(stat.penalties_saved, table.penalty_saved),
    );
    push(
        format!("Defensive Errors ({}x)", stat.defensive_errors),
        scaled(stat.defensive_errors, table.defensive_error).saturating_neg(),
    );
    push(
        format!("Own Goals ({}x)", stat.own_goals),
        scaled(stat.own_goals, table.own_goal).saturating_neg(),
    );
    push(
        format!("Penalties Missed ({}x)", stat.penalties_missed),
        scaled(stat.penalties_missed, table.penalty_missed).saturating_neg(),
    );
    match stat.mvp {
        MvpAward::None => {}
        MvpAward::Voted(rank) => push(
            format!("MVP {} (voted)", rank),
            table.mvp_podium[rank.index()],
        ),
        MvpAward::Rated(rank) => push(
            format!("MVP {} (rated)", rank),
            table.mvp_podium[rank.index()],
        ),
    }
    push(
        format!("Matches Won ({}x)", stat.matches_won),
        scaled(stat.matches_won, table.match_won),
    );
    push(
        format!("Nutmegs ({}x)", stat.nutmegs),
        scaled(stat.nutmegs, table.nutmeg),
    );

    lines
}

/// Fantasy points for one player's gameweek, floored at `rules.points_floor`.
pub fn compute_points(stat: &StatLine, position: Position, rules: &ScoringRules) -> i32 {
    let raw = saturating_total(&line_items(stat, position, rules));
    raw.max(rules.points_floor)
}

/// The same computation as [`compute_points`], itemised.
///
/// When the floor kicks in a `Floor adjustment` line is added so the lines
/// still add up to the `Total` line.
pub fn compute_breakdown(
    stat: &StatLine,
    position: Position,
    rules: &ScoringRules,
) -> PointsBreakdown {
    let mut lines = line_items(stat, position, rules);
    let raw = saturating_total(&lines);
    let total = raw.max(rules.points_floor);
    if total != raw {
        lines.push(BreakdownLine {
            label: FLOOR_LABEL.to_string(),
            points: total.saturating_sub(raw),
        });
    }
    lines.push(BreakdownLine {
        label: TOTAL_LABEL.to_string(),
        points: total,
    });
    PointsBreakdown { lines }
}
