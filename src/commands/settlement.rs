//! Gameweek settlement.
//!
//! Settlement turns a gameweek's recorded events into points:
//!
//! 1. voting closes and every MVP award is resolved again from scratch with
//!    the configured [`MvpStrategy`](crate::scoring::MvpStrategy)
//! 2. each stat's points and badges are recomputed and the player's total
//!    moves by the difference from the stored points
//! 3. each squad's gameweek score is rebuilt (five players, captain counted
//!    twice, minus the transfer penalty) and the squad total moves by the
//!    difference
//! 4. the gameweek is closed.
//!
//! Totals only ever move by `new - old`, so settling the same gameweek again
//! leaves every total where it was. Everything runs in one immediate
//! transaction; any error leaves the database as it was.

use rayon::prelude::*;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::cli::types::{GameweekId, PlayerId, Position};
use crate::commands::common::{require_gameweek, require_player};
use crate::commands::Actor;
use crate::config::Config;
use crate::error::FantasyError;
use crate::scoring::{
    compute_points, derive_badges, Ballot, MvpAward, MvpCandidate, ScoringRules, StatLine,
};
use crate::storage::{LeagueDatabase, LeagueStore, MatchStat, SquadGameweek};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementSummary {
    pub gameweek_id: GameweekId,
    pub number: u32,
    pub stats_settled: usize,
    pub squads_settled: usize,
    pub votes_counted: usize,
    /// Podium in rank order.
    pub mvp_awards: Vec<(PlayerId, MvpAward)>,
    /// Net change applied to player totals by this run.
    pub player_points_delta: i64,
    /// Net change applied to squad totals by this run.
    pub squad_points_delta: i64,
}

/// Settle `gameweek_id`. Settling a finished gameweek again is allowed.
pub fn settle_gameweek(
    db: &mut LeagueDatabase,
    actor: &Actor,
    config: &Config,
    gameweek_id: GameweekId,
) -> Result<SettlementSummary> {
    actor.require_admin("settle a gameweek")?;

    let tx = db.transaction()?;
    let summary = settle_in(&tx, config, gameweek_id)?;
    tx.commit()?;

    info!(
        "Settled gameweek {}: {} stats, {} squads, player delta {:+}, squad delta {:+}",
        summary.number,
        summary.stats_settled,
        summary.squads_settled,
        summary.player_points_delta,
        summary.squad_points_delta
    );
    Ok(summary)
}

fn settle_in(conn: &Connection, config: &Config, gameweek_id: GameweekId) -> Result<SettlementSummary> {
    let mut gameweek = require_gameweek(conn, gameweek_id)?;
    let stats = conn.list_match_stats(gameweek_id)?;
    if stats.is_empty() {
        return Err(FantasyError::NothingToSettle {
            number: gameweek.number,
        });
    }

    // Step 1: MVP
    gameweek.is_voting_open = false;
    let ballots: Vec<Ballot> = conn
        .list_votes(gameweek_id)?
        .into_iter()
        .map(|vote| Ballot { picks: vote.picks })
        .collect();
    let mvp_awards = resolve_mvp(config, &stats, &ballots);
    let awards: HashMap<PlayerId, MvpAward> = mvp_awards.iter().copied().collect();
    debug!(
        "Gameweek {}: {} ballots, {} podium places",
        gameweek.number,
        ballots.len(),
        mvp_awards.len()
    );

    // Step 2: player points
    let mut positions: HashMap<PlayerId, Position> = HashMap::with_capacity(stats.len());
    for stat in &stats {
        let player = require_player(conn, stat.player_id)?;
        positions.insert(player.id, player.position);
    }

    let settled = rescore_stats(stats, &awards, &positions, &config.scoring);
    let mut player_points: HashMap<PlayerId, i32> = HashMap::with_capacity(settled.len());
    let mut player_points_delta = 0;
    for (stat, old_points) in &settled {
        conn.upsert_match_stat(stat)?;
        let delta = i64::from(stat.points) - i64::from(*old_points);
        if delta != 0 {
            conn.add_player_points(stat.player_id, delta)?;
        }
        player_points_delta += delta;
        player_points.insert(stat.player_id, stat.points);
    }

    // Step 3: squads
    let rows = conn.list_squad_gameweeks(gameweek_id)?;
    let squads_settled = rows.len();
    let mut squad_points_delta = 0;
    for mut row in rows {
        let points = squad_gameweek_points(&row, &player_points)?;
        let delta = i64::from(points) - i64::from(row.gameweek_points);
        row.gameweek_points = points;
        conn.upsert_squad_gameweek(&row)?;
        if delta != 0 {
            conn.add_squad_points(row.squad_id, delta)?;
        }
        squad_points_delta += delta;
    }

    // Step 4: close
    gameweek.is_active = false;
    gameweek.is_finished = true;
    conn.save_gameweek(&gameweek)?;

    Ok(SettlementSummary {
        gameweek_id,
        number: gameweek.number,
        stats_settled: settled.len(),
        squads_settled,
        votes_counted: ballots.len(),
        mvp_awards,
        player_points_delta,
        squad_points_delta,
    })
}

/// Podium for the gameweek. Candidates are judged with their awards cleared.
fn resolve_mvp(config: &Config, stats: &[MatchStat], ballots: &[Ballot]) -> Vec<(PlayerId, MvpAward)> {
    let candidates: Vec<MvpCandidate> = stats
        .iter()
        .map(|stat| MvpCandidate {
            player_id: stat.player_id,
            stat: StatLine {
                mvp: MvpAward::None,
                ..stat.line.clone()
            },
        })
        .collect();
    let mut awards = config
        .mvp_strategy
        .selector(&config.rating)
        .select(&candidates, ballots);
    // Stable: equal ranks keep selector order
    awards.sort_by_key(|(_, award)| award.rank_number());
    awards
}

/// Recompute every stat in parallel. Returns each new stat with the points it
/// replaced.
fn rescore_stats(
    stats: Vec<MatchStat>,
    awards: &HashMap<PlayerId, MvpAward>,
    positions: &HashMap<PlayerId, Position>,
    rules: &ScoringRules,
) -> Vec<(MatchStat, i32)> {
    stats
        .into_par_iter()
        .map(|mut stat| {
            let old_points = stat.points;
            let position = positions
                .get(&stat.player_id)
                .copied()
                .unwrap_or(Position::ATT);
            stat.line.mvp = awards.get(&stat.player_id).copied().unwrap_or_default();
            stat.points = compute_points(&stat.line, position, rules);
            stat.badges = derive_badges(&stat.line);
            (stat, old_points)
        })
        .collect()
}

/// Five slots plus the captain once more, minus the stored penalty. Players
/// without a stat line count as zero.
pub(crate) fn squad_gameweek_points(
    row: &SquadGameweek,
    player_points: &HashMap<PlayerId, i32>,
) -> Result<i32> {
    if !row.has_player(row.captain) {
        return Err(FantasyError::CaptainNotInSquad {
            squad: row.squad_id.to_string(),
            captain: row.captain.to_string(),
        });
    }
    let points_for = |id: &PlayerId| player_points.get(id).copied().unwrap_or(0);
    let base = row
        .slots
        .iter()
        .map(points_for)
        .fold(0i32, i32::saturating_add);
    Ok(base
        .saturating_add(points_for(&row.captain))
        .saturating_sub(row.transfer_penalty))
}
