//! Admin stat entry and points breakdowns.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cli::types::{GameweekId, PlayerId};
use crate::commands::common::{require_gameweek, require_player};
use crate::commands::Actor;
use crate::config::Config;
use crate::error::FantasyError;
use crate::scoring::{compute_breakdown, compute_points, derive_badges, PointsBreakdown};
use crate::storage::{LeagueDatabase, LeagueStore, MatchStat, MatchStatUpdate};
use crate::Result;

/// Minutes given to a new stat line when the entry leaves them out.
pub const FULL_MATCH_MINUTES: u32 = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSubmission {
    pub stat: MatchStat,
    /// Breakdown of the entered events.
    pub breakdown: PointsBreakdown,
    /// False when the gameweek is finished: the raw events are stored but
    /// points, badges and totals wait for the next settlement.
    pub applied: bool,
}

/// Record events for a player in a gameweek.
///
/// On an open gameweek the player's points and badges are recomputed right
/// away and the player's total moves by the difference. The MVP award is kept
/// as last settled. A player's first entry in a gameweek counts as a full
/// match ([`FULL_MATCH_MINUTES`]) unless minutes are given.
pub fn submit_match_stat(
    db: &mut LeagueDatabase,
    actor: &Actor,
    config: &Config,
    gameweek_id: GameweekId,
    player_id: PlayerId,
    update: &MatchStatUpdate,
) -> Result<StatSubmission> {
    actor.require_admin("enter match stats")?;

    let tx = db.transaction()?;
    let gameweek = require_gameweek(&tx, gameweek_id)?;
    let player = require_player(&tx, player_id)?;

    let existing = tx.get_match_stat(gameweek_id, player_id)?;
    let old_points = existing.as_ref().map_or(0, |stat| stat.points);
    let mut stat = existing.unwrap_or_else(|| {
        let mut fresh = MatchStat::empty(gameweek_id, player_id);
        fresh.line.minutes_played = FULL_MATCH_MINUTES;
        fresh
    });
    update.apply(&mut stat.line);

    let breakdown = compute_breakdown(&stat.line, player.position, &config.scoring);
    let applied = !gameweek.is_finished;
    if applied {
        stat.points = compute_points(&stat.line, player.position, &config.scoring);
        stat.badges = derive_badges(&stat.line);
        tx.upsert_match_stat(&stat)?;
        let delta = i64::from(stat.points) - i64::from(old_points);
        if delta != 0 {
            tx.add_player_points(player_id, delta)?;
        }
    } else {
        tx.upsert_match_stat(&stat)?;
    }
    tx.commit()?;

    if applied {
        info!(
            "Stats for {} in gameweek {}: {} points",
            player.name, gameweek.number, stat.points
        );
    } else {
        warn!(
            "Gameweek {} is finished; stats for {} stored, settle again to apply",
            gameweek.number, player.name
        );
    }

    Ok(StatSubmission {
        stat,
        breakdown,
        applied,
    })
}

/// Line-by-line explanation of a player's stored stat.
pub fn points_breakdown(
    db: &LeagueDatabase,
    config: &Config,
    gameweek_id: GameweekId,
    player_id: PlayerId,
) -> Result<PointsBreakdown> {
    let conn = db.conn();
    let player = require_player(conn, player_id)?;
    let stat = conn
        .get_match_stat(gameweek_id, player_id)?
        .ok_or_else(|| {
            FantasyError::not_found("match stat", format!("gameweek {gameweek_id}, player {player_id}"))
        })?;
    Ok(compute_breakdown(&stat.line, player.position, &config.scoring))
}

pub fn list_match_stats(db: &LeagueDatabase, gameweek_id: GameweekId) -> Result<Vec<MatchStat>> {
    let conn = db.conn();
    require_gameweek(conn, gameweek_id)?;
    conn.list_match_stats(gameweek_id)
}
