//! Leaderboards, mini-leagues and dashboard highlights.
//!
//! All of these are read-only projections over settled totals, apart from
//! creating and joining mini-leagues.

use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

use crate::cli::types::{MiniLeagueId, PlayerId, SquadId, UserId};
use crate::commands::Actor;
use crate::error::FantasyError;
use crate::storage::{LeagueDatabase, LeagueStore, MiniLeague, Player, Squad, SystemSettings};
use crate::Result;

const JOIN_CODE_LEN: usize = 8;
const JOIN_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const HIGHLIGHT_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub squad_id: SquadId,
    pub squad_name: String,
    pub owner: UserId,
    pub total_points: i64,
}

fn ranked(mut squads: Vec<Squad>) -> Vec<LeaderboardEntry> {
    squads.sort_by(|a, b| b.total_points.cmp(&a.total_points).then(a.id.cmp(&b.id)));
    squads
        .into_iter()
        .enumerate()
        .map(|(i, squad)| LeaderboardEntry {
            rank: i + 1,
            squad_id: squad.id,
            squad_name: squad.name,
            owner: squad.owner,
            total_points: squad.total_points,
        })
        .collect()
}

/// Every squad by total points, best first.
pub fn global_leaderboard(db: &LeagueDatabase, limit: usize) -> Result<Vec<LeaderboardEntry>> {
    let mut entries = ranked(db.conn().list_squads()?);
    entries.truncate(limit);
    Ok(entries)
}

/// Eight upper-case alphanumeric characters.
pub fn generate_join_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..JOIN_CODE_LEN)
        .map(|_| char::from(JOIN_CODE_CHARSET[rng.gen_range(0..JOIN_CODE_CHARSET.len())]))
        .collect()
}

fn unused_join_code(conn: &Connection) -> Result<String> {
    let mut rng = rand::thread_rng();
    loop {
        let code = generate_join_code(&mut rng);
        if conn.league_by_code(&code)?.is_none() {
            return Ok(code);
        }
    }
}

/// Create a league with a fresh join code. The creator becomes its first
/// member.
pub fn create_league(
    db: &mut LeagueDatabase,
    actor: &Actor,
    name: &str,
    now: DateTime<Utc>,
) -> Result<MiniLeague> {
    let tx = db.transaction()?;
    let code = unused_join_code(&tx)?;
    let league = tx.insert_league(name.trim(), &code, actor.user_id, now)?;
    tx.add_member(league.id, actor.user_id, now)?;
    tx.commit()?;

    info!("User {} created league {} ({})", actor.user_id, league.name, league.join_code);
    Ok(league)
}

pub fn join_league(
    db: &mut LeagueDatabase,
    actor: &Actor,
    join_code: &str,
    now: DateTime<Utc>,
) -> Result<MiniLeague> {
    let code = join_code.trim().to_ascii_uppercase();

    let tx = db.transaction()?;
    let league = tx
        .league_by_code(&code)?
        .ok_or_else(|| FantasyError::not_found("league", &code))?;
    if tx.is_member(league.id, actor.user_id)? {
        return Err(FantasyError::AlreadyMember {
            league: league.name,
        });
    }
    tx.add_member(league.id, actor.user_id, now)?;
    tx.commit()?;

    info!("User {} joined league {}", actor.user_id, league.name);
    Ok(league)
}

pub fn my_leagues(db: &LeagueDatabase, actor: &Actor) -> Result<Vec<MiniLeague>> {
    db.conn().leagues_for_user(actor.user_id)
}

/// Members who own a squad, ranked by squad total.
pub fn league_standings(db: &LeagueDatabase, league_id: MiniLeagueId) -> Result<Vec<LeaderboardEntry>> {
    let conn = db.conn();
    if conn.get_league(league_id)?.is_none() {
        return Err(FantasyError::not_found("league", league_id));
    }
    let mut squads = Vec::new();
    for member in conn.league_members(league_id)? {
        if let Some(squad) = conn.squad_for_owner(member)? {
            squads.push(squad);
        }
    }
    Ok(ranked(squads))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedPlayer {
    pub player: Player,
    pub ownership_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopScorer {
    pub player: Player,
    pub points: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardHighlights {
    pub show: bool,
    pub top_owned: Vec<OwnedPlayer>,
    pub top_scorers: Vec<TopScorer>,
    pub last_gameweek_name: Option<String>,
}

/// Most-owned players in the active gameweek (else the last finished one) and
/// the top scorers of the last finished gameweek. Empty unless
/// `show_dashboard_stats` is on.
pub fn dashboard_highlights(
    db: &LeagueDatabase,
    settings: &SystemSettings,
) -> Result<DashboardHighlights> {
    if !settings.show_dashboard_stats {
        return Ok(DashboardHighlights::default());
    }

    let conn = db.conn();
    let last_finished = conn.last_finished_gameweek()?;
    let ownership_gameweek = match conn.active_gameweek()? {
        Some(active) => Some(active),
        None => last_finished.clone(),
    };

    let mut top_owned = Vec::new();
    if let Some(gameweek) = &ownership_gameweek {
        let rows = conn.list_squad_gameweeks(gameweek.id)?;
        let mut order: Vec<(PlayerId, u32)> = Vec::new();
        let mut index: HashMap<PlayerId, usize> = HashMap::new();
        for slot in rows.iter().flat_map(|row| row.slots) {
            let i = *index.entry(slot).or_insert_with(|| {
                order.push((slot, 0));
                order.len() - 1
            });
            order[i].1 += 1;
        }
        order.sort_by(|a, b| b.1.cmp(&a.1));

        let teams = rows.len().max(1) as f64;
        for (player_id, count) in order.into_iter().take(HIGHLIGHT_COUNT) {
            if let Some(player) = conn.get_player(player_id)? {
                let percent = (f64::from(count) / teams * 100.0).round() as u32;
                top_owned.push(OwnedPlayer {
                    player,
                    ownership_percent: percent,
                });
            }
        }
    }

    let mut top_scorers = Vec::new();
    if let Some(gameweek) = &last_finished {
        let mut stats = conn.list_match_stats(gameweek.id)?;
        stats.sort_by(|a, b| b.points.cmp(&a.points));
        for stat in stats.into_iter().take(HIGHLIGHT_COUNT) {
            if let Some(player) = conn.get_player(stat.player_id)? {
                top_scorers.push(TopScorer {
                    player,
                    points: stat.points,
                });
            }
        }
    }

    Ok(DashboardHighlights {
        show: true,
        top_owned,
        top_scorers,
        last_gameweek_name: last_finished.map(|gw| gw.name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_join_code_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let code = generate_join_code(&mut rng);
            assert_eq!(code.len(), 8);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_ranked_breaks_ties_by_squad_id() {
        let squad = |id: i64, points: i64| Squad {
            id: SquadId::new(id),
            owner: UserId::new(id * 10),
            name: format!("Squad {id}"),
            budget_remaining: 0.0,
            total_points: points,
            free_transfers: 1,
        };
        let entries = ranked(vec![squad(3, 10), squad(1, 4), squad(2, 10)]);
        let order: Vec<(usize, i64)> = entries
            .iter()
            .map(|e| (e.rank, e.squad_id.as_i64()))
            .collect();
        assert_eq!(order, vec![(1, 2), (2, 3), (3, 1)]);
    }
}
