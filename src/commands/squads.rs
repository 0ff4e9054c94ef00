//! Squad creation and per-gameweek selection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};

use crate::cli::types::{GameweekId, PlayerId, Position, SquadId};
use crate::commands::common::{require_gameweek, require_player};
use crate::commands::Actor;
use crate::config::{Config, SquadRules};
use crate::error::{FantasyError, SelectionError};
use crate::storage::{
    LeagueDatabase, LeagueStore, Player, Squad, SquadGameweek, SystemSettings, SQUAD_SIZE,
};
use crate::Result;

/// Tolerance for summing decimal prices.
const BUDGET_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadSelection {
    pub gameweek_id: GameweekId,
    pub players: Vec<PlayerId>,
    pub captain: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSummary {
    pub squad_id: SquadId,
    pub gameweek_id: GameweekId,
    /// Players changed by this submission.
    pub transfers_made: u32,
    /// Points deducted for this submission.
    pub transfer_penalty: i32,
    /// Running totals for the gameweek.
    pub gameweek_transfers: u32,
    pub gameweek_penalty: i32,
    pub free_transfers_left: u32,
    pub total_cost: f64,
    pub budget_remaining: f64,
}

pub fn create_squad(
    db: &mut LeagueDatabase,
    actor: &Actor,
    config: &Config,
    name: &str,
) -> Result<Squad> {
    let tx = db.transaction()?;
    if tx.squad_for_owner(actor.user_id)?.is_some() {
        return Err(FantasyError::DuplicateSquad {
            owner: actor.user_id.to_string(),
        });
    }
    let squad = tx.insert_squad(
        actor.user_id,
        name.trim(),
        config.squad.budget_cap,
        config.squad.starting_free_transfers,
    )?;
    tx.commit()?;

    info!("Created squad {} for user {}", squad.name, squad.owner);
    Ok(squad)
}

pub fn my_squad(db: &LeagueDatabase, actor: &Actor) -> Result<Squad> {
    db.conn()
        .squad_for_owner(actor.user_id)?
        .ok_or_else(|| FantasyError::not_found("squad", format!("owner {}", actor.user_id)))
}

/// Every gameweek selection of the caller's squad, oldest first.
pub fn squad_history(db: &LeagueDatabase, actor: &Actor) -> Result<Vec<SquadGameweek>> {
    let squad = my_squad(db, actor)?;
    db.conn().squad_history(squad.id)
}

/// Five distinct ids, in submission order.
fn check_slots(ids: &[PlayerId]) -> std::result::Result<[PlayerId; SQUAD_SIZE], SelectionError> {
    let slots: [PlayerId; SQUAD_SIZE] =
        ids.try_into()
            .map_err(|_| SelectionError::WrongSquadSize {
                expected: SQUAD_SIZE,
                actual: ids.len(),
            })?;
    let mut seen = HashSet::with_capacity(SQUAD_SIZE);
    for id in slots {
        if !seen.insert(id) {
            return Err(SelectionError::DuplicatePlayer {
                player: id.to_string(),
            });
        }
    }
    Ok(slots)
}

/// Check a lineup against the composition and budget rules. Returns the
/// total cost.
pub fn validate_selection(
    players: &[Player],
    captain: PlayerId,
    rules: &SquadRules,
) -> std::result::Result<f64, SelectionError> {
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    check_slots(&ids)?;

    if let Some(inactive) = players.iter().find(|p| !p.is_active) {
        return Err(SelectionError::PlayerUnavailable {
            player: inactive.name.clone(),
        });
    }

    let count = |position: Position| players.iter().filter(|p| p.position == position).count();
    let keepers = count(Position::GK);
    if keepers != 1 {
        return Err(SelectionError::GoalkeeperCount { count: keepers });
    }
    for position in [Position::DEF, Position::MID, Position::ATT] {
        let n = count(position);
        if !(1..=rules.max_per_outfield_position).contains(&n) {
            return Err(SelectionError::OutfieldCount {
                position: position.to_string(),
                count: n,
                min: 1,
                max: rules.max_per_outfield_position,
            });
        }
    }

    if !ids.contains(&captain) {
        return Err(SelectionError::CaptainNotSelected);
    }

    let cost: f64 = players.iter().map(|p| p.price).sum();
    if cost > rules.budget_cap + BUDGET_EPSILON {
        return Err(SelectionError::OverBudget {
            cost,
            cap: rules.budget_cap,
        });
    }
    Ok(cost)
}

/// Points deducted when `transfers` exceed the free allowance.
pub fn transfer_penalty(transfers: u32, free_transfers: u32, cost_per_transfer: i32) -> i32 {
    let paid = transfers.saturating_sub(free_transfers);
    i32::try_from(paid).unwrap_or(i32::MAX).saturating_mul(cost_per_transfer)
}

/// Submit the caller's lineup for a gameweek.
///
/// Transfers are counted against the squad's existing row for the gameweek,
/// or its latest earlier row when there is none. The fallback matters when a
/// manager picks for a gameweek before it is activated: no rolled-over row
/// exists yet, and comparing against nothing would make every change free.
/// A squad's first ever selection is free. Transfers and penalties accumulate
/// across submissions within a gameweek.
pub fn select_squad(
    db: &mut LeagueDatabase,
    actor: &Actor,
    config: &Config,
    settings: &SystemSettings,
    selection: &SquadSelection,
    now: DateTime<Utc>,
) -> Result<SelectionSummary> {
    let result = select_squad_in(db, actor, config, settings, selection, now);
    if let Err(FantasyError::Selection(reason)) = &result {
        warn!("Rejected selection from user {}: {}", actor.user_id, reason);
    }
    result
}

fn select_squad_in(
    db: &mut LeagueDatabase,
    actor: &Actor,
    config: &Config,
    settings: &SystemSettings,
    selection: &SquadSelection,
    now: DateTime<Utc>,
) -> Result<SelectionSummary> {
    if !settings.allow_transfers {
        return Err(SelectionError::TransfersLocked.into());
    }
    let slots = check_slots(&selection.players)?;

    let tx = db.transaction()?;
    let mut squad = tx
        .squad_for_owner(actor.user_id)?
        .ok_or_else(|| FantasyError::not_found("squad", format!("owner {}", actor.user_id)))?;

    let players = slots
        .iter()
        .map(|id| require_player(&tx, *id))
        .collect::<Result<Vec<_>>>()?;
    let cost = validate_selection(&players, selection.captain, &config.squad)?;

    let gameweek = require_gameweek(&tx, selection.gameweek_id)?;
    if gameweek.is_finished {
        return Err(SelectionError::GameweekClosed {
            number: gameweek.number,
        }
        .into());
    }
    if gameweek.deadline_passed(now) {
        return Err(SelectionError::DeadlinePassed {
            number: gameweek.number,
        }
        .into());
    }

    let current = tx.get_squad_gameweek(squad.id, gameweek.id)?;
    let baseline = match &current {
        Some(row) => Some(row.clone()),
        None => tx.latest_squad_gameweek_before(squad.id, gameweek.number)?,
    };
    let transfers = baseline.as_ref().map_or(0, |row| {
        slots.iter().filter(|id| !row.has_player(**id)).count() as u32
    });
    let penalty = transfer_penalty(transfers, squad.free_transfers, config.squad.transfer_cost);

    let mut row = current.unwrap_or_else(|| SquadGameweek {
        squad_id: squad.id,
        gameweek_id: gameweek.id,
        slots,
        captain: selection.captain,
        transfers_made: 0,
        transfer_penalty: 0,
        gameweek_points: 0,
    });
    row.slots = slots;
    row.captain = selection.captain;
    row.transfers_made += transfers;
    row.transfer_penalty += penalty;
    tx.upsert_squad_gameweek(&row)?;

    squad.free_transfers = squad.free_transfers.saturating_sub(transfers);
    squad.budget_remaining = config.squad.budget_cap - cost;
    tx.save_squad(&squad)?;
    tx.commit()?;

    info!(
        "Squad {} selected for gameweek {}: {} transfers, penalty {}",
        squad.id, gameweek.number, transfers, penalty
    );
    Ok(SelectionSummary {
        squad_id: squad.id,
        gameweek_id: gameweek.id,
        transfers_made: transfers,
        transfer_penalty: penalty,
        gameweek_transfers: row.transfers_made,
        gameweek_penalty: row.transfer_penalty,
        free_transfers_left: squad.free_transfers,
        total_cost: cost,
        budget_remaining: squad.budget_remaining,
    })
}
