//! Gameweek lifecycle: creation, activation with squad rollover, voting.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cli::types::GameweekId;
use crate::commands::common::require_gameweek;
use crate::commands::Actor;
use crate::error::FantasyError;
use crate::storage::{Gameweek, LeagueDatabase, LeagueStore, NewGameweek};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationSummary {
    pub gameweek: Gameweek,
    /// Squads that received a copy of their previous selection.
    pub rolled_over: usize,
}

pub fn create_gameweek(
    db: &mut LeagueDatabase,
    actor: &Actor,
    gameweek: &NewGameweek,
) -> Result<Gameweek> {
    actor.require_admin("create a gameweek")?;

    let tx = db.transaction()?;
    if tx.gameweek_by_number(gameweek.number)?.is_some() {
        return Err(FantasyError::DuplicateGameweek {
            number: gameweek.number,
        });
    }
    let created = tx.insert_gameweek(gameweek)?;
    tx.commit()?;

    info!(
        "Created gameweek {} ({}), deadline {}",
        created.number, created.name, created.deadline
    );
    Ok(created)
}

pub fn list_gameweeks(db: &LeagueDatabase) -> Result<Vec<Gameweek>> {
    db.conn().list_gameweeks()
}

pub fn active_gameweek(db: &LeagueDatabase) -> Result<Option<Gameweek>> {
    db.conn().active_gameweek()
}

/// Make `id` the single active gameweek and roll every squad into it.
///
/// A finished gameweek cannot be reactivated.
pub fn activate_gameweek(
    db: &mut LeagueDatabase,
    actor: &Actor,
    id: GameweekId,
) -> Result<ActivationSummary> {
    actor.require_admin("activate a gameweek")?;

    let tx = db.transaction()?;
    let mut gameweek = require_gameweek(&tx, id)?;
    if gameweek.is_finished {
        return Err(FantasyError::GameweekFinished {
            number: gameweek.number,
        });
    }

    tx.deactivate_all_gameweeks()?;
    gameweek.is_active = true;
    tx.save_gameweek(&gameweek)?;
    let rolled_over = roll_over_squads(&tx, &gameweek)?;
    tx.commit()?;

    info!(
        "Activated gameweek {} ({} squads rolled over)",
        gameweek.number, rolled_over
    );
    Ok(ActivationSummary {
        gameweek,
        rolled_over,
    })
}

/// Copy each squad's most recent earlier selection into `target`.
///
/// Squads that already have a row for `target`, or no earlier row at all, are
/// skipped.
pub(crate) fn roll_over_squads(conn: &Connection, target: &Gameweek) -> Result<usize> {
    let mut rolled_over = 0;
    for squad in conn.list_squads()? {
        if conn.get_squad_gameweek(squad.id, target.id)?.is_some() {
            continue;
        }
        let Some(previous) = conn.latest_squad_gameweek_before(squad.id, target.number)? else {
            debug!("Squad {} has no earlier selection to roll over", squad.id);
            continue;
        };
        conn.upsert_squad_gameweek(&previous.rolled_over(target.id))?;
        rolled_over += 1;
    }
    Ok(rolled_over)
}

/// Open or close MVP voting. Voting cannot be reopened on a finished gameweek.
pub fn set_voting(
    db: &mut LeagueDatabase,
    actor: &Actor,
    id: GameweekId,
    open: bool,
) -> Result<Gameweek> {
    actor.require_admin("change MVP voting")?;

    let tx = db.transaction()?;
    let mut gameweek = require_gameweek(&tx, id)?;
    if open && gameweek.is_finished {
        return Err(FantasyError::GameweekFinished {
            number: gameweek.number,
        });
    }
    gameweek.is_voting_open = open;
    tx.save_gameweek(&gameweek)?;
    tx.commit()?;

    info!(
        "Voting for gameweek {} is now {}",
        gameweek.number,
        if open { "open" } else { "closed" }
    );
    Ok(gameweek)
}
