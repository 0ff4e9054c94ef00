//! Player catalogue maintenance.

use tracing::info;

use crate::cli::types::{PlayerId, Position};
use crate::commands::common::require_player;
use crate::commands::Actor;
use crate::error::FantasyError;
use crate::storage::{LeagueDatabase, LeagueStore, NewPlayer, Player, PlayerUpdate};
use crate::Result;

fn check_fields(name: &str, team_name: &str, price: f64) -> Result<()> {
    if name.trim().is_empty() {
        return Err(FantasyError::InvalidPlayer {
            message: "name must not be empty".to_string(),
        });
    }
    if team_name.trim().is_empty() {
        return Err(FantasyError::InvalidPlayer {
            message: "team name must not be empty".to_string(),
        });
    }
    if !price.is_finite() || price < 0.0 {
        return Err(FantasyError::InvalidPlayer {
            message: format!("price must be a non-negative number, got {price}"),
        });
    }
    Ok(())
}

pub fn create_player(db: &mut LeagueDatabase, actor: &Actor, player: &NewPlayer) -> Result<Player> {
    actor.require_admin("create a player")?;
    check_fields(&player.name, &player.team_name, player.price)?;

    let tx = db.transaction()?;
    let created = tx.insert_player(player)?;
    tx.commit()?;

    info!(
        "Created player {} ({}, {})",
        created.id, created.name, created.position
    );
    Ok(created)
}

/// Apply a partial edit. Points are untouched.
pub fn update_player(
    db: &mut LeagueDatabase,
    actor: &Actor,
    id: PlayerId,
    update: &PlayerUpdate,
) -> Result<Player> {
    actor.require_admin("update a player")?;

    let tx = db.transaction()?;
    let mut player = require_player(&tx, id)?;
    update.apply(&mut player);
    check_fields(&player.name, &player.team_name, player.price)?;
    tx.save_player(&player)?;
    tx.commit()?;

    info!("Updated player {}", player.id);
    Ok(player)
}

/// Soft delete: the player stays in history but can no longer be selected.
pub fn deactivate_player(db: &mut LeagueDatabase, actor: &Actor, id: PlayerId) -> Result<Player> {
    update_player(
        db,
        actor,
        id,
        &PlayerUpdate {
            is_active: Some(false),
            ..PlayerUpdate::default()
        },
    )
}

pub fn list_players(
    db: &LeagueDatabase,
    position: Option<Position>,
    include_inactive: bool,
) -> Result<Vec<Player>> {
    db.conn().list_players(position, include_inactive)
}
