//! Common utilities and helper functions shared across commands.

use rusqlite::Connection;
use tracing::debug;

use crate::{
    cli::types::{GameweekId, PlayerId},
    commands::Actor,
    config::Config,
    error::FantasyError,
    storage::{Gameweek, LeagueDatabase, LeagueStore, Player, SystemSettings},
    Result,
};

/// Resources one request needs: configuration, a connection, the caller and
/// the system toggles as they stood when the request began.
pub struct CommandContext {
    pub config: Config,
    pub db: LeagueDatabase,
    pub actor: Actor,
    pub settings: SystemSettings,
}

impl CommandContext {
    /// Open the configured database and read the settings once.
    pub fn open(config: Config, actor: Actor) -> Result<Self> {
        let path = config.database_path()?;
        debug!("Connecting to database at {}", path.display());
        let db = LeagueDatabase::open(&path, &config)?;
        Self::with_database(config, db, actor)
    }

    pub fn with_database(config: Config, db: LeagueDatabase, actor: Actor) -> Result<Self> {
        let settings = db.conn().load_settings()?;
        Ok(Self {
            config,
            db,
            actor,
            settings,
        })
    }
}

pub(crate) fn require_gameweek(conn: &Connection, id: GameweekId) -> Result<Gameweek> {
    conn.get_gameweek(id)?
        .ok_or_else(|| FantasyError::not_found("gameweek", id))
}

pub(crate) fn require_player(conn: &Connection, id: PlayerId) -> Result<Player> {
    conn.get_player(id)?
        .ok_or_else(|| FantasyError::not_found("player", id))
}
