//! Database schema and connection management

use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::Result;

/// Connection to the league database.
///
/// Every mutating operation runs inside [`LeagueDatabase::transaction`], which
/// takes SQLite's write lock up front.
pub struct LeagueDatabase {
    pub(crate) conn: Connection,
}

impl LeagueDatabase {
    /// Open (or create) the database at `path` and ensure tables exist.
    pub fn open(path: &Path, config: &Config) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        debug!("Opened league database at {}", path.display());
        Self::with_connection(conn)
    }

    /// Fresh in-memory database, used by tests.
    pub fn new_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Read access outside a transaction.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a write transaction. Dropping it without `commit` rolls back.
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }

    /// Initialize the database schema
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS players (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                position TEXT NOT NULL,
                team_name TEXT NOT NULL,
                price REAL NOT NULL,
                total_points INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS gameweeks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                number INTEGER NOT NULL UNIQUE,
                name TEXT NOT NULL,
                deadline TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 0,
                is_finished INTEGER NOT NULL DEFAULT 0,
                is_voting_open INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS match_stats (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                gameweek_id INTEGER NOT NULL REFERENCES gameweeks(id),
                player_id INTEGER NOT NULL REFERENCES players(id),
                goals INTEGER NOT NULL DEFAULT 0,
                assists INTEGER NOT NULL DEFAULT 0,
                clean_sheet INTEGER NOT NULL DEFAULT 0,
                saves INTEGER NOT NULL DEFAULT 0,
                defensive_errors INTEGER NOT NULL DEFAULT 0,
                own_goals INTEGER NOT NULL DEFAULT 0,
                minutes_played INTEGER NOT NULL DEFAULT 0,
                penalties_scored INTEGER NOT NULL DEFAULT 0,
                penalties_saved INTEGER NOT NULL DEFAULT 0,
                penalties_missed INTEGER NOT NULL DEFAULT 0,
                nutmegs INTEGER NOT NULL DEFAULT 0,
                matches_won INTEGER NOT NULL DEFAULT 0,
                mvp_source TEXT NOT NULL DEFAULT 'none',
                mvp_rank INTEGER NOT NULL DEFAULT 0,
                points INTEGER NOT NULL DEFAULT 0,
                badges TEXT NOT NULL DEFAULT '',
                UNIQUE (gameweek_id, player_id)
            );

            CREATE TABLE IF NOT EXISTS mvp_votes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                gameweek_id INTEGER NOT NULL REFERENCES gameweeks(id),
                voter_id INTEGER NOT NULL,
                first_pick INTEGER NOT NULL REFERENCES players(id),
                second_pick INTEGER NOT NULL REFERENCES players(id),
                third_pick INTEGER NOT NULL REFERENCES players(id),
                created_at TEXT NOT NULL,
                UNIQUE (gameweek_id, voter_id)
            );

            CREATE TABLE IF NOT EXISTS squads (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id INTEGER NOT NULL UNIQUE,
                name TEXT NOT NULL,
                budget_remaining REAL NOT NULL,
                total_points INTEGER NOT NULL DEFAULT 0,
                free_transfers INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS squad_gameweeks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                squad_id INTEGER NOT NULL REFERENCES squads(id),
                gameweek_id INTEGER NOT NULL REFERENCES gameweeks(id),
                slot_1 INTEGER NOT NULL REFERENCES players(id),
                slot_2 INTEGER NOT NULL REFERENCES players(id),
                slot_3 INTEGER NOT NULL REFERENCES players(id),
                slot_4 INTEGER NOT NULL REFERENCES players(id),
                slot_5 INTEGER NOT NULL REFERENCES players(id),
                captain_id INTEGER NOT NULL REFERENCES players(id),
                transfers_made INTEGER NOT NULL DEFAULT 0,
                transfer_penalty INTEGER NOT NULL DEFAULT 0,
                gameweek_points INTEGER NOT NULL DEFAULT 0,
                UNIQUE (squad_id, gameweek_id)
            );

            CREATE TABLE IF NOT EXISTS mini_leagues (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                join_code TEXT NOT NULL UNIQUE,
                created_by INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS mini_league_members (
                league_id INTEGER NOT NULL REFERENCES mini_leagues(id),
                user_id INTEGER NOT NULL,
                joined_at TEXT NOT NULL,
                PRIMARY KEY (league_id, user_id)
            );

            CREATE TABLE IF NOT EXISTS system_settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                allow_transfers INTEGER NOT NULL,
                show_dashboard_stats INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_match_stats_gameweek
                ON match_stats(gameweek_id);
            CREATE INDEX IF NOT EXISTS idx_squad_gameweeks_gameweek
                ON squad_gameweeks(gameweek_id);
            CREATE INDEX IF NOT EXISTS idx_mvp_votes_gameweek
                ON mvp_votes(gameweek_id, id);",
        )?;

        Ok(())
    }

    /// Drop every row. Schema stays in place.
    pub fn clear_all_data(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "DELETE FROM mini_league_members;
             DELETE FROM mini_leagues;
             DELETE FROM squad_gameweeks;
             DELETE FROM squads;
             DELETE FROM mvp_votes;
             DELETE FROM match_stats;
             DELETE FROM gameweeks;
             DELETE FROM players;
             DELETE FROM system_settings;",
        )?;
        Ok(())
    }
}
