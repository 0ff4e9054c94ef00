//! Fantasy Fives league backend
//!
//! Scoring, squad selection and gameweek settlement for a fantasy five-a-side
//! league. Managers pick five real players under a budget, admins record match
//! events, and settlement turns those events into player and squad points.
//!
//! ## Layout
//!
//! - [`scoring`]: the pure points engine (rules table, calculator, MVP
//!   strategies, badges)
//! - [`storage`]: SQLite persistence behind [`storage::LeagueStore`]
//! - [`commands`]: the transactional operations (settlement, squad selection,
//!   voting, stat entry, gameweek lifecycle, mini-leagues)
//! - [`config`]: TOML configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fantasy_fives::commands::{settlement::settle_gameweek, Actor};
//! use fantasy_fives::storage::LeagueDatabase;
//! use fantasy_fives::{Config, GameweekId, UserId};
//!
//! # fn example() -> fantasy_fives::Result<()> {
//! let config = Config::default();
//! let mut db = LeagueDatabase::open(&config.database_path()?, &config)?;
//! let admin = Actor::admin(UserId::new(1));
//! let summary = settle_gameweek(&mut db, &admin, &config, GameweekId::new(3))?;
//! println!("settled {} stat lines", summary.stats_settled);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! ```bash
//! export FANTASY_FIVES_CONFIG=~/league/config.toml
//! export FANTASY_FIVES_DB=~/league/league.db
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod scoring;
pub mod storage;

// Re-export commonly used types
pub use cli::types::{GameweekId, MiniLeagueId, PlayerId, Position, SquadId, UserId};
pub use config::Config;
pub use error::{FantasyError, Result};

pub const CONFIG_ENV_VAR: &str = "FANTASY_FIVES_CONFIG";
pub const DATABASE_ENV_VAR: &str = "FANTASY_FIVES_DB";
