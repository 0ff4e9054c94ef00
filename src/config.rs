// Configuration loading and validation (config.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::scoring::{MvpStrategy, RatingWeights, ScoringRules};
use crate::{CONFIG_ENV_VAR, DATABASE_ENV_VAR};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("could not determine a data directory for the league database")]
    NoDataDir,
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Explicit database location. See [`Config::database_path`].
    pub database_path: Option<PathBuf>,
    /// How long a request waits for another writer before giving up.
    pub busy_timeout_ms: u64,
    pub mvp_strategy: MvpStrategy,
    pub squad: SquadRules,
    pub scoring: ScoringRules,
    pub rating: RatingWeights,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            busy_timeout_ms: 5_000,
            mvp_strategy: MvpStrategy::default(),
            squad: SquadRules::default(),
            scoring: ScoringRules::default(),
            rating: RatingWeights::default(),
        }
    }
}

/// Squad composition and transfer economics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SquadRules {
    /// Maximum total price of the five players, in millions.
    pub budget_cap: f64,
    /// Points deducted per transfer beyond the free allowance.
    pub transfer_cost: i32,
    /// Free transfers a new squad starts with.
    pub starting_free_transfers: u32,
    /// Upper bound for DEF, MID and ATT each (the lower bound is always 1).
    pub max_per_outfield_position: usize,
}

impl Default for SquadRules {
    fn default() -> Self {
        Self {
            budget_cap: 50.0,
            transfer_cost: 4,
            starting_free_transfers: 1,
            max_per_outfield_position: 3,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scoring.save_block_size == 0 {
            return Err(validation("scoring.save_block_size", "must be at least 1"));
        }
        if self.scoring.points_floor > 0 {
            return Err(validation("scoring.points_floor", "must not be positive"));
        }
        if !(self.squad.budget_cap.is_finite() && self.squad.budget_cap > 0.0) {
            return Err(validation("squad.budget_cap", "must be a positive number"));
        }
        if self.squad.transfer_cost < 0 {
            return Err(validation("squad.transfer_cost", "must not be negative"));
        }
        if !(1..=3).contains(&self.squad.max_per_outfield_position) {
            return Err(validation(
                "squad.max_per_outfield_position",
                "must be between 1 and 3 for a five-player squad",
            ));
        }
        Ok(())
    }

    /// Where the league database lives.
    ///
    /// `FANTASY_FIVES_DB` wins over `database_path`, which wins over
    /// `<data dir>/fantasy-fives/league.db`.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Ok(from_env) = std::env::var(DATABASE_ENV_VAR) {
            if !from_env.trim().is_empty() {
                return Ok(PathBuf::from(from_env));
            }
        }
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
        Ok(data_dir.join("fantasy-fives").join("league.db"))
    }
}

fn validation(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Default location: `<config dir>/fantasy-fives/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fantasy-fives").join("config.toml"))
}

/// Load configuration.
///
/// An explicit path (the `--config` flag) or the `FANTASY_FIVES_CONFIG`
/// variable must point at an existing file. Otherwise the default location is
/// read if present, and built-in defaults are used if not.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }
    if let Ok(from_env) = std::env::var(CONFIG_ENV_VAR) {
        if !from_env.trim().is_empty() {
            return load_config_from(Path::new(&from_env));
        }
    }
    match default_config_path() {
        Some(path) if path.exists() => load_config_from(&path),
        _ => {
            debug!("No config file found, using built-in defaults");
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}

/// Load and validate a config file at `path`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&text, path)?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Parse and validate config text. `path` is only used in error messages.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(text).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}
