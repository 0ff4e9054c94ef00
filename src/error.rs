//! Error types for the fantasy five-a-side backend

use thiserror::Error;

use crate::config::ConfigError;


pub type Result<T> = std::result::Result<T, FantasyError>;

#[derive(Error, Debug)]
pub enum FantasyError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Permission denied: {action} requires an administrator")]
    Forbidden { action: &'static str },

    #[error("Invalid squad selection: {0}")]
    Selection(#[from] SelectionError),

    #[error("Vote rejected: {0}")]
    Vote(#[from] VoteError),

    #[error("Gameweek {number} is already finished")]
    GameweekFinished { number: u32 },

    #[error("Gameweek number {number} already exists")]
    DuplicateGameweek { number: u32 },

    #[error("Squad already exists for user {owner}")]
    DuplicateSquad { owner: String },

    #[error("Already a member of league {league}")]
    AlreadyMember { league: String },

    #[error("Invalid player data: {message}")]
    InvalidPlayer { message: String },

    #[error("Gameweek {number} has no match stats to settle")]
    NothingToSettle { number: u32 },

    #[error("Captain {captain} is not one of the five players of squad {squad}")]
    CaptainNotInSquad { squad: String, captain: String },
}

impl FantasyError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        FantasyError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Errors caused by the request itself. Nothing was written and retrying
    /// the same request will fail the same way.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FantasyError::NotFound { .. }
                | FantasyError::Forbidden { .. }
                | FantasyError::Selection(_)
                | FantasyError::Vote(_)
                | FantasyError::GameweekFinished { .. }
                | FantasyError::DuplicateGameweek { .. }
                | FantasyError::DuplicateSquad { .. }
                | FantasyError::AlreadyMember { .. }
                | FantasyError::InvalidPlayer { .. }
                | FantasyError::NothingToSettle { .. }
                | FantasyError::CaptainNotInSquad { .. }
        )
    }
}

/// Reasons a squad submission is refused.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("must select exactly {expected} players, got {actual}")]
    WrongSquadSize { expected: usize, actual: usize },

    #[error("player {player} appears more than once")]
    DuplicatePlayer { player: String },

    #[error("player {player} is not available for selection")]
    PlayerUnavailable { player: String },

    #[error("squad must have exactly 1 GK, got {count}")]
    GoalkeeperCount { count: usize },

    #[error("squad needs {min} to {max} {position} players, got {count}")]
    OutfieldCount {
        position: String,
        count: usize,
        min: usize,
        max: usize,
    },

    #[error("captain must be one of the selected players")]
    CaptainNotSelected,

    #[error("total cost {cost:.1}M exceeds budget of {cap:.1}M")]
    OverBudget { cost: f64, cap: f64 },

    #[error("the deadline for gameweek {number} has passed")]
    DeadlinePassed { number: u32 },

    #[error("gameweek {number} is already finished")]
    GameweekClosed { number: u32 },

    #[error("transfers are currently locked by the administrator")]
    TransfersLocked,
}

/// Reasons an MVP vote is refused.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoteError {
    #[error("voting is not open for gameweek {number}")]
    VotingClosed { number: u32 },

    #[error("already voted in gameweek {number}")]
    AlreadyVoted { number: u32 },

    #[error("the three picks must be different players")]
    DuplicateCandidate,
}
