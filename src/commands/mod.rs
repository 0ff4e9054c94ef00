//! League operations
//!
//! Each mutating operation opens one immediate transaction on the
//! [`LeagueDatabase`](crate::storage::LeagueDatabase), checks the caller's
//! [`Actor`], and commits only when every step succeeded.

pub mod common;
pub mod gameweeks;
pub mod match_stats;
pub mod players;
pub mod settings;
pub mod settlement;
pub mod squads;
pub mod standings;
pub mod votes;


use serde::{Deserialize, Serialize};

use crate::cli::types::UserId;
use crate::error::FantasyError;
use crate::Result;

pub use common::CommandContext;

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub is_admin: bool,
}

impl Actor {
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id,
            is_admin: false,
        }
    }

    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            is_admin: true,
        }
    }

    pub fn require_admin(&self, action: &'static str) -> Result<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(FantasyError::Forbidden { action })
        }
    }
}
