//! Peer MVP voting.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::info;

use crate::cli::types::{GameweekId, PlayerId};
use crate::commands::common::{require_gameweek, require_player};
use crate::commands::Actor;
use crate::error::VoteError;
use crate::storage::{LeagueDatabase, LeagueStore, MvpVote};
use crate::Result;

/// Cast the caller's 1st/2nd/3rd picks. One vote per user per gameweek,
/// only while voting is open.
pub fn submit_vote(
    db: &mut LeagueDatabase,
    actor: &Actor,
    gameweek_id: GameweekId,
    picks: [PlayerId; 3],
    now: DateTime<Utc>,
) -> Result<MvpVote> {
    if picks.iter().collect::<HashSet<_>>().len() != picks.len() {
        return Err(VoteError::DuplicateCandidate.into());
    }

    let tx = db.transaction()?;
    let gameweek = require_gameweek(&tx, gameweek_id)?;
    if !gameweek.is_voting_open {
        return Err(VoteError::VotingClosed {
            number: gameweek.number,
        }
        .into());
    }
    if tx.has_voted(gameweek_id, actor.user_id)? {
        return Err(VoteError::AlreadyVoted {
            number: gameweek.number,
        }
        .into());
    }
    for pick in picks {
        require_player(&tx, pick)?;
    }

    let vote = MvpVote {
        gameweek_id,
        voter: actor.user_id,
        picks,
        created_at: now,
    };
    tx.insert_vote(&vote)?;
    tx.commit()?;

    info!(
        "User {} voted in gameweek {}",
        actor.user_id, gameweek.number
    );
    Ok(vote)
}

pub fn has_voted(db: &LeagueDatabase, actor: &Actor, gameweek_id: GameweekId) -> Result<bool> {
    db.conn().has_voted(gameweek_id, actor.user_id)
}
