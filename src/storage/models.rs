//! Data models for the storage layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::cli::types::{GameweekId, MiniLeagueId, PlayerId, Position, SquadId, UserId};
use crate::scoring::{Badge, StatLine};

/// Number of players in a squad.
pub const SQUAD_SIZE: usize = 5;

/// A player in the shared pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    pub team_name: String,
    pub price: f64,
    /// Cache of the player's stored per-gameweek points.
    pub total_points: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub position: Position,
    pub team_name: String,
    pub price: f64,
}

/// Admin edits to a player. Only the listed fields can change; points are
/// never editable from here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub position: Option<Position>,
    pub team_name: Option<String>,
    pub price: Option<f64>,
    pub is_active: Option<bool>,
}

impl PlayerUpdate {
    pub fn apply(&self, player: &mut Player) {
        if let Some(name) = &self.name {
            player.name = name.clone();
        }
        if let Some(position) = self.position {
            player.position = position;
        }
        if let Some(team_name) = &self.team_name {
            player.team_name = team_name.clone();
        }
        if let Some(price) = self.price {
            player.price = price;
        }
        if let Some(is_active) = self.is_active {
            player.is_active = is_active;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gameweek {
    pub id: GameweekId,
    pub number: u32,
    pub name: String,
    pub deadline: DateTime<Utc>,
    pub is_active: bool,
    pub is_finished: bool,
    pub is_voting_open: bool,
}

impl Gameweek {
    pub fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        now > self.deadline
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameweek {
    pub number: u32,
    pub name: String,
    pub deadline: DateTime<Utc>,
}

/// Recorded events and derived scoring for one player in one gameweek.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStat {
    pub gameweek_id: GameweekId,
    pub player_id: PlayerId,
    #[serde(flatten)]
    pub line: StatLine,
    pub points: i32,
    pub badges: BTreeSet<Badge>,
}

impl MatchStat {
    pub fn empty(gameweek_id: GameweekId, player_id: PlayerId) -> Self {
        Self {
            gameweek_id,
            player_id,
            line: StatLine::default(),
            points: 0,
            badges: BTreeSet::new(),
        }
    }

    pub fn mvp_rank(&self) -> u8 {
        self.line.mvp.rank_number()
    }
}

/// Admin stat entry. Lists exactly the raw event counts; derived fields
/// (points, MVP award, badges) are not settable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStatUpdate {
    pub goals: Option<u32>,
    pub assists: Option<u32>,
    pub clean_sheet: Option<u32>,
    pub saves: Option<u32>,
    pub defensive_errors: Option<u32>,
    pub own_goals: Option<u32>,
    pub minutes_played: Option<u32>,
    pub penalties_scored: Option<u32>,
    pub penalties_saved: Option<u32>,
    pub penalties_missed: Option<u32>,
    pub nutmegs: Option<u32>,
    pub matches_won: Option<u32>,
}

impl MatchStatUpdate {
    pub fn apply(&self, line: &mut StatLine) {
        let fields = [
            (self.goals, &mut line.goals),
            (self.assists, &mut line.assists),
            (self.clean_sheet, &mut line.clean_sheet),
            (self.saves, &mut line.saves),
            (self.defensive_errors, &mut line.defensive_errors),
            (self.own_goals, &mut line.own_goals),
            (self.minutes_played, &mut line.minutes_played),
            (self.penalties_scored, &mut line.penalties_scored),
            (self.penalties_saved, &mut line.penalties_saved),
            (self.penalties_missed, &mut line.penalties_missed),
            (self.nutmegs, &mut line.nutmegs),
            (self.matches_won, &mut line.matches_won),
        ];
        for (value, field) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MvpVote {
    pub gameweek_id: GameweekId,
    pub voter: UserId,
    /// First, second and third pick.
    pub picks: [PlayerId; 3],
    pub created_at: DateTime<Utc>,
}

/// A manager's fantasy team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Squad {
    pub id: SquadId,
    pub owner: UserId,
    pub name: String,
    pub budget_remaining: f64,
    /// Cache of the squad's settled gameweek points.
    pub total_points: i64,
    pub free_transfers: u32,
}

/// A squad's selection and score for one gameweek.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadGameweek {
    pub squad_id: SquadId,
    pub gameweek_id: GameweekId,
    pub slots: [PlayerId; SQUAD_SIZE],
    pub captain: PlayerId,
    pub transfers_made: u32,
    pub transfer_penalty: i32,
    pub gameweek_points: i32,
}

impl SquadGameweek {
    /// Copy of this selection for another gameweek, with transfers and
    /// points cleared.
    pub fn rolled_over(&self, gameweek_id: GameweekId) -> Self {
        Self {
            squad_id: self.squad_id,
            gameweek_id,
            slots: self.slots,
            captain: self.captain,
            transfers_made: 0,
            transfer_penalty: 0,
            gameweek_points: 0,
        }
    }

    pub fn has_player(&self, player_id: PlayerId) -> bool {
        self.slots.contains(&player_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniLeague {
    pub id: MiniLeagueId,
    pub name: String,
    pub join_code: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Process-wide admin toggles, read once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSettings {
    pub allow_transfers: bool,
    pub show_dashboard_stats: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            allow_transfers: true,
            show_dashboard_stats: false,
        }
    }
}
