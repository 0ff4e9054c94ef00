//! CLI argument definitions and parsing.

pub mod types;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use types::{GameweekId, MiniLeagueId, PlayerId, Position, UserId};

use crate::storage::MatchStatUpdate;

#[derive(Debug, Parser)]
#[clap(name = "fantasy-fives", about = "Fantasy five-a-side league manager")]
pub struct FantasyFives {
    /// Config file (or set `FANTASY_FIVES_CONFIG`).
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Act as this user id.
    #[clap(long = "as-user", global = true, default_value_t = UserId::new(1))]
    pub as_user: UserId,

    /// Act with administrator rights.
    #[clap(long, global = true)]
    pub admin: bool,

    /// Output results as JSON instead of text lines.
    #[clap(long, global = true)]
    pub json: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage the player pool.
    Player {
        #[clap(subcommand)]
        cmd: PlayerCmd,
    },

    /// Create, activate, vote on and settle gameweeks.
    Gameweek {
        #[clap(subcommand)]
        cmd: GameweekCmd,
    },

    /// Enter and inspect match stats.
    Stat {
        #[clap(subcommand)]
        cmd: StatCmd,
    },

    /// Manage your squad.
    Squad {
        #[clap(subcommand)]
        cmd: SquadCmd,
    },

    /// MVP voting.
    Vote {
        #[clap(subcommand)]
        cmd: VoteCmd,
    },

    /// Mini-leagues.
    League {
        #[clap(subcommand)]
        cmd: LeagueCmd,
    },

    /// Global leaderboard by total points.
    Leaderboard {
        /// Number of squads to show.
        #[clap(long, default_value_t = 50)]
        limit: usize,
    },

    /// Dashboard highlights (most owned, top scorers).
    Highlights,

    /// System toggles.
    Settings {
        #[clap(subcommand)]
        cmd: SettingsCmd,
    },
}

#[derive(Debug, Subcommand)]
pub enum PlayerCmd {
    /// Add a player to the pool (admin).
    Add {
        #[clap(long)]
        name: String,

        /// GK, DEF, MID or ATT (first letter is enough).
        #[clap(long, short)]
        position: Position,

        #[clap(long)]
        team: String,

        /// Price in millions.
        #[clap(long)]
        price: f64,
    },

    /// Edit a player (admin).
    Update {
        id: PlayerId,

        #[clap(long)]
        name: Option<String>,

        #[clap(long, short)]
        position: Option<Position>,

        #[clap(long)]
        team: Option<String>,

        #[clap(long)]
        price: Option<f64>,

        #[clap(long)]
        active: Option<bool>,
    },

    /// Withdraw a player from selection (admin).
    Deactivate { id: PlayerId },

    /// List players, best scorers first.
    List {
        #[clap(long, short)]
        position: Option<Position>,

        /// Include deactivated players.
        #[clap(long)]
        all: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum GameweekCmd {
    /// Schedule a gameweek (admin).
    Create {
        #[clap(long)]
        number: u32,

        #[clap(long)]
        name: String,

        /// Selection deadline, RFC 3339 (e.g. 2026-09-05T18:00:00Z).
        #[clap(long)]
        deadline: DateTime<Utc>,
    },

    /// List all gameweeks.
    List,

    /// Show the active gameweek.
    Active,

    /// Make a gameweek active and roll squads into it (admin).
    Activate { id: GameweekId },

    /// Open or close MVP voting (admin).
    Voting {
        id: GameweekId,

        /// `true` to open, `false` to close.
        #[clap(long, action = clap::ArgAction::Set)]
        open: bool,
    },

    /// Score the gameweek and close it (admin).
    Settle { id: GameweekId },
}

/// Raw event counts. Omitted fields keep their stored value.
#[derive(Debug, Args)]
pub struct StatArgs {
    #[clap(long)]
    pub goals: Option<u32>,
    #[clap(long)]
    pub assists: Option<u32>,
    #[clap(long)]
    pub clean_sheets: Option<u32>,
    #[clap(long)]
    pub saves: Option<u32>,
    #[clap(long)]
    pub defensive_errors: Option<u32>,
    #[clap(long)]
    pub own_goals: Option<u32>,
    /// Minutes played. A player's first entry defaults to 120.
    #[clap(long)]
    pub minutes: Option<u32>,
    #[clap(long)]
    pub penalties_scored: Option<u32>,
    #[clap(long)]
    pub penalties_saved: Option<u32>,
    #[clap(long)]
    pub penalties_missed: Option<u32>,
    #[clap(long)]
    pub nutmegs: Option<u32>,
    #[clap(long)]
    pub matches_won: Option<u32>,
}

impl From<StatArgs> for MatchStatUpdate {
    fn from(args: StatArgs) -> Self {
        MatchStatUpdate {
            goals: args.goals,
            assists: args.assists,
            clean_sheet: args.clean_sheets,
            saves: args.saves,
            defensive_errors: args.defensive_errors,
            own_goals: args.own_goals,
            minutes_played: args.minutes,
            penalties_scored: args.penalties_scored,
            penalties_saved: args.penalties_saved,
            penalties_missed: args.penalties_missed,
            nutmegs: args.nutmegs,
            matches_won: args.matches_won,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum StatCmd {
    /// Record events for a player (admin).
    Set {
        #[clap(long, short)]
        gameweek: GameweekId,

        #[clap(long, short)]
        player: PlayerId,

        #[clap(flatten)]
        stats: StatArgs,
    },

    /// Explain a player's points for a gameweek.
    Show {
        #[clap(long, short)]
        gameweek: GameweekId,

        #[clap(long, short)]
        player: PlayerId,
    },

    /// All stat lines of a gameweek.
    List {
        #[clap(long, short)]
        gameweek: GameweekId,
    },
}

#[derive(Debug, Subcommand)]
pub enum SquadCmd {
    /// Create your squad.
    Create {
        #[clap(long)]
        name: String,
    },

    /// Show your squad.
    Show,

    /// Pick five players and a captain for a gameweek.
    Select {
        #[clap(long, short)]
        gameweek: GameweekId,

        /// Five player ids: `--players 1,2,3,4,5`.
        #[clap(long, value_delimiter = ',')]
        players: Vec<PlayerId>,

        #[clap(long, short)]
        captain: PlayerId,
    },

    /// Your selections and scores per gameweek.
    History,
}

#[derive(Debug, Subcommand)]
pub enum VoteCmd {
    /// Vote for the gameweek podium.
    Cast {
        #[clap(long, short)]
        gameweek: GameweekId,

        #[clap(long)]
        first: PlayerId,

        #[clap(long)]
        second: PlayerId,

        #[clap(long)]
        third: PlayerId,
    },

    /// Whether you have voted in a gameweek.
    Status {
        #[clap(long, short)]
        gameweek: GameweekId,
    },
}

#[derive(Debug, Subcommand)]
pub enum LeagueCmd {
    /// Create a mini-league and print its join code.
    Create {
        #[clap(long)]
        name: String,
    },

    /// Join a mini-league by code.
    Join {
        #[clap(long)]
        code: String,
    },

    /// Leagues you belong to.
    Mine,

    /// Standings of one league.
    Standings { id: MiniLeagueId },
}

#[derive(Debug, Subcommand)]
pub enum SettingsCmd {
    /// Show current toggles.
    Show,

    /// Change toggles (admin).
    Set {
        #[clap(long)]
        allow_transfers: Option<bool>,

        #[clap(long)]
        show_dashboard_stats: Option<bool>,
    },
}
