//! Shared fixture for the integration tests.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

use fantasy_fives::commands::match_stats::{submit_match_stat, StatSubmission};
use fantasy_fives::commands::settlement::{settle_gameweek, SettlementSummary};
use fantasy_fives::commands::squads::{create_squad, select_squad, SelectionSummary, SquadSelection};
use fantasy_fives::commands::{gameweeks, players, Actor};
use fantasy_fives::storage::{
    LeagueDatabase, LeagueStore, MatchStatUpdate, NewGameweek, NewPlayer, SystemSettings,
};
use fantasy_fives::{Config, GameweekId, PlayerId, Position, Result, UserId};

/// Request time used by the tests, before every default deadline.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap()
}

pub fn deadline() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 5, 18, 0, 0).unwrap()
}

/// Two points for any position: appearance plus a win.
pub fn two_point_game() -> MatchStatUpdate {
    MatchStatUpdate {
        minutes_played: Some(40),
        matches_won: Some(1),
        ..MatchStatUpdate::default()
    }
}

pub struct Lineup {
    pub gk: PlayerId,
    pub def: PlayerId,
    pub mid: PlayerId,
    pub mid2: PlayerId,
    pub att: PlayerId,
}

impl Lineup {
    pub fn ids(&self) -> [PlayerId; 5] {
        [self.gk, self.def, self.mid, self.mid2, self.att]
    }
}

pub struct League {
    pub db: LeagueDatabase,
    pub config: Config,
    pub admin: Actor,
    pub settings: SystemSettings,
}

impl League {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            db: LeagueDatabase::new_in_memory().unwrap(),
            config,
            admin: Actor::admin(UserId::new(1)),
            settings: SystemSettings::default(),
        }
    }

    pub fn player(&mut self, name: &str, position: Position, price: f64) -> PlayerId {
        players::create_player(
            &mut self.db,
            &self.admin,
            &NewPlayer {
                name: name.to_string(),
                position,
                team_name: "Sunday FC".to_string(),
                price,
            },
        )
        .unwrap()
        .id
    }

    /// Five valid players costing 40.0 in total.
    pub fn lineup(&mut self, prefix: &str) -> Lineup {
        Lineup {
            gk: self.player(&format!("{prefix} Keeper"), Position::GK, 8.0),
            def: self.player(&format!("{prefix} Defender"), Position::DEF, 8.0),
            mid: self.player(&format!("{prefix} Midfielder"), Position::MID, 8.0),
            mid2: self.player(&format!("{prefix} Winger"), Position::MID, 8.0),
            att: self.player(&format!("{prefix} Striker"), Position::ATT, 8.0),
        }
    }

    pub fn gameweek(&mut self, number: u32) -> GameweekId {
        self.gameweek_with_deadline(number, deadline())
    }

    pub fn gameweek_with_deadline(&mut self, number: u32, deadline: DateTime<Utc>) -> GameweekId {
        gameweeks::create_gameweek(
            &mut self.db,
            &self.admin,
            &NewGameweek {
                number,
                name: format!("Gameweek {number}"),
                deadline,
            },
        )
        .unwrap()
        .id
    }

    pub fn manager(&mut self, user: i64) -> Actor {
        let actor = Actor::user(UserId::new(user));
        create_squad(&mut self.db, &actor, &self.config, &format!("Squad {user}")).unwrap();
        actor
    }

    pub fn select(
        &mut self,
        actor: &Actor,
        gameweek: GameweekId,
        players: [PlayerId; 5],
        captain: PlayerId,
    ) -> Result<SelectionSummary> {
        select_squad(
            &mut self.db,
            actor,
            &self.config,
            &self.settings,
            &SquadSelection {
                gameweek_id: gameweek,
                players: players.to_vec(),
                captain,
            },
            now(),
        )
    }

    pub fn stat(
        &mut self,
        gameweek: GameweekId,
        player: PlayerId,
        update: MatchStatUpdate,
    ) -> StatSubmission {
        submit_match_stat(
            &mut self.db,
            &self.admin,
            &self.config,
            gameweek,
            player,
            &update,
        )
        .unwrap()
    }

    pub fn settle(&mut self, gameweek: GameweekId) -> Result<SettlementSummary> {
        settle_gameweek(&mut self.db, &self.admin, &self.config, gameweek)
    }

    pub fn player_total(&self, id: PlayerId) -> i64 {
        self.db.conn().get_player(id).unwrap().unwrap().total_points
    }

    pub fn squad_total(&self, actor: &Actor) -> i64 {
        self.db
            .conn()
            .squad_for_owner(actor.user_id)
            .unwrap()
            .unwrap()
            .total_points
    }

    pub fn stat_points(&self, gameweek: GameweekId, player: PlayerId) -> i32 {
        self.db
            .conn()
            .get_match_stat(gameweek, player)
            .unwrap()
            .unwrap()
            .points
    }
}
