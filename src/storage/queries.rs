//! Record access for the league tables
//!
//! [`LeagueStore`] is implemented for [`Connection`], so the same calls work
//! on a plain connection and, through deref, inside a [`rusqlite::Transaction`].

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::*;
use crate::cli::types::{GameweekId, MiniLeagueId, PlayerId, Position, SquadId, UserId};
use crate::scoring::badges::{decode_badges, encode_badges};
use crate::scoring::{MvpAward, StatLine};
use crate::Result;

const PLAYER_COLUMNS: &str = "id, name, position, team_name, price, total_points, is_active";

const GAMEWEEK_COLUMNS: &str =
    "id, number, name, deadline, is_active, is_finished, is_voting_open";

const MATCH_STAT_COLUMNS: &str = "gameweek_id, player_id, goals, assists, clean_sheet, saves,
    defensive_errors, own_goals, minutes_played, penalties_scored, penalties_saved,
    penalties_missed, nutmegs, matches_won, mvp_source, mvp_rank, points, badges";

const SQUAD_COLUMNS: &str = "id, owner_id, name, budget_remaining, total_points, free_transfers";

const SQUAD_GAMEWEEK_COLUMNS: &str = "sg.squad_id, sg.gameweek_id, sg.slot_1, sg.slot_2,
    sg.slot_3, sg.slot_4, sg.slot_5, sg.captain_id, sg.transfers_made, sg.transfer_penalty,
    sg.gameweek_points";

const LEAGUE_COLUMNS: &str = "id, name, join_code, created_by, created_at";

/// Get/query/upsert by key over the league tables.
///
/// Nothing here checks permissions or business rules; that is the job of
/// [`crate::commands`].
pub trait LeagueStore {
    // Players
    fn insert_player(&self, player: &NewPlayer) -> Result<Player>;
    fn get_player(&self, id: PlayerId) -> Result<Option<Player>>;
    fn list_players(&self, position: Option<Position>, include_inactive: bool)
        -> Result<Vec<Player>>;
    /// Persist the editable fields. `total_points` is left alone.
    fn save_player(&self, player: &Player) -> Result<()>;
    fn add_player_points(&self, id: PlayerId, delta: i64) -> Result<()>;

    // Gameweeks
    fn insert_gameweek(&self, gameweek: &NewGameweek) -> Result<Gameweek>;
    fn get_gameweek(&self, id: GameweekId) -> Result<Option<Gameweek>>;
    fn gameweek_by_number(&self, number: u32) -> Result<Option<Gameweek>>;
    fn list_gameweeks(&self) -> Result<Vec<Gameweek>>;
    fn active_gameweek(&self) -> Result<Option<Gameweek>>;
    fn last_finished_gameweek(&self) -> Result<Option<Gameweek>>;
    fn save_gameweek(&self, gameweek: &Gameweek) -> Result<()>;
    fn deactivate_all_gameweeks(&self) -> Result<usize>;

    // Match stats
    fn get_match_stat(&self, gameweek: GameweekId, player: PlayerId) -> Result<Option<MatchStat>>;
    fn list_match_stats(&self, gameweek: GameweekId) -> Result<Vec<MatchStat>>;
    fn upsert_match_stat(&self, stat: &MatchStat) -> Result<()>;

    // MVP votes
    fn insert_vote(&self, vote: &MvpVote) -> Result<()>;
    fn has_voted(&self, gameweek: GameweekId, voter: UserId) -> Result<bool>;
    /// Votes for a gameweek in submission order.
    fn list_votes(&self, gameweek: GameweekId) -> Result<Vec<MvpVote>>;

    // Squads
    fn insert_squad(
        &self,
        owner: UserId,
        name: &str,
        budget: f64,
        free_transfers: u32,
    ) -> Result<Squad>;
    fn get_squad(&self, id: SquadId) -> Result<Option<Squad>>;
    fn squad_for_owner(&self, owner: UserId) -> Result<Option<Squad>>;
    fn list_squads(&self) -> Result<Vec<Squad>>;
    /// Persist name, budget and free transfers. `total_points` is left alone.
    fn save_squad(&self, squad: &Squad) -> Result<()>;
    fn add_squad_points(&self, id: SquadId, delta: i64) -> Result<()>;

    // Squad gameweeks
    fn get_squad_gameweek(
        &self,
        squad: SquadId,
        gameweek: GameweekId,
    ) -> Result<Option<SquadGameweek>>;
    /// Most recent row for `squad` in a gameweek numbered below `before`.
    fn latest_squad_gameweek_before(
        &self,
        squad: SquadId,
        before: u32,
    ) -> Result<Option<SquadGameweek>>;
    fn list_squad_gameweeks(&self, gameweek: GameweekId) -> Result<Vec<SquadGameweek>>;
    /// Every row for `squad`, oldest gameweek first.
    fn squad_history(&self, squad: SquadId) -> Result<Vec<SquadGameweek>>;
    fn upsert_squad_gameweek(&self, row: &SquadGameweek) -> Result<()>;

    // Mini-leagues
    fn insert_league(
        &self,
        name: &str,
        join_code: &str,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> Result<MiniLeague>;
    fn get_league(&self, id: MiniLeagueId) -> Result<Option<MiniLeague>>;
    fn league_by_code(&self, join_code: &str) -> Result<Option<MiniLeague>>;
    fn add_member(&self, league: MiniLeagueId, user: UserId, now: DateTime<Utc>) -> Result<()>;
    fn is_member(&self, league: MiniLeagueId, user: UserId) -> Result<bool>;
    fn league_members(&self, league: MiniLeagueId) -> Result<Vec<UserId>>;
    fn leagues_for_user(&self, user: UserId) -> Result<Vec<MiniLeague>>;

    // Settings
    fn load_settings(&self) -> Result<SystemSettings>;
    fn save_settings(&self, settings: &SystemSettings) -> Result<()>;
}

fn row_to_player(row: &Row) -> rusqlite::Result<Player> {
    let position: String = row.get(2)?;
    Ok(Player {
        id: PlayerId::new(row.get(0)?),
        name: row.get(1)?,
        position: Position::normalize(&position),
        team_name: row.get(3)?,
        price: row.get(4)?,
        total_points: row.get(5)?,
        is_active: row.get(6)?,
    })
}

fn row_to_gameweek(row: &Row) -> rusqlite::Result<Gameweek> {
    Ok(Gameweek {
        id: GameweekId::new(row.get(0)?),
        number: row.get(1)?,
        name: row.get(2)?,
        deadline: row.get(3)?,
        is_active: row.get(4)?,
        is_finished: row.get(5)?,
        is_voting_open: row.get(6)?,
    })
}

fn row_to_match_stat(row: &Row) -> rusqlite::Result<MatchStat> {
    let mvp_source: String = row.get(14)?;
    let mvp_rank: u8 = row.get(15)?;
    let badges: String = row.get(17)?;
    Ok(MatchStat {
        gameweek_id: GameweekId::new(row.get(0)?),
        player_id: PlayerId::new(row.get(1)?),
        line: StatLine {
            goals: row.get(2)?,
            assists: row.get(3)?,
            clean_sheet: row.get(4)?,
            saves: row.get(5)?,
            defensive_errors: row.get(6)?,
            own_goals: row.get(7)?,
            minutes_played: row.get(8)?,
            penalties_scored: row.get(9)?,
            penalties_saved: row.get(10)?,
            penalties_missed: row.get(11)?,
            nutmegs: row.get(12)?,
            matches_won: row.get(13)?,
            mvp: MvpAward::from_parts(&mvp_source, mvp_rank),
        },
        points: row.get(16)?,
        badges: decode_badges(&badges),
    })
}

fn row_to_vote(row: &Row) -> rusqlite::Result<MvpVote> {
    Ok(MvpVote {
        gameweek_id: GameweekId::new(row.get(0)?),
        voter: UserId::new(row.get(1)?),
        picks: [
            PlayerId::new(row.get(2)?),
            PlayerId::new(row.get(3)?),
            PlayerId::new(row.get(4)?),
        ],
        created_at: row.get(5)?,
    })
}

fn row_to_squad(row: &Row) -> rusqlite::Result<Squad> {
    Ok(Squad {
        id: SquadId::new(row.get(0)?),
        owner: UserId::new(row.get(1)?),
        name: row.get(2)?,
        budget_remaining: row.get(3)?,
        total_points: row.get(4)?,
        free_transfers: row.get(5)?,
    })
}

fn row_to_squad_gameweek(row: &Row) -> rusqlite::Result<SquadGameweek> {
    Ok(SquadGameweek {
        squad_id: SquadId::new(row.get(0)?),
        gameweek_id: GameweekId::new(row.get(1)?),
        slots: [
            PlayerId::new(row.get(2)?),
            PlayerId::new(row.get(3)?),
            PlayerId::new(row.get(4)?),
            PlayerId::new(row.get(5)?),
            PlayerId::new(row.get(6)?),
        ],
        captain: PlayerId::new(row.get(7)?),
        transfers_made: row.get(8)?,
        transfer_penalty: row.get(9)?,
        gameweek_points: row.get(10)?,
    })
}

fn row_to_league(row: &Row) -> rusqlite::Result<MiniLeague> {
    Ok(MiniLeague {
        id: MiniLeagueId::new(row.get(0)?),
        name: row.get(1)?,
        join_code: row.get(2)?,
        created_by: UserId::new(row.get(3)?),
        created_at: row.get(4)?,
    })
}

impl LeagueStore for Connection {
    fn insert_player(&self, player: &NewPlayer) -> Result<Player> {
        self.execute(
            "INSERT INTO players (name, position, team_name, price) VALUES (?, ?, ?, ?)",
            params![
                player.name,
                player.position.as_str(),
                player.team_name,
                player.price
            ],
        )?;
        Ok(Player {
            id: PlayerId::new(self.last_insert_rowid()),
            name: player.name.clone(),
            position: player.position,
            team_name: player.team_name.clone(),
            price: player.price,
            total_points: 0,
            is_active: true,
        })
    }

    fn get_player(&self, id: PlayerId) -> Result<Option<Player>> {
        let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?");
        Ok(self
            .query_row(&sql, [id.as_i64()], row_to_player)
            .optional()?)
    }

    fn list_players(
        &self,
        position: Option<Position>,
        include_inactive: bool,
    ) -> Result<Vec<Player>> {
        let sql = format!(
            "SELECT {PLAYER_COLUMNS} FROM players
             WHERE (?1 IS NULL OR position = ?1) AND (?2 OR is_active = 1)
             ORDER BY total_points DESC, name ASC"
        );
        let mut stmt = self.prepare(&sql)?;
        let rows = stmt.query_map(
            params![position.map(|p| p.as_str()), include_inactive],
            row_to_player,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn save_player(&self, player: &Player) -> Result<()> {
        self.execute(
            "UPDATE players SET name = ?, position = ?, team_name = ?, price = ?, is_active = ?
             WHERE id = ?",
            params![
                player.name,
                player.position.as_str(),
                player.team_name,
                player.price,
                player.is_active,
                player.id.as_i64()
            ],
        )?;
        Ok(())
    }

    fn add_player_points(&self, id: PlayerId, delta: i64) -> Result<()> {
        self.execute(
            "UPDATE players SET total_points = total_points + ? WHERE id = ?",
            params![delta, id.as_i64()],
        )?;
        Ok(())
    }

    fn insert_gameweek(&self, gameweek: &NewGameweek) -> Result<Gameweek> {
        self.execute(
            "INSERT INTO gameweeks (number, name, deadline) VALUES (?, ?, ?)",
            params![gameweek.number, gameweek.name, gameweek.deadline],
        )?;
        Ok(Gameweek {
            id: GameweekId::new(self.last_insert_rowid()),
            number: gameweek.number,
            name: gameweek.name.clone(),
            deadline: gameweek.deadline,
            is_active: false,
            is_finished: false,
            is_voting_open: false,
        })
    }

    fn get_gameweek(&self, id: GameweekId) -> Result<Option<Gameweek>> {
        let sql = format!("SELECT {GAMEWEEK_COLUMNS} FROM gameweeks WHERE id = ?");
        Ok(self
            .query_row(&sql, [id.as_i64()], row_to_gameweek)
            .optional()?)
    }

    fn gameweek_by_number(&self, number: u32) -> Result<Option<Gameweek>> {
        let sql = format!("SELECT {GAMEWEEK_COLUMNS} FROM gameweeks WHERE number = ?");
        Ok(self.query_row(&sql, [number], row_to_gameweek).optional()?)
    }

    fn list_gameweeks(&self) -> Result<Vec<Gameweek>> {
        let sql = format!("SELECT {GAMEWEEK_COLUMNS} FROM gameweeks ORDER BY number ASC");
        let mut stmt = self.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_gameweek)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn active_gameweek(&self) -> Result<Option<Gameweek>> {
        let sql = format!(
            "SELECT {GAMEWEEK_COLUMNS} FROM gameweeks WHERE is_active = 1
             ORDER BY number DESC LIMIT 1"
        );
        Ok(self.query_row(&sql, [], row_to_gameweek).optional()?)
    }

    fn last_finished_gameweek(&self) -> Result<Option<Gameweek>> {
        let sql = format!(
            "SELECT {GAMEWEEK_COLUMNS} FROM gameweeks WHERE is_finished = 1
             ORDER BY number DESC LIMIT 1"
        );
        Ok(self.query_row(&sql, [], row_to_gameweek).optional()?)
    }

    fn save_gameweek(&self, gameweek: &Gameweek) -> Result<()> {
        self.execute(
            "UPDATE gameweeks
             SET name = ?, deadline = ?, is_active = ?, is_finished = ?, is_voting_open = ?
             WHERE id = ?",
            params![
                gameweek.name,
                gameweek.deadline,
                gameweek.is_active,
                gameweek.is_finished,
                gameweek.is_voting_open,
                gameweek.id.as_i64()
            ],
        )?;
        Ok(())
    }

    fn deactivate_all_gameweeks(&self) -> Result<usize> {
        Ok(self.execute(
            "UPDATE gameweeks SET is_active = 0 WHERE is_active = 1",
            [],
        )?)
    }

    fn get_match_stat(&self, gameweek: GameweekId, player: PlayerId) -> Result<Option<MatchStat>> {
        let sql = format!(
            "SELECT {MATCH_STAT_COLUMNS} FROM match_stats WHERE gameweek_id = ? AND player_id = ?"
        );
        Ok(self
            .query_row(
                &sql,
                [gameweek.as_i64(), player.as_i64()],
                row_to_match_stat,
            )
            .optional()?)
    }

    fn list_match_stats(&self, gameweek: GameweekId) -> Result<Vec<MatchStat>> {
        let sql = format!(
            "SELECT {MATCH_STAT_COLUMNS} FROM match_stats WHERE gameweek_id = ? ORDER BY id ASC"
        );
        let mut stmt = self.prepare(&sql)?;
        let rows = stmt.query_map([gameweek.as_i64()], row_to_match_stat)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn upsert_match_stat(&self, stat: &MatchStat) -> Result<()> {
        let line = &stat.line;
        self.execute(
            "INSERT INTO match_stats (gameweek_id, player_id, goals, assists, clean_sheet,
                 saves, defensive_errors, own_goals, minutes_played, penalties_scored,
                 penalties_saved, penalties_missed, nutmegs, matches_won, mvp_source, mvp_rank,
                 points, badges)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                 ?17, ?18)
             ON CONFLICT (gameweek_id, player_id) DO UPDATE SET
                 goals = excluded.goals,
                 assists = excluded.assists,
                 clean_sheet = excluded.clean_sheet,
                 saves = excluded.saves,
                 defensive_errors = excluded.defensive_errors,
                 own_goals = excluded.own_goals,
                 minutes_played = excluded.minutes_played,
                 penalties_scored = excluded.penalties_scored,
                 penalties_saved = excluded.penalties_saved,
                 penalties_missed = excluded.penalties_missed,
                 nutmegs = excluded.nutmegs,
                 matches_won = excluded.matches_won,
                 mvp_source = excluded.mvp_source,
                 mvp_rank = excluded.mvp_rank,
                 points = excluded.points,
                 badges = excluded.badges",
            params![
                stat.gameweek_id.as_i64(),
                stat.player_id.as_i64(),
                line.goals,
                line.assists,
                line.clean_sheet,
                line.saves,
                line.defensive_errors,
                line.own_goals,
                line.minutes_played,
                line.penalties_scored,
                line.penalties_saved,
                line.penalties_missed,
                line.nutmegs,
                line.matches_won,
                line.mvp.source(),
                line.mvp.rank_number(),
                stat.points,
                encode_badges(&stat.badges)
            ],
        )?;
        Ok(())
    }

    fn insert_vote(&self, vote: &MvpVote) -> Result<()> {
        self.execute(
            "INSERT INTO mvp_votes
                 (gameweek_id, voter_id, first_pick, second_pick, third_pick, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                vote.gameweek_id.as_i64(),
                vote.voter.as_i64(),
                vote.picks[0].as_i64(),
                vote.picks[1].as_i64(),
                vote.picks[2].as_i64(),
                vote.created_at
            ],
        )?;
        Ok(())
    }

    fn has_voted(&self, gameweek: GameweekId, voter: UserId) -> Result<bool> {
        Ok(self.query_row(
            "SELECT EXISTS(SELECT 1 FROM mvp_votes WHERE gameweek_id = ? AND voter_id = ?)",
            [gameweek.as_i64(), voter.as_i64()],
            |row| row.get(0),
        )?)
    }

    fn list_votes(&self, gameweek: GameweekId) -> Result<Vec<MvpVote>> {
        let mut stmt = self.prepare(
            "SELECT gameweek_id, voter_id, first_pick, second_pick, third_pick, created_at
             FROM mvp_votes WHERE gameweek_id = ? ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([gameweek.as_i64()], row_to_vote)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn insert_squad(
        &self,
        owner: UserId,
        name: &str,
        budget: f64,
        free_transfers: u32,
    ) -> Result<Squad> {
        self.execute(
            "INSERT INTO squads (owner_id, name, budget_remaining, free_transfers)
             VALUES (?, ?, ?, ?)",
            params![owner.as_i64(), name, budget, free_transfers],
        )?;
        Ok(Squad {
            id: SquadId::new(self.last_insert_rowid()),
            owner,
            name: name.to_string(),
            budget_remaining: budget,
            total_points: 0,
            free_transfers,
        })
    }

    fn get_squad(&self, id: SquadId) -> Result<Option<Squad>> {
        let sql = format!("SELECT {SQUAD_COLUMNS} FROM squads WHERE id = ?");
        Ok(self
            .query_row(&sql, [id.as_i64()], row_to_squad)
            .optional()?)
    }

    fn squad_for_owner(&self, owner: UserId) -> Result<Option<Squad>> {
        let sql = format!("SELECT {SQUAD_COLUMNS} FROM squads WHERE owner_id = ?");
        Ok(self
            .query_row(&sql, [owner.as_i64()], row_to_squad)
            .optional()?)
    }

    fn list_squads(&self) -> Result<Vec<Squad>> {
        let sql = format!("SELECT {SQUAD_COLUMNS} FROM squads ORDER BY id ASC");
        let mut stmt = self.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_squad)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn save_squad(&self, squad: &Squad) -> Result<()> {
        self.execute(
            "UPDATE squads SET name = ?, budget_remaining = ?, free_transfers = ? WHERE id = ?",
            params![
                squad.name,
                squad.budget_remaining,
                squad.free_transfers,
                squad.id.as_i64()
            ],
        )?;
        Ok(())
    }

    fn add_squad_points(&self, id: SquadId, delta: i64) -> Result<()> {
        self.execute(
            "UPDATE squads SET total_points = total_points + ? WHERE id = ?",
            params![delta, id.as_i64()],
        )?;
        Ok(())
    }

    fn get_squad_gameweek(
        &self,
        squad: SquadId,
        gameweek: GameweekId,
    ) -> Result<Option<SquadGameweek>> {
        let sql = format!(
            "SELECT {SQUAD_GAMEWEEK_COLUMNS} FROM squad_gameweeks sg
             WHERE sg.squad_id = ? AND sg.gameweek_id = ?"
        );
        Ok(self
            .query_row(
                &sql,
                [squad.as_i64(), gameweek.as_i64()],
                row_to_squad_gameweek,
            )
            .optional()?)
    }

    fn latest_squad_gameweek_before(
        &self,
        squad: SquadId,
        before: u32,
    ) -> Result<Option<SquadGameweek>> {
        let sql = format!(
            "SELECT {SQUAD_GAMEWEEK_COLUMNS} FROM squad_gameweeks sg
             JOIN gameweeks g ON g.id = sg.gameweek_id
             WHERE sg.squad_id = ? AND g.number < ?
             ORDER BY g.number DESC LIMIT 1"
        );
        Ok(self
            .query_row(&sql, params![squad.as_i64(), before], row_to_squad_gameweek)
            .optional()?)
    }

    fn list_squad_gameweeks(&self, gameweek: GameweekId) -> Result<Vec<SquadGameweek>> {
        let sql = format!(
            "SELECT {SQUAD_GAMEWEEK_COLUMNS} FROM squad_gameweeks sg
             WHERE sg.gameweek_id = ? ORDER BY sg.squad_id ASC"
        );
        let mut stmt = self.prepare(&sql)?;
        let rows = stmt.query_map([gameweek.as_i64()], row_to_squad_gameweek)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn squad_history(&self, squad: SquadId) -> Result<Vec<SquadGameweek>> {
        let sql = format!(
            "SELECT {SQUAD_GAMEWEEK_COLUMNS} FROM squad_gameweeks sg
             JOIN gameweeks g ON g.id = sg.gameweek_id
             WHERE sg.squad_id = ? ORDER BY g.number ASC"
        );
        let mut stmt = self.prepare(&sql)?;
        let rows = stmt.query_map([squad.as_i64()], row_to_squad_gameweek)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn upsert_squad_gameweek(&self, row: &SquadGameweek) -> Result<()> {
        self.execute(
            "INSERT INTO squad_gameweeks (squad_id, gameweek_id, slot_1, slot_2, slot_3, slot_4,
                 slot_5, captain_id, transfers_made, transfer_penalty, gameweek_points)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT (squad_id, gameweek_id) DO UPDATE SET
                 slot_1 = excluded.slot_1,
                 slot_2 = excluded.slot_2,
                 slot_3 = excluded.slot_3,
                 slot_4 = excluded.slot_4,
                 slot_5 = excluded.slot_5,
                 captain_id = excluded.captain_id,
                 transfers_made = excluded.transfers_made,
                 transfer_penalty = excluded.transfer_penalty,
                 gameweek_points = excluded.gameweek_points",
            params![
                row.squad_id.as_i64(),
                row.gameweek_id.as_i64(),
                row.slots[0].as_i64(),
                row.slots[1].as_i64(),
                row.slots[2].as_i64(),
                row.slots[3].as_i64(),
                row.slots[4].as_i64(),
                row.captain.as_i64(),
                row.transfers_made,
                row.transfer_penalty,
                row.gameweek_points
            ],
        )?;
        Ok(())
    }

    fn insert_league(
        &self,
        name: &str,
        join_code: &str,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> Result<MiniLeague> {
        self.execute(
            "INSERT INTO mini_leagues (name, join_code, created_by, created_at)
             VALUES (?, ?, ?, ?)",
            params![name, join_code, created_by.as_i64(), now],
        )?;
        Ok(MiniLeague {
            id: MiniLeagueId::new(self.last_insert_rowid()),
            name: name.to_string(),
            join_code: join_code.to_string(),
            created_by,
            created_at: now,
        })
    }

    fn get_league(&self, id: MiniLeagueId) -> Result<Option<MiniLeague>> {
        let sql = format!("SELECT {LEAGUE_COLUMNS} FROM mini_leagues WHERE id = ?");
        Ok(self
            .query_row(&sql, [id.as_i64()], row_to_league)
            .optional()?)
    }

    fn league_by_code(&self, join_code: &str) -> Result<Option<MiniLeague>> {
        let sql = format!("SELECT {LEAGUE_COLUMNS} FROM mini_leagues WHERE join_code = ?");
        Ok(self
            .query_row(&sql, [join_code], row_to_league)
            .optional()?)
    }

    fn add_member(&self, league: MiniLeagueId, user: UserId, now: DateTime<Utc>) -> Result<()> {
        self.execute(
            "INSERT INTO mini_league_members (league_id, user_id, joined_at) VALUES (?, ?, ?)",
            params![league.as_i64(), user.as_i64(), now],
        )?;
        Ok(())
    }

    fn is_member(&self, league: MiniLeagueId, user: UserId) -> Result<bool> {
        Ok(self.query_row(
            "SELECT EXISTS(SELECT 1 FROM mini_league_members WHERE league_id = ? AND user_id = ?)",
            [league.as_i64(), user.as_i64()],
            |row| row.get(0),
        )?)
    }

    fn league_members(&self, league: MiniLeagueId) -> Result<Vec<UserId>> {
        let mut stmt = self.prepare(
            "SELECT user_id FROM mini_league_members WHERE league_id = ? ORDER BY joined_at ASC",
        )?;
        let rows = stmt.query_map([league.as_i64()], |row| Ok(UserId::new(row.get(0)?)))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn leagues_for_user(&self, user: UserId) -> Result<Vec<MiniLeague>> {
        let mut stmt = self.prepare(
            "SELECT l.id, l.name, l.join_code, l.created_by, l.created_at
             FROM mini_leagues l
             JOIN mini_league_members m ON m.league_id = l.id
             WHERE m.user_id = ? ORDER BY l.name ASC",
        )?;
        let rows = stmt.query_map([user.as_i64()], row_to_league)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn load_settings(&self) -> Result<SystemSettings> {
        let stored = self
            .query_row(
                "SELECT allow_transfers, show_dashboard_stats FROM system_settings WHERE id = 1",
                [],
                |row| {
                    Ok(SystemSettings {
                        allow_transfers: row.get(0)?,
                        show_dashboard_stats: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(stored.unwrap_or_default())
    }

    fn save_settings(&self, settings: &SystemSettings) -> Result<()> {
        self.execute(
            "INSERT INTO system_settings (id, allow_transfers, show_dashboard_stats)
             VALUES (1, ?1, ?2)
             ON CONFLICT (id) DO UPDATE SET
                 allow_transfers = excluded.allow_transfers,
                 show_dashboard_stats = excluded.show_dashboard_stats",
            params![settings.allow_transfers, settings.show_dashboard_stats],
        )?;
        Ok(())
    }
}
