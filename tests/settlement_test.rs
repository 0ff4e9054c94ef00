//! Settlement workflow against an in-memory league

mod common;

use common::{now, two_point_game, League};
use fantasy_fives::commands::{gameweeks, votes};
use fantasy_fives::error::FantasyError;
use fantasy_fives::scoring::{Badge, MvpAward, MvpRank, MvpStrategy};
use fantasy_fives::storage::{LeagueStore, MatchStatUpdate, SquadGameweek};
use fantasy_fives::{Config, PlayerId, Position, UserId};

#[test]
fn test_captain_counts_twice() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw = league.gameweek(1);
    let manager = league.manager(10);
    league
        .select(&manager, gw, lineup.ids(), lineup.mid)
        .unwrap();

    for id in lineup.ids() {
        league.stat(gw, id, two_point_game());
    }
    let summary = league.settle(gw).unwrap();

    assert_eq!(summary.stats_settled, 5);
    assert_eq!(summary.squads_settled, 1);
    assert_eq!(league.squad_total(&manager), 12);
    let row = league
        .db
        .conn()
        .get_squad_gameweek(
            league.db.conn().squad_for_owner(manager.user_id).unwrap().unwrap().id,
            gw,
        )
        .unwrap()
        .unwrap();
    assert_eq!(row.gameweek_points, 12);
}

#[test]
fn test_settling_twice_changes_nothing() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw = league.gameweek(1);
    let manager = league.manager(10);
    league
        .select(&manager, gw, lineup.ids(), lineup.att)
        .unwrap();

    league.stat(
        gw,
        lineup.att,
        MatchStatUpdate {
            minutes_played: Some(40),
            goals: Some(3),
            nutmegs: Some(2),
            ..MatchStatUpdate::default()
        },
    );
    league.stat(gw, lineup.gk, two_point_game());

    gameweeks::set_voting(&mut league.db, &league.admin, gw, true).unwrap();
    for voter in [20, 21] {
        votes::submit_vote(
            &mut league.db,
            &fantasy_fives::commands::Actor::user(UserId::new(voter)),
            gw,
            [lineup.att, lineup.gk, lineup.def],
            now(),
        )
        .unwrap();
    }

    let first = league.settle(gw).unwrap();
    let player_totals: Vec<i64> = lineup.ids().map(|id| league.player_total(id)).to_vec();
    let squad_total = league.squad_total(&manager);

    let second = league.settle(gw).unwrap();
    assert_eq!(second.player_points_delta, 0);
    assert_eq!(second.squad_points_delta, 0);
    assert_eq!(first.mvp_awards, second.mvp_awards);
    assert_eq!(
        lineup.ids().map(|id| league.player_total(id)).to_vec(),
        player_totals
    );
    assert_eq!(league.squad_total(&manager), squad_total);

    // ATT: 1 + 3x4 + 2x2 nutmegs + MVP 1st 3 = 20, doubled as captain.
    // GK: 2 + MVP 2nd 2. DEF has no stat line so cannot be placed.
    assert_eq!(league.player_total(lineup.att), 20);
    assert_eq!(league.player_total(lineup.gk), 4);
    assert_eq!(squad_total, 20 * 2 + 4);
}

#[test]
fn test_player_total_matches_sum_of_stats() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw1 = league.gameweek(1);
    let gw2 = league.gameweek(2);

    league.stat(gw1, lineup.def, two_point_game());
    league.settle(gw1).unwrap();
    league.stat(
        gw2,
        lineup.def,
        MatchStatUpdate {
            minutes_played: Some(40),
            clean_sheet: Some(2),
            ..MatchStatUpdate::default()
        },
    );
    league.settle(gw2).unwrap();

    let expected = league.stat_points(gw1, lineup.def) + league.stat_points(gw2, lineup.def);
    assert_eq!(league.player_total(lineup.def), i64::from(expected));
    assert_eq!(expected, 2 + 7);
}

#[test]
fn test_vote_tie_keeps_first_seen_order() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw = league.gameweek(1);
    for id in lineup.ids() {
        league.stat(gw, id, two_point_game());
    }

    gameweeks::set_voting(&mut league.db, &league.admin, gw, true).unwrap();
    let ballots = [
        (30, [lineup.mid, lineup.att, lineup.gk]),
        (31, [lineup.att, lineup.mid, lineup.gk]),
    ];
    for (voter, picks) in ballots {
        votes::submit_vote(
            &mut league.db,
            &fantasy_fives::commands::Actor::user(UserId::new(voter)),
            gw,
            picks,
            now(),
        )
        .unwrap();
    }

    let summary = league.settle(gw).unwrap();
    assert_eq!(summary.votes_counted, 2);
    assert_eq!(
        summary.mvp_awards,
        vec![
            (lineup.mid, MvpAward::Voted(MvpRank::FIRST)),
            (lineup.att, MvpAward::Voted(MvpRank::SECOND)),
            (lineup.gk, MvpAward::Voted(MvpRank::THIRD)),
        ]
    );

    let mid = league.db.conn().get_match_stat(gw, lineup.mid).unwrap().unwrap();
    assert_eq!(mid.mvp_rank(), 1);
    assert!(mid.badges.contains(&Badge::Goat));
    assert_eq!(mid.points, 2 + 3);
    assert_eq!(league.stat_points(gw, lineup.def), 2);

    let gameweek = league.db.conn().get_gameweek(gw).unwrap().unwrap();
    assert!(gameweek.is_finished);
    assert!(!gameweek.is_active);
    assert!(!gameweek.is_voting_open);
}

#[test]
fn test_rating_strategy_shares_ranks() {
    let config = Config {
        mvp_strategy: MvpStrategy::Rating,
        ..Config::default()
    };
    let mut league = League::with_config(config);
    let star = league.player("Star", Position::ATT, 9.0);
    let twin_a = league.player("Twin A", Position::MID, 7.0);
    let twin_b = league.player("Twin B", Position::MID, 7.0);
    let steady = league.player("Steady", Position::DEF, 6.0);
    let bench = league.player("Bench", Position::DEF, 4.0);
    let gw = league.gameweek(1);

    let goals = |n: u32| MatchStatUpdate {
        minutes_played: Some(40),
        goals: Some(n),
        ..MatchStatUpdate::default()
    };
    league.stat(gw, star, goals(2));
    league.stat(gw, twin_a, goals(1));
    league.stat(gw, twin_b, goals(1));
    league.stat(gw, steady, goals(0));
    league.stat(gw, bench, MatchStatUpdate::default());

    let summary = league.settle(gw).unwrap();
    let rank_of = |id: PlayerId| {
        summary
            .mvp_awards
            .iter()
            .find(|(player, _)| *player == id)
            .map(|(_, award)| *award)
            .unwrap_or_default()
    };
    assert_eq!(rank_of(star), MvpAward::Rated(MvpRank::FIRST));
    assert_eq!(rank_of(twin_a), MvpAward::Rated(MvpRank::SECOND));
    assert_eq!(rank_of(twin_b), MvpAward::Rated(MvpRank::SECOND));
    assert_eq!(rank_of(steady), MvpAward::Rated(MvpRank::THIRD));
    assert_eq!(rank_of(bench), MvpAward::None);
}

#[test]
fn test_empty_gameweek_is_refused() {
    let mut league = League::new();
    let gw = league.gameweek(1);
    let err = league.settle(gw).unwrap_err();
    assert!(matches!(err, FantasyError::NothingToSettle { number: 1 }));

    let gameweek = league.db.conn().get_gameweek(gw).unwrap().unwrap();
    assert!(!gameweek.is_finished);
}

#[test]
fn test_settlement_requires_admin() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw = league.gameweek(1);
    league.stat(gw, lineup.gk, two_point_game());

    let user = fantasy_fives::commands::Actor::user(UserId::new(99));
    let err = fantasy_fives::commands::settlement::settle_gameweek(
        &mut league.db,
        &user,
        &league.config,
        gw,
    )
    .unwrap_err();
    assert!(matches!(err, FantasyError::Forbidden { .. }));
}

#[test]
fn test_failed_settlement_rolls_back_everything() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw = league.gameweek(1);
    let manager = league.manager(10);
    league
        .select(&manager, gw, lineup.ids(), lineup.gk)
        .unwrap();
    gameweeks::activate_gameweek(&mut league.db, &league.admin, gw).unwrap();
    for id in lineup.ids() {
        league.stat(gw, id, two_point_game());
    }
    gameweeks::set_voting(&mut league.db, &league.admin, gw, true).unwrap();
    votes::submit_vote(
        &mut league.db,
        &manager,
        gw,
        [lineup.att, lineup.def, lineup.mid],
        now(),
    )
    .unwrap();

    let before: Vec<i64> = lineup.ids().map(|id| league.player_total(id)).to_vec();
    league
        .db
        .conn()
        .execute_batch(
            "CREATE TRIGGER fail_squad_settlement
             BEFORE UPDATE OF gameweek_points ON squad_gameweeks
             BEGIN SELECT RAISE(ABORT, 'simulated failure'); END;",
        )
        .unwrap();

    let err = league.settle(gw).unwrap_err();
    assert!(matches!(err, FantasyError::Database(_)));

    assert_eq!(
        lineup.ids().map(|id| league.player_total(id)).to_vec(),
        before
    );
    assert_eq!(league.squad_total(&manager), 0);
    let att = league.db.conn().get_match_stat(gw, lineup.att).unwrap().unwrap();
    assert_eq!(att.line.mvp, MvpAward::None);
    assert_eq!(att.points, 2);

    let gameweek = league.db.conn().get_gameweek(gw).unwrap().unwrap();
    assert!(gameweek.is_active);
    assert!(!gameweek.is_finished);
    assert!(gameweek.is_voting_open);

    // Retry succeeds once the fault is gone
    league
        .db
        .conn()
        .execute_batch("DROP TRIGGER fail_squad_settlement;")
        .unwrap();
    league.settle(gw).unwrap();
    assert_eq!(league.player_total(lineup.att), 5);
    // att 5, def 4, mid 3, mid2 2, gk 2 counted twice
    assert_eq!(league.squad_total(&manager), 5 + 4 + 3 + 2 + 2 + 2);
}

#[test]
fn test_captain_outside_squad_rolls_back() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let other = league.player("Outsider", Position::ATT, 5.0);
    let gw = league.gameweek(1);
    let manager = league.manager(10);
    let squad = league
        .db
        .conn()
        .squad_for_owner(manager.user_id)
        .unwrap()
        .unwrap();
    league
        .db
        .conn()
        .upsert_squad_gameweek(&SquadGameweek {
            squad_id: squad.id,
            gameweek_id: gw,
            slots: lineup.ids(),
            captain: other,
            transfers_made: 0,
            transfer_penalty: 0,
            gameweek_points: 0,
        })
        .unwrap();
    league.stat(gw, lineup.gk, two_point_game());
    league.stat(
        gw,
        lineup.att,
        MatchStatUpdate {
            minutes_played: Some(40),
            goals: Some(1),
            ..MatchStatUpdate::default()
        },
    );

    let err = league.settle(gw).unwrap_err();
    assert!(matches!(err, FantasyError::CaptainNotInSquad { .. }));
    assert!(err.is_validation());
    assert!(!league.db.conn().get_gameweek(gw).unwrap().unwrap().is_finished);
}

#[test]
fn test_stat_edit_after_settlement_waits_for_resettle() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw = league.gameweek(1);
    let manager = league.manager(10);
    league
        .select(&manager, gw, lineup.ids(), lineup.att)
        .unwrap();
    league.stat(gw, lineup.att, two_point_game());
    league.settle(gw).unwrap();
    assert_eq!(league.player_total(lineup.att), 2);
    assert_eq!(league.squad_total(&manager), 4);

    let submission = league.stat(
        gw,
        lineup.att,
        MatchStatUpdate {
            goals: Some(2),
            ..MatchStatUpdate::default()
        },
    );
    assert!(!submission.applied);
    assert_eq!(submission.breakdown.total(), 10);
    assert_eq!(submission.stat.points, 2);
    assert_eq!(league.player_total(lineup.att), 2);

    let summary = league.settle(gw).unwrap();
    assert_eq!(summary.player_points_delta, 8);
    assert_eq!(league.player_total(lineup.att), 10);
    assert_eq!(league.squad_total(&manager), 20);
}

#[test]
fn test_stat_entry_on_open_gameweek_applies_delta() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw = league.gameweek(1);

    let first = league.stat(
        gw,
        lineup.def,
        MatchStatUpdate {
            minutes_played: Some(40),
            goals: Some(1),
            ..MatchStatUpdate::default()
        },
    );
    assert!(first.applied);
    assert_eq!(first.stat.points, 6);
    assert_eq!(league.player_total(lineup.def), 6);

    let second = league.stat(
        gw,
        lineup.def,
        MatchStatUpdate {
            own_goals: Some(1),
            ..MatchStatUpdate::default()
        },
    );
    assert_eq!(second.stat.line.goals, 1);
    assert_eq!(second.stat.points, 4);
    assert!(second.stat.badges.contains(&Badge::DoubleAgent));
    assert_eq!(league.player_total(lineup.def), 4);
}

#[test]
fn test_floor_applies_through_settlement() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw = league.gameweek(1);
    league.stat(
        gw,
        lineup.mid,
        MatchStatUpdate {
            defensive_errors: Some(5),
            own_goals: Some(2),
            ..MatchStatUpdate::default()
        },
    );
    league.settle(gw).unwrap();
    assert_eq!(league.stat_points(gw, lineup.mid), -10);
    assert_eq!(league.player_total(lineup.mid), -10);
}

#[test]
fn test_first_entry_defaults_to_a_full_match() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw = league.gameweek(1);

    let entry = league.stat(
        gw,
        lineup.mid,
        MatchStatUpdate {
            assists: Some(1),
            ..MatchStatUpdate::default()
        },
    );
    assert_eq!(entry.stat.line.minutes_played, 120);
    assert!(entry.breakdown.get("Appearance").is_some());

    let benched = league.stat(
        gw,
        lineup.def,
        MatchStatUpdate {
            minutes_played: Some(0),
            ..MatchStatUpdate::default()
        },
    );
    assert_eq!(benched.stat.line.minutes_played, 0);
    assert_eq!(benched.stat.points, 0);
}

#[test]
fn test_absurd_stat_counts_saturate_totals() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw = league.gameweek(1);

    let entry = league.stat(
        gw,
        lineup.att,
        MatchStatUpdate {
            goals: Some(u32::MAX),
            ..two_point_game()
        },
    );
    assert_eq!(entry.stat.points, i32::MAX);
    league.settle(gw).unwrap();
    assert_eq!(league.player_total(lineup.att), i64::from(i32::MAX));
}
