//! Squad selection, transfers, rollover and voting

mod common;

use chrono::{Duration, Utc};
use common::{now, two_point_game, League};
use fantasy_fives::commands::{gameweeks, squads, votes, Actor};
use fantasy_fives::error::{FantasyError, SelectionError, VoteError};
use fantasy_fives::storage::{LeagueStore, SystemSettings};
use fantasy_fives::{Position, UserId};

fn selection_error(err: FantasyError) -> SelectionError {
    match err {
        FantasyError::Selection(reason) => reason,
        other => panic!("expected a selection error, got {other:?}"),
    }
}

#[test]
fn test_first_selection_is_free() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw = league.gameweek(1);
    let manager = league.manager(10);

    let summary = league
        .select(&manager, gw, lineup.ids(), lineup.att)
        .unwrap();
    assert_eq!(summary.transfers_made, 0);
    assert_eq!(summary.transfer_penalty, 0);
    assert_eq!(summary.free_transfers_left, 1);
    assert_eq!(summary.total_cost, 40.0);
    assert_eq!(summary.budget_remaining, 10.0);
}

#[test]
fn test_two_goalkeepers_rejected() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let spare_gk = league.player("Spare Keeper", Position::GK, 5.0);
    let gw = league.gameweek(1);
    let manager = league.manager(10);

    let err = league
        .select(
            &manager,
            gw,
            [lineup.gk, spare_gk, lineup.mid, lineup.mid2, lineup.att],
            lineup.gk,
        )
        .unwrap_err();
    assert_eq!(selection_error(err), SelectionError::GoalkeeperCount { count: 2 });
}

#[test]
fn test_four_defenders_rejected() {
    let mut league = League::new();
    let gk = league.player("Keeper", Position::GK, 5.0);
    let defs: Vec<_> = (0..4)
        .map(|i| league.player(&format!("Defender {i}"), Position::DEF, 5.0))
        .collect();
    let gw = league.gameweek(1);
    let manager = league.manager(10);

    let err = league
        .select(&manager, gw, [gk, defs[0], defs[1], defs[2], defs[3]], gk)
        .unwrap_err();
    assert!(matches!(
        selection_error(err),
        SelectionError::OutfieldCount { count: 4, .. }
    ));
}

#[test]
fn test_over_budget_rejected() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let star = league.player("Galactico", Position::ATT, 18.5);
    let gw = league.gameweek(1);
    let manager = league.manager(10);

    let err = league
        .select(
            &manager,
            gw,
            [lineup.gk, lineup.def, lineup.mid, lineup.mid2, star],
            star,
        )
        .unwrap_err();
    assert!(matches!(
        selection_error(err),
        SelectionError::OverBudget { .. }
    ));
}

#[test]
fn test_after_deadline_rejected() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw = league.gameweek_with_deadline(1, now() - Duration::minutes(1));
    let manager = league.manager(10);

    let err = league
        .select(&manager, gw, lineup.ids(), lineup.gk)
        .unwrap_err();
    assert_eq!(
        selection_error(err),
        SelectionError::DeadlinePassed { number: 1 }
    );
}

#[test]
fn test_locked_transfers_rejected() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw = league.gameweek(1);
    let manager = league.manager(10);
    league.settings = SystemSettings {
        allow_transfers: false,
        ..SystemSettings::default()
    };

    let err = league
        .select(&manager, gw, lineup.ids(), lineup.gk)
        .unwrap_err();
    assert_eq!(selection_error(err), SelectionError::TransfersLocked);
}

#[test]
fn test_finished_gameweek_rejected() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw = league.gameweek(1);
    league.stat(gw, lineup.gk, two_point_game());
    league.settle(gw).unwrap();
    let manager = league.manager(10);

    let err = league
        .select(&manager, gw, lineup.ids(), lineup.gk)
        .unwrap_err();
    assert_eq!(
        selection_error(err),
        SelectionError::GameweekClosed { number: 1 }
    );
}

#[test]
fn test_inactive_and_unknown_players_rejected() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw = league.gameweek(1);
    let manager = league.manager(10);

    fantasy_fives::commands::players::deactivate_player(&mut league.db, &league.admin, lineup.def)
        .unwrap();
    let err = league
        .select(&manager, gw, lineup.ids(), lineup.gk)
        .unwrap_err();
    assert!(matches!(
        selection_error(err),
        SelectionError::PlayerUnavailable { .. }
    ));

    let mut ids = lineup.ids();
    ids[1] = fantasy_fives::PlayerId::new(999);
    let err = league.select(&manager, gw, ids, lineup.gk).unwrap_err();
    assert!(matches!(err, FantasyError::NotFound { entity: "player", .. }));
}

#[test]
fn test_rejected_selection_writes_nothing() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let spare_gk = league.player("Spare Keeper", Position::GK, 5.0);
    let gw = league.gameweek(1);
    let manager = league.manager(10);

    assert!(league
        .select(
            &manager,
            gw,
            [lineup.gk, spare_gk, lineup.mid, lineup.mid2, lineup.att],
            lineup.gk,
        )
        .is_err());

    let squad = league
        .db
        .conn()
        .squad_for_owner(manager.user_id)
        .unwrap()
        .unwrap();
    assert!(league
        .db
        .conn()
        .get_squad_gameweek(squad.id, gw)
        .unwrap()
        .is_none());
    assert_eq!(squad.budget_remaining, 50.0);
}

#[test]
fn test_rollover_then_three_transfers_costs_eight() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let bench = league.lineup("Away");
    let gw1 = league.gameweek(1);
    let gw2 = league.gameweek(2);
    let manager = league.manager(10);

    league
        .select(&manager, gw1, lineup.ids(), lineup.att)
        .unwrap();
    let activation = gameweeks::activate_gameweek(&mut league.db, &league.admin, gw2).unwrap();
    assert_eq!(activation.rolled_over, 1);

    let squad = league
        .db
        .conn()
        .squad_for_owner(manager.user_id)
        .unwrap()
        .unwrap();
    let rolled = league
        .db
        .conn()
        .get_squad_gameweek(squad.id, gw2)
        .unwrap()
        .unwrap();
    assert_eq!(rolled.slots, lineup.ids());
    assert_eq!(rolled.captain, lineup.att);
    assert_eq!(rolled.transfers_made, 0);
    assert_eq!(rolled.transfer_penalty, 0);

    let summary = league
        .select(
            &manager,
            gw2,
            [bench.gk, bench.def, bench.mid, lineup.mid2, lineup.att],
            lineup.att,
        )
        .unwrap();
    assert_eq!(summary.transfers_made, 3);
    assert_eq!(summary.transfer_penalty, 8);
    assert_eq!(summary.free_transfers_left, 0);

    for id in [bench.gk, bench.def, bench.mid, lineup.mid2, lineup.att] {
        league.stat(gw2, id, two_point_game());
    }
    league.settle(gw2).unwrap();
    assert_eq!(league.squad_total(&manager), 12 - 8);
}

#[test]
fn test_resubmitting_cannot_erase_a_penalty() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let bench = league.lineup("Away");
    let gw1 = league.gameweek(1);
    let gw2 = league.gameweek(2);
    let manager = league.manager(10);

    league
        .select(&manager, gw1, lineup.ids(), lineup.att)
        .unwrap();
    gameweeks::activate_gameweek(&mut league.db, &league.admin, gw2).unwrap();

    let changed = [bench.gk, bench.def, lineup.mid, lineup.mid2, lineup.att];
    let first = league.select(&manager, gw2, changed, lineup.att).unwrap();
    assert_eq!(first.transfer_penalty, 4);

    let again = league.select(&manager, gw2, changed, lineup.att).unwrap();
    assert_eq!(again.transfers_made, 0);
    assert_eq!(again.gameweek_transfers, 2);
    assert_eq!(again.gameweek_penalty, 4);
}

#[test]
fn test_rollover_skips_squads_without_history() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw1 = league.gameweek(1);
    let gw2 = league.gameweek(2);
    let veteran = league.manager(10);
    let newcomer = league.manager(11);

    league
        .select(&veteran, gw1, lineup.ids(), lineup.gk)
        .unwrap();
    let activation = gameweeks::activate_gameweek(&mut league.db, &league.admin, gw2).unwrap();
    assert_eq!(activation.rolled_over, 1);

    let squad = league
        .db
        .conn()
        .squad_for_owner(newcomer.user_id)
        .unwrap()
        .unwrap();
    assert!(league.db.conn().squad_history(squad.id).unwrap().is_empty());
}

#[test]
fn test_activation_is_exclusive_and_final() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw1 = league.gameweek(1);
    let gw2 = league.gameweek(2);

    gameweeks::activate_gameweek(&mut league.db, &league.admin, gw1).unwrap();
    gameweeks::activate_gameweek(&mut league.db, &league.admin, gw2).unwrap();
    let active = gameweeks::active_gameweek(&league.db).unwrap().unwrap();
    assert_eq!(active.id, gw2);
    assert!(!league.db.conn().get_gameweek(gw1).unwrap().unwrap().is_active);

    league.stat(gw1, lineup.gk, two_point_game());
    league.settle(gw1).unwrap();
    let err = gameweeks::activate_gameweek(&mut league.db, &league.admin, gw1).unwrap_err();
    assert!(matches!(err, FantasyError::GameweekFinished { number: 1 }));
    assert_eq!(gameweeks::active_gameweek(&league.db).unwrap().unwrap().id, gw2);
}

#[test]
fn test_duplicate_squad_and_gameweek_rejected() {
    let mut league = League::new();
    league.gameweek(1);
    let manager = league.manager(10);

    let err = squads::create_squad(&mut league.db, &manager, &league.config, "Again").unwrap_err();
    assert!(matches!(err, FantasyError::DuplicateSquad { .. }));

    let err = gameweeks::create_gameweek(
        &mut league.db,
        &league.admin,
        &fantasy_fives::storage::NewGameweek {
            number: 1,
            name: "Copy".to_string(),
            deadline: Utc::now(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, FantasyError::DuplicateGameweek { number: 1 }));
}

#[test]
fn test_squad_history_in_gameweek_order() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw1 = league.gameweek(1);
    let gw2 = league.gameweek(2);
    let manager = league.manager(10);

    league
        .select(&manager, gw1, lineup.ids(), lineup.gk)
        .unwrap();
    gameweeks::activate_gameweek(&mut league.db, &league.admin, gw2).unwrap();

    let history = squads::squad_history(&league.db, &manager).unwrap();
    let order: Vec<_> = history.iter().map(|row| row.gameweek_id).collect();
    assert_eq!(order, vec![gw1, gw2]);
}

#[test]
fn test_voting_rules() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw = league.gameweek(1);
    let voter = Actor::user(UserId::new(40));
    let picks = [lineup.att, lineup.mid, lineup.gk];

    let err = votes::submit_vote(&mut league.db, &voter, gw, picks, now()).unwrap_err();
    assert!(matches!(
        err,
        FantasyError::Vote(VoteError::VotingClosed { number: 1 })
    ));

    gameweeks::set_voting(&mut league.db, &league.admin, gw, true).unwrap();
    let err = votes::submit_vote(
        &mut league.db,
        &voter,
        gw,
        [lineup.att, lineup.att, lineup.gk],
        now(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        FantasyError::Vote(VoteError::DuplicateCandidate)
    ));

    assert!(!votes::has_voted(&league.db, &voter, gw).unwrap());
    votes::submit_vote(&mut league.db, &voter, gw, picks, now()).unwrap();
    assert!(votes::has_voted(&league.db, &voter, gw).unwrap());

    let err = votes::submit_vote(&mut league.db, &voter, gw, picks, now()).unwrap_err();
    assert!(matches!(
        err,
        FantasyError::Vote(VoteError::AlreadyVoted { number: 1 })
    ));
}

#[test]
fn test_voting_cannot_reopen_after_settlement() {
    let mut league = League::new();
    let lineup = league.lineup("Home");
    let gw = league.gameweek(1);
    league.stat(gw, lineup.gk, two_point_game());
    league.settle(gw).unwrap();

    let err = gameweeks::set_voting(&mut league.db, &league.admin, gw, true).unwrap_err();
    assert!(matches!(err, FantasyError::GameweekFinished { .. }));
}
