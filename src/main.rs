//! Entry point: parse CLI and dispatch to command handlers.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use tracing::debug;

use fantasy_fives::{
    cli::{
        Commands, FantasyFives, GameweekCmd, LeagueCmd, PlayerCmd, SettingsCmd, SquadCmd, StatCmd,
        VoteCmd,
    },
    commands::{
        gameweeks, match_stats, players, settings::{self, SettingsUpdate}, settlement, squads,
        standings, votes, Actor, CommandContext,
    },
    config::load_config,
    scoring::PointsBreakdown,
    storage::{Gameweek, MatchStat, NewGameweek, NewPlayer, Player, PlayerUpdate},
};

/// Run the CLI.
fn main() -> anyhow::Result<()> {
    let app = FantasyFives::parse();
    init_tracing(app.json)?;

    let config = load_config(app.config.as_deref()).context("failed to load configuration")?;
    let actor = Actor {
        user_id: app.as_user,
        is_admin: app.admin,
    };
    let mut ctx = CommandContext::open(config, actor).context("failed to open league database")?;
    debug!("Running as user {} (admin: {})", actor.user_id, actor.is_admin);

    run(&mut ctx, app.command, app.json)
}

/// Log to stderr so stdout stays clean for results.
fn init_tracing(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fantasy_fives=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(!json)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text(value));
    }
    Ok(())
}

fn player_line(player: &Player) -> String {
    format!(
        "{:>4}  {:<24} {:<3}  {:<16} {:>5.1}M  {:>4} pts{}",
        player.id,
        player.name,
        player.position,
        player.team_name,
        player.price,
        player.total_points,
        if player.is_active { "" } else { "  (inactive)" }
    )
}

fn gameweek_line(gameweek: &Gameweek) -> String {
    let mut flags = Vec::new();
    if gameweek.is_active {
        flags.push("active");
    }
    if gameweek.is_finished {
        flags.push("finished");
    }
    if gameweek.is_voting_open {
        flags.push("voting");
    }
    format!(
        "{:>4}  GW{:<3} {:<20} deadline {}  {}",
        gameweek.id,
        gameweek.number,
        gameweek.name,
        gameweek.deadline.format("%Y-%m-%d %H:%M UTC"),
        flags.join(", ")
    )
}

fn stat_line(stat: &MatchStat) -> String {
    let badges: Vec<&str> = stat.badges.iter().map(|b| b.slug()).collect();
    format!(
        "player {:>4}: {:>3} pts  G{} A{} CS{} S{} min {}  mvp {}  {}",
        stat.player_id,
        stat.points,
        stat.line.goals,
        stat.line.assists,
        stat.line.clean_sheet,
        stat.line.saves,
        stat.line.minutes_played,
        stat.mvp_rank(),
        badges.join(",")
    )
}

fn breakdown_text(breakdown: &PointsBreakdown) -> String {
    breakdown
        .lines
        .iter()
        .map(|line| format!("{:<28} {:>4}", line.label, line.points))
        .collect::<Vec<_>>()
        .join("\n")
}

fn leaderboard_text(entries: &[standings::LeaderboardEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{:>3}. {:<24} user {:<6} {:>5} pts", e.rank, e.squad_name, e.owner, e.total_points))
        .collect::<Vec<_>>()
        .join("\n")
}

fn run(ctx: &mut CommandContext, command: Commands, json: bool) -> anyhow::Result<()> {
    let now = Utc::now();
    let actor = ctx.actor;
    let CommandContext {
        config,
        db,
        settings: current_settings,
        ..
    } = ctx;

    match command {
        Commands::Player { cmd } => match cmd {
            PlayerCmd::Add {
                name,
                position,
                team,
                price,
            } => {
                let player = players::create_player(
                    db,
                    &actor,
                    &NewPlayer {
                        name,
                        position,
                        team_name: team,
                        price,
                    },
                )?;
                emit(json, &player, player_line)?
            }
            PlayerCmd::Update {
                id,
                name,
                position,
                team,
                price,
                active,
            } => {
                let update = PlayerUpdate {
                    name,
                    position,
                    team_name: team,
                    price,
                    is_active: active,
                };
                let player = players::update_player(db, &actor, id, &update)?;
                emit(json, &player, player_line)?
            }
            PlayerCmd::Deactivate { id } => {
                let player = players::deactivate_player(db, &actor, id)?;
                emit(json, &player, player_line)?
            }
            PlayerCmd::List { position, all } => {
                let list = players::list_players(db, position, all)?;
                emit(json, &list, |list| {
                    list.iter().map(player_line).collect::<Vec<_>>().join("\n")
                })?
            }
        },

        Commands::Gameweek { cmd } => match cmd {
            GameweekCmd::Create {
                number,
                name,
                deadline,
            } => {
                let gameweek = gameweeks::create_gameweek(
                    db,
                    &actor,
                    &NewGameweek {
                        number,
                        name,
                        deadline,
                    },
                )?;
                emit(json, &gameweek, gameweek_line)?
            }
            GameweekCmd::List => {
                let list = gameweeks::list_gameweeks(db)?;
                emit(json, &list, |list| {
                    list.iter().map(gameweek_line).collect::<Vec<_>>().join("\n")
                })?
            }
            GameweekCmd::Active => {
                let active = gameweeks::active_gameweek(db)?;
                emit(json, &active, |active| match active {
                    Some(gameweek) => gameweek_line(gameweek),
                    None => "No active gameweek".to_string(),
                })?
            }
            GameweekCmd::Activate { id } => {
                let summary = gameweeks::activate_gameweek(db, &actor, id)?;
                emit(json, &summary, |s| {
                    format!(
                        "{}\n{} squads rolled over",
                        gameweek_line(&s.gameweek),
                        s.rolled_over
                    )
                })?
            }
            GameweekCmd::Voting { id, open } => {
                let gameweek = gameweeks::set_voting(db, &actor, id, open)?;
                emit(json, &gameweek, gameweek_line)?
            }
            GameweekCmd::Settle { id } => {
                let summary = settlement::settle_gameweek(db, &actor, config, id)?;
                emit(json, &summary, |s| {
                    let podium: Vec<String> = s
                        .mvp_awards
                        .iter()
                        .map(|(player, award)| format!("{} ({})", player, award.rank_number()))
                        .collect();
                    format!(
                        "Gameweek {} settled: {} stats, {} squads, {} votes\nMVP: {}",
                        s.number,
                        s.stats_settled,
                        s.squads_settled,
                        s.votes_counted,
                        if podium.is_empty() {
                            "none".to_string()
                        } else {
                            podium.join(", ")
                        }
                    )
                })?
            }
        },

        Commands::Stat { cmd } => match cmd {
            StatCmd::Set {
                gameweek,
                player,
                stats,
            } => {
                let submission = match_stats::submit_match_stat(
                    db,
                    &actor,
                    config,
                    gameweek,
                    player,
                    &stats.into(),
                )?;
                emit(json, &submission, |s| {
                    let note = if s.applied {
                        ""
                    } else {
                        "\n(gameweek finished: settle again to apply)"
                    };
                    format!("{}\n{}{}", stat_line(&s.stat), breakdown_text(&s.breakdown), note)
                })?
            }
            StatCmd::Show { gameweek, player } => {
                let breakdown = match_stats::points_breakdown(db, config, gameweek, player)?;
                emit(json, &breakdown, breakdown_text)?
            }
            StatCmd::List { gameweek } => {
                let list = match_stats::list_match_stats(db, gameweek)?;
                emit(json, &list, |list| {
                    list.iter().map(stat_line).collect::<Vec<_>>().join("\n")
                })?
            }
        },

        Commands::Squad { cmd } => match cmd {
            SquadCmd::Create { name } => {
                let squad = squads::create_squad(db, &actor, config, &name)?;
                emit(json, &squad, |s| {
                    format!("Created squad {} ({}) with {:.1}M", s.name, s.id, s.budget_remaining)
                })?
            }
            SquadCmd::Show => {
                let squad = squads::my_squad(db, &actor)?;
                emit(json, &squad, |s| {
                    format!(
                        "{} ({}): {} pts, {:.1}M left, {} free transfers",
                        s.name, s.id, s.total_points, s.budget_remaining, s.free_transfers
                    )
                })?
            }
            SquadCmd::Select {
                gameweek,
                players,
                captain,
            } => {
                let selection = squads::SquadSelection {
                    gameweek_id: gameweek,
                    players,
                    captain,
                };
                let summary = squads::select_squad(
                    db,
                    &actor,
                    config,
                    current_settings,
                    &selection,
                    now,
                )?;
                emit(json, &summary, |s| {
                    format!(
                        "Selection saved: {} transfers (penalty {}), {:.1}M left, {} free transfers",
                        s.transfers_made, s.transfer_penalty, s.budget_remaining, s.free_transfers_left
                    )
                })?
            }
            SquadCmd::History => {
                let history = squads::squad_history(db, &actor)?;
                emit(json, &history, |rows| {
                    rows.iter()
                        .map(|row| {
                            format!(
                                "gameweek {:>4}: {:>4} pts  captain {}  transfers {} (-{})",
                                row.gameweek_id,
                                row.gameweek_points,
                                row.captain,
                                row.transfers_made,
                                row.transfer_penalty
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                })?
            }
        },

        Commands::Vote { cmd } => match cmd {
            VoteCmd::Cast {
                gameweek,
                first,
                second,
                third,
            } => {
                let vote = votes::submit_vote(db, &actor, gameweek, [first, second, third], now)?;
                emit(json, &vote, |v| format!("Vote recorded for gameweek {}", v.gameweek_id))?
            }
            VoteCmd::Status { gameweek } => {
                let voted = votes::has_voted(db, &actor, gameweek)?;
                emit(json, &voted, |voted| {
                    let status = if *voted { "Voted" } else { "Not voted" };
                    status.to_string()
                })?
            }
        },

        Commands::League { cmd } => match cmd {
            LeagueCmd::Create { name } => {
                let league = standings::create_league(db, &actor, &name, now)?;
                emit(json, &league, |l| format!("Created {} with join code {}", l.name, l.join_code))?
            }
            LeagueCmd::Join { code } => {
                let league = standings::join_league(db, &actor, &code, now)?;
                emit(json, &league, |l| format!("Joined {}", l.name))?
            }
            LeagueCmd::Mine => {
                let leagues = standings::my_leagues(db, &actor)?;
                emit(json, &leagues, |list| {
                    list.iter()
                        .map(|l| format!("{:>4}  {:<24} {}", l.id, l.name, l.join_code))
                        .collect::<Vec<_>>()
                        .join("\n")
                })?
            }
            LeagueCmd::Standings { id } => {
                let entries = standings::league_standings(db, id)?;
                emit(json, &entries, |entries| leaderboard_text(entries))?
            }
        },

        Commands::Leaderboard { limit } => {
            let entries = standings::global_leaderboard(db, limit)?;
            emit(json, &entries, |entries| leaderboard_text(entries))?
        }

        Commands::Highlights => {
            let highlights = standings::dashboard_highlights(db, current_settings)?;
            emit(json, &highlights, |h| {
                if !h.show {
                    return "Dashboard stats are hidden".to_string();
                }
                let owned: Vec<String> = h
                    .top_owned
                    .iter()
                    .map(|o| format!("  {} {}%", o.player.name, o.ownership_percent))
                    .collect();
                let scorers: Vec<String> = h
                    .top_scorers
                    .iter()
                    .map(|s| format!("  {} {} pts", s.player.name, s.points))
                    .collect();
                format!(
                    "Most owned:\n{}\nTop scorers ({}):\n{}",
                    owned.join("\n"),
                    h.last_gameweek_name.as_deref().unwrap_or("-"),
                    scorers.join("\n")
                )
            })?
        }

        Commands::Settings { cmd } => match cmd {
            SettingsCmd::Show => {
                let current = settings::load_settings(db)?;
                emit(json, &current, |s| {
                    format!(
                        "allow_transfers = {}\nshow_dashboard_stats = {}",
                        s.allow_transfers, s.show_dashboard_stats
                    )
                })?
            }
            SettingsCmd::Set {
                allow_transfers,
                show_dashboard_stats,
            } => {
                let update = SettingsUpdate {
                    allow_transfers,
                    show_dashboard_stats,
                };
                let updated = settings::update_settings(db, &actor, &update)?;
                emit(json, &updated, |s| {
                    format!(
                        "allow_transfers = {}\nshow_dashboard_stats = {}",
                        s.allow_transfers, s.show_dashboard_stats
                    )
                })?
            }
        },
    }

    Ok(())
}
