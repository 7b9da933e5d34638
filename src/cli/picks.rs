//! Handlers for the `picks` subcommands.

use chrono::Utc;
use rust_decimal::Decimal;
use tabled::{Table, Tabled};

use crate::app::App;
use crate::cli::{output, AddPickArgs, ListPicksArgs, PicksCommand, RemovePickArgs};
use crate::config::Config;
use crate::domain::{GameId, Grading, ManualPick, Pick, Recommendation};
use crate::error::{ConfigError, Result};
use crate::port::store::SnapshotStore;

/// Execute a `picks` subcommand.
pub async fn execute(config: Config, command: &PicksCommand) -> Result<()> {
    let app = App::new(config)?;
    match command {
        PicksCommand::Add(args) => add(&app, args),
        PicksCommand::Remove(args) => remove(&app, args).await,
        PicksCommand::List(args) => list(&app, args),
    }
}

fn add(app: &App, args: &AddPickArgs) -> Result<()> {
    let game_id = GameId::new(args.game_id.clone());
    let Some(parts) = game_id.parts() else {
        return Err(ConfigError::InvalidValue {
            field: "game_id",
            reason: format!("'{}' is not of the form YYYYMMDD_AWAY_HOME", args.game_id),
        }
        .into());
    };
    if parts.away != args.team && parts.home != args.team {
        return Err(ConfigError::InvalidValue {
            field: "team",
            reason: format!("'{}' is not a side of game {}", args.team, game_id),
        }
        .into());
    }
    let game_date = parts.date;
    let recommendation: Recommendation = args.recommendation.parse().map_err(|_| {
        ConfigError::InvalidValue {
            field: "recommendation",
            reason: format!("expected 'over' or 'under', got '{}'", args.recommendation),
        }
    })?;

    let manual = ManualPick {
        pick: Pick {
            player_lookup: args.player.clone(),
            game_date,
            game_id,
            player_name: args
                .player_name
                .clone()
                .unwrap_or_else(|| args.player.clone()),
            team_abbr: args.team.clone(),
            opponent_abbr: args.opponent.clone(),
            recommendation,
            line_value: args.line,
            edge: args.edge.unwrap_or(Decimal::ZERO),
            rank: None,
            pick_angles: args.angles.clone(),
            predicted_points: None,
            ultra_tier: args.ultra,
            grading: Grading::default(),
        },
        added_by: args.added_by.clone(),
        notes: args.notes.clone(),
        is_active: true,
        created_at: Utc::now(),
    };

    app.manual_picks().add(&manual)?;
    output::ok(&format!(
        "manual pick added: {} {} {} ({})",
        manual.pick.player_lookup,
        manual.pick.recommendation.as_str(),
        manual.pick.line_value,
        manual.pick.game_date,
    ));
    output::note("the pick enters the published list on the next publish run");
    Ok(())
}

async fn remove(app: &App, args: &RemovePickArgs) -> Result<()> {
    let removed = app.manual_picks().remove(args.date, &args.player)?;
    if removed {
        output::ok(&format!(
            "manual pick deactivated: {} on {}",
            args.player, args.date
        ));
    } else {
        output::warn(&format!(
            "no active manual pick for {} on {}",
            args.player, args.date
        ));
    }

    // Drop the locked manual row too, or the next merge resurrects it.
    if app.snapshots().delete_manual(args.date, &args.player).await? {
        output::ok("locked snapshot row removed");
    }
    Ok(())
}

#[derive(Tabled)]
struct ManualPickLine {
    #[tabled(rename = "Player")]
    player: String,
    #[tabled(rename = "Game")]
    game: String,
    #[tabled(rename = "Pick")]
    pick: String,
    #[tabled(rename = "Ultra")]
    ultra: String,
    #[tabled(rename = "Added by")]
    added_by: String,
}

fn list(app: &App, args: &ListPicksArgs) -> Result<()> {
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());
    let picks = app.manual_picks().list(date)?;

    output::section(&format!("Manual picks {date}"));
    if picks.is_empty() {
        output::note("none");
        return Ok(());
    }

    let lines: Vec<ManualPickLine> = picks
        .iter()
        .map(|m| ManualPickLine {
            player: m.pick.player_lookup.clone(),
            game: m.pick.game_id.to_string(),
            pick: format!(
                "{} {}",
                m.pick.recommendation.as_str(),
                m.pick.line_value
            ),
            ultra: if m.pick.ultra_tier { "yes" } else { "" }.to_string(),
            added_by: m.added_by.clone(),
        })
        .collect();
    output::note(&Table::new(lines).to_string());
    Ok(())
}
