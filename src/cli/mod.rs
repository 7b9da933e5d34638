//! Command-line interface definitions.

pub mod circuits;
pub mod output;
pub mod picks;
pub mod publish;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::config::Config;
use crate::error::Result;

/// Picklock - pick-locking and publication engine.
#[derive(Parser, Debug)]
#[command(name = "picklock")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "picklock.toml", global = true)]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge, lock and publish picks for a date
    Publish(PublishArgs),

    /// Manage manual picks
    #[command(subcommand)]
    Picks(PicksCommand),

    /// Inspect circuit breaker state
    #[command(subcommand)]
    Circuits(CircuitsCommand),
}

/// Arguments for the `publish` subcommand.
#[derive(Parser, Debug)]
pub struct PublishArgs {
    /// Target date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// What triggered this run: scheduled, manual or post-grading
    #[arg(long, default_value = "manual")]
    pub trigger: String,
}

/// Subcommands for `picklock picks`
#[derive(Subcommand, Debug)]
pub enum PicksCommand {
    /// Add a manual pick override
    Add(AddPickArgs),
    /// Remove a manual pick (soft delete)
    Remove(RemovePickArgs),
    /// List active manual picks for a date
    List(ListPicksArgs),
}

/// Arguments for `picks add`.
#[derive(Parser, Debug)]
pub struct AddPickArgs {
    /// Stable player key, e.g. smith-j
    #[arg(long)]
    pub player: String,

    /// Composite game id, e.g. 20260805_BOS_LAL
    #[arg(long)]
    pub game_id: String,

    /// Display name; defaults to the player key
    #[arg(long)]
    pub player_name: Option<String>,

    /// Player's team abbreviation
    #[arg(long)]
    pub team: String,

    /// Opponent team abbreviation
    #[arg(long)]
    pub opponent: String,

    /// Recommendation direction: over or under
    #[arg(long)]
    pub recommendation: String,

    /// Betting line, e.g. 25.5
    #[arg(long)]
    pub line: Decimal,

    /// Predicted edge over the line
    #[arg(long)]
    pub edge: Option<Decimal>,

    /// Justification shown with the pick; repeatable
    #[arg(long = "angle")]
    pub angles: Vec<String>,

    /// Mark as premium tier
    #[arg(long)]
    pub ultra: bool,

    /// Operator adding the pick
    #[arg(long)]
    pub added_by: String,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

/// Arguments for `picks remove`.
#[derive(Parser, Debug)]
pub struct RemovePickArgs {
    /// Target date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Stable player key of the pick to remove
    #[arg(long)]
    pub player: String,
}

/// Arguments for `picks list`.
#[derive(Parser, Debug)]
pub struct ListPicksArgs {
    /// Target date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// Subcommands for `picklock circuits`
#[derive(Subcommand, Debug)]
pub enum CircuitsCommand {
    /// Show mirrored circuit state
    Status,
}

/// Dispatch a parsed CLI invocation.
pub async fn run(cli: &Cli, config: Config) -> Result<()> {
    match &cli.command {
        Commands::Publish(args) => publish::execute(config, args).await,
        Commands::Picks(command) => picks::execute(config, command).await,
        Commands::Circuits(command) => circuits::execute(config, command),
    }
}
