//! Handlers for the `circuits` subcommands.

use owo_colors::OwoColorize;
use tabled::{Table, Tabled};

use crate::app::App;
use crate::cli::{output, CircuitsCommand};
use crate::config::Config;
use crate::domain::CircuitState;
use crate::error::Result;
use crate::port::store::CircuitStateStore;

/// Execute a `circuits` subcommand.
pub fn execute(config: Config, command: &CircuitsCommand) -> Result<()> {
    match command {
        CircuitsCommand::Status => status(config),
    }
}

#[derive(Tabled)]
struct CircuitLine {
    #[tabled(rename = "Circuit")]
    key: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Failures")]
    failures: String,
    #[tabled(rename = "Opened")]
    opened_at: String,
    #[tabled(rename = "Last error")]
    last_error: String,
}

fn status(config: Config) -> Result<()> {
    let app = App::new(config)?;
    let circuits = app.circuits().load_all()?;

    output::section("Circuits");
    if circuits.is_empty() {
        output::note("no circuit activity recorded");
        return Ok(());
    }

    let lines: Vec<CircuitLine> = circuits
        .iter()
        .map(|c| CircuitLine {
            key: c.key.clone(),
            state: match c.state {
                CircuitState::Closed => c.state.as_str().green().to_string(),
                CircuitState::Open => c.state.as_str().red().to_string(),
                CircuitState::HalfOpen => c.state.as_str().yellow().to_string(),
            },
            failures: format!("{}/{}", c.failure_count, c.threshold),
            opened_at: c
                .opened_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            last_error: c
                .last_error
                .as_deref()
                .map(truncate_for_display)
                .unwrap_or_default(),
        })
        .collect();
    output::note(&Table::new(lines).to_string());
    Ok(())
}

fn truncate_for_display(message: &str) -> String {
    const MAX: usize = 48;
    if message.chars().count() <= MAX {
        message.to_string()
    } else {
        let truncated: String = message.chars().take(MAX).collect();
        format!("{truncated}…")
    }
}
