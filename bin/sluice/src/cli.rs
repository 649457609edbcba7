//! CLI definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};
use tracing::debug;

use crate::logging::LogArgs;
use crate::quote::QuoteArgs;
use crate::scenario::{Scenario, SimulationReport};

/// Sluice - smoothed yield recognition for vaults
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct SluiceCli {
    /// Logging configuration (applies to all subcommands).
    #[command(flatten)]
    pub(crate) logs: LogArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub(crate) command: SluiceCommands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub(crate) enum SluiceCommands {
    /// Run the smoothing calculator once.
    Quote(QuoteArgs),
    /// Replay a scenario file against a simulated vault.
    Simulate(SimulateArgs),
}

/// Arguments for the `simulate` command.
#[derive(Debug, clap::Args)]
pub(crate) struct SimulateArgs {
    /// Scenario file (TOML).
    #[arg(value_name = "FILE")]
    pub(crate) scenario: PathBuf,

    /// Print the report as JSON.
    #[arg(long)]
    pub(crate) json: bool,
}

impl SluiceCli {
    pub(crate) fn run(self) -> Result<()> {
        match self.command {
            SluiceCommands::Quote(args) => {
                let quote = args.quote()?;
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&quote)?);
                } else {
                    print!("{quote}");
                }
            }
            SluiceCommands::Simulate(args) => {
                let contents = std::fs::read_to_string(&args.scenario).wrap_err_with(|| {
                    format!("failed to read scenario: {}", args.scenario.display())
                })?;
                let scenario = Scenario::from_toml(&contents)
                    .wrap_err_with(|| format!("invalid scenario: {}", args.scenario.display()))?;
                debug!(steps = scenario.steps.len(), "loaded scenario");

                let report: SimulationReport = scenario.run()?;
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print!("{report}");
                }
            }
        }
        Ok(())
    }
}
