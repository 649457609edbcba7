//! Logging arguments and subscriber setup.

use clap::Args;
use eyre::Result;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Logging configuration.
#[derive(Debug, Args, Clone, Default, Serialize, Deserialize)]
#[command(next_help_heading = "Logging")]
#[serde(default)]
pub(crate) struct LogArgs {
    /// Silence all output except errors.
    #[arg(short, long, global = true)]
    pub(crate) quiet: bool,

    /// Verbose mode (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    #[serde(skip)]
    pub(crate) verbosity: u8,

    /// Log filter directive (e.g., "sluice_vault=debug").
    #[arg(long = "log.filter", value_name = "DIRECTIVE", global = true)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) filter: Option<String>,

    /// Use JSON format for log output.
    #[arg(long = "log.json", global = true)]
    pub(crate) json: bool,
}

/// Initialize logging based on command line arguments.
///
/// Precedence: `--quiet` wins; otherwise `RUST_LOG` if set, else a level from
/// the verbosity count (warn, info, debug, trace); `--log.filter` directives
/// are added on top. Logs go to stderr so command output stays parseable.
pub(crate) fn init_logging(args: &LogArgs) -> Result<()> {
    let filter = if args.quiet {
        EnvFilter::new("error")
    } else {
        let base_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base_level));

        if let Some(custom_filter) = &args.filter {
            for directive in custom_filter.split(',') {
                filter = filter.add_directive(directive.parse()?);
            }
        }

        filter
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time();

    let result = if args.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|err| eyre::eyre!("failed to initialize logging: {err}"))
}
