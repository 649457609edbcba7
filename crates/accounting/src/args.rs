//! CLI arguments for smoothing configuration.

use clap::Args;
use serde::{Deserialize, Serialize};
use sluice_primitives::{Amount, Seconds};

use crate::SmoothingConfig;
use crate::constants::*;

/// Smoothing CLI arguments. Durations are in seconds.
#[derive(Debug, Args, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[command(next_help_heading = "Smoothing")]
#[serde(default, rename_all = "kebab-case")]
pub struct SmoothingArgs {
    /// Length of the smoothing window in seconds (0 recognizes profit instantly)
    #[arg(long = "smoothing.window", default_value_t = DEFAULT_SMOOTHING_WINDOW)]
    pub window: Seconds,

    /// Committed balance at start-up, for an already funded asset source
    #[arg(long = "smoothing.initial-balance", default_value_t = Amount::ZERO)]
    pub initial_balance: Amount,
}

impl Default for SmoothingArgs {
    fn default() -> Self {
        Self {
            window: DEFAULT_SMOOTHING_WINDOW,
            initial_balance: Amount::ZERO,
        }
    }
}

impl SmoothingArgs {
    /// Validate argument values.
    pub fn validate(&self) -> Result<(), String> {
        if self.window > MAX_SMOOTHING_WINDOW {
            return Err(format!(
                "smoothing window {} exceeds maximum of {} seconds",
                self.window, MAX_SMOOTHING_WINDOW
            ));
        }
        Ok(())
    }
}

impl SmoothingConfig for SmoothingArgs {
    fn smoothing_window(&self) -> Seconds {
        self.window
    }

    fn initial_balance(&self) -> Amount {
        self.initial_balance
    }
}
