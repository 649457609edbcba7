//! `sluice quote`: one run of the smoothing calculator.

use std::fmt;

use eyre::Result;
use serde::Serialize;
use sluice_accounting::compute_smoothed;
use sluice_primitives::{Amount, Seconds};

/// Arguments for the `quote` command.
#[derive(Debug, clap::Args)]
pub(crate) struct QuoteArgs {
    /// Unrecognized profit above the committed balance.
    #[arg(long, value_name = "AMOUNT")]
    pub(crate) profit: Amount,

    /// Seconds since the last commit.
    #[arg(long, value_name = "SECONDS")]
    pub(crate) elapsed: Seconds,

    /// Remaining window as of the last commit [default: the full window]
    #[arg(long, value_name = "SECONDS")]
    pub(crate) remaining: Option<Seconds>,

    /// Smoothing window in seconds (0 disables smoothing).
    #[arg(long, value_name = "SECONDS")]
    pub(crate) window: Seconds,

    /// Print the quote as JSON.
    #[arg(long)]
    pub(crate) json: bool,
}

impl QuoteArgs {
    pub(crate) fn quote(&self) -> Result<Quote> {
        let remaining = self.remaining.unwrap_or(self.window);
        let outcome = compute_smoothed(self.profit, self.elapsed, remaining, self.window)?;

        Ok(Quote {
            profit: self.profit,
            elapsed: self.elapsed,
            smoothing_window: self.window,
            smoothed_profit: outcome.smoothed_profit,
            deferred_profit: self.profit.saturating_sub(outcome.smoothed_profit),
            remaining_window: outcome.remaining_window,
            rolled_over_periods: outcome.rolled_over_periods,
        })
    }
}

/// Calculator output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Quote {
    #[serde(serialize_with = "crate::scenario::decimal")]
    pub(crate) profit: Amount,
    pub(crate) elapsed: Seconds,
    pub(crate) smoothing_window: Seconds,
    #[serde(serialize_with = "crate::scenario::decimal")]
    pub(crate) smoothed_profit: Amount,
    #[serde(serialize_with = "crate::scenario::decimal")]
    pub(crate) deferred_profit: Amount,
    pub(crate) remaining_window: Seconds,
    pub(crate) rolled_over_periods: u64,
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "profit:              {}", self.profit)?;
        writeln!(f, "elapsed:             {}s", self.elapsed)?;
        writeln!(f, "smoothing window:    {}s", self.smoothing_window)?;
        writeln!(f, "smoothed profit:     {}", self.smoothed_profit)?;
        writeln!(f, "deferred profit:     {}", self.deferred_profit)?;
        writeln!(f, "remaining window:    {}s", self.remaining_window)?;
        writeln!(f, "rolled over periods: {}", self.rolled_over_periods)
    }
}
