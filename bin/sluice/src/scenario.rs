//! `sluice simulate`: replay a scenario against a simulated vault.
//!
//! A scenario is a TOML file with a `[smoothing]` table and a list of steps:
//!
//! ```toml
//! start = 1700000000
//!
//! [smoothing]
//! window = 100
//! initial-balance = "1000"
//!
//! [[steps]]
//! action = "yield"
//! amount = "10"
//!
//! [[steps]]
//! action = "advance"
//! seconds = 50
//! ```
//!
//! Amounts are decimal strings. Failed hooks are recorded in the report and
//! leave the simulated asset untouched, like a reverted transaction.

use std::cell::Cell;
use std::fmt;

use eyre::{Result, eyre};
use serde::{Deserialize, Serialize, Serializer};
use sluice_accounting::SmoothingArgs;
use sluice_primitives::{Address, Amount, Seconds, Timestamp};
use sluice_vault::{
    AssetSource, EventSink, OwnerAuthorizer, SmoothedVault, SyncOutcome, VaultEvent, VaultResult,
};
use strum::IntoStaticStr;
use tracing::info;

/// Account the simulated vault holds its assets under.
const VAULT_ACCOUNT: Address = Address::new([0x5a; 20]);

/// Serialize an amount as a decimal string.
pub(crate) fn decimal<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(amount)
}

/// A scenario file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct Scenario {
    /// Timestamp the vault is created at [default: now].
    #[serde(default = "sluice_primitives::current_timestamp")]
    pub(crate) start: Timestamp,

    /// Administrator allowed to change the window.
    #[serde(default)]
    pub(crate) owner: Address,

    #[serde(default)]
    pub(crate) smoothing: SmoothingArgs,

    #[serde(default)]
    pub(crate) steps: Vec<Step>,
}

/// One scenario step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, IntoStaticStr)]
#[serde(tag = "action", rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum Step {
    /// Move the clock forward.
    Advance { seconds: Seconds },
    /// Rebase the vault's balance up.
    Yield { amount: Amount },
    /// Rebase the vault's balance down.
    Loss { amount: Amount },
    /// Deposit through the before-deposit hook.
    Deposit { amount: Amount },
    /// Withdraw through the before-withdraw hook.
    Withdraw { amount: Amount },
    /// Manual sync.
    Sync,
    /// Change the smoothing window, as `caller` (the owner by default).
    SetWindow {
        window: Seconds,
        #[serde(default)]
        caller: Option<Address>,
    },
    /// Record the current state without acting.
    Report,
}

impl Scenario {
    /// Parse and validate a scenario.
    pub(crate) fn from_toml(contents: &str) -> Result<Self> {
        let scenario: Self = toml::from_str(contents)?;
        scenario.smoothing.validate().map_err(|e| eyre!(e))?;
        Ok(scenario)
    }

    /// Replay every step and collect a report row per step.
    pub(crate) fn run(&self) -> Result<SimulationReport> {
        let asset = SimulatedAsset::new(self.smoothing.initial_balance);
        let mut vault = SmoothedVault::new(
            VAULT_ACCOUNT,
            &asset,
            &self.smoothing,
            OwnerAuthorizer::new(self.owner),
            LogEvents,
            self.start,
        );

        let mut now = self.start;
        let mut rows = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            let outcome = match step {
                Step::Advance { seconds } => {
                    now = now
                        .checked_add(*seconds)
                        .ok_or_else(|| eyre!("step {index}: clock overflow"))?;
                    StepOutcome::Idle
                }
                Step::Yield { amount } => {
                    asset.rebase_up(*amount);
                    StepOutcome::Idle
                }
                Step::Loss { amount } => {
                    asset.rebase_down(*amount);
                    StepOutcome::Idle
                }
                Step::Deposit { amount } => {
                    let result = vault.before_deposit(*amount, now);
                    if result.is_ok() {
                        asset.rebase_up(*amount);
                    }
                    StepOutcome::from(result)
                }
                Step::Withdraw { amount } => {
                    let result = vault.before_withdraw(*amount, now);
                    if result.is_ok() {
                        asset.rebase_down(*amount);
                    }
                    StepOutcome::from(result)
                }
                Step::Sync => StepOutcome::from(vault.sync(now)),
                Step::SetWindow { window, caller } => StepOutcome::from(vault.set_smoothing_window(
                    *window,
                    caller.unwrap_or(self.owner),
                    now,
                )),
                Step::Report => StepOutcome::Idle,
            };

            rows.push(Row {
                step: index + 1,
                action: step.into(),
                elapsed: now - self.start,
                balance: asset.balance(),
                committed: vault.committed_balance(),
                reported: vault.total_assets(now)?,
                pending: vault.pending_profit(now)?,
                remaining_window: vault.remaining_window(),
                smoothing_window: vault.smoothing_window(),
                outcome,
            });
        }

        Ok(SimulationReport {
            start: self.start,
            end: now,
            committed_balance: vault.committed_balance(),
            reported_balance: vault.total_assets(now)?,
            rows,
        })
    }
}

/// Result of a hook step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub(crate) enum StepOutcome {
    /// The step did not call into the vault.
    Idle,
    Unchanged,
    Committed {
        #[serde(serialize_with = "decimal")]
        smoothed_profit: Amount,
    },
    Rejected {
        error: String,
    },
}

impl From<VaultResult<SyncOutcome>> for StepOutcome {
    fn from(result: VaultResult<SyncOutcome>) -> Self {
        match result {
            Ok(SyncOutcome::Unchanged) => Self::Unchanged,
            Ok(outcome) => Self::Committed {
                smoothed_profit: outcome.smoothed_profit(),
            },
            Err(err) => Self::Rejected {
                error: err.to_string(),
            },
        }
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::Unchanged => f.write_str("unchanged"),
            Self::Committed { smoothed_profit } => write!(f, "committed +{smoothed_profit}"),
            Self::Rejected { error } => write!(f, "rejected: {error}"),
        }
    }
}

/// State after one step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Row {
    pub(crate) step: usize,
    pub(crate) action: &'static str,
    /// Seconds since the scenario start.
    pub(crate) elapsed: Seconds,
    #[serde(serialize_with = "decimal")]
    pub(crate) balance: Amount,
    #[serde(serialize_with = "decimal")]
    pub(crate) committed: Amount,
    #[serde(serialize_with = "decimal")]
    pub(crate) reported: Amount,
    #[serde(serialize_with = "decimal")]
    pub(crate) pending: Amount,
    pub(crate) remaining_window: Seconds,
    pub(crate) smoothing_window: Seconds,
    pub(crate) outcome: StepOutcome,
}

/// Full simulation output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SimulationReport {
    pub(crate) start: Timestamp,
    pub(crate) end: Timestamp,
    #[serde(serialize_with = "decimal")]
    pub(crate) committed_balance: Amount,
    #[serde(serialize_with = "decimal")]
    pub(crate) reported_balance: Amount,
    pub(crate) rows: Vec<Row>,
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>4}  {:<10} {:>8} {:>12} {:>12} {:>12} {:>10} {:>9}  outcome",
            "step", "action", "elapsed", "balance", "committed", "reported", "pending", "remaining"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:>4}  {:<10} {:>8} {:>12} {:>12} {:>12} {:>10} {:>9}  {}",
                row.step,
                row.action,
                row.elapsed,
                row.balance,
                row.committed,
                row.reported,
                row.pending,
                row.remaining_window,
                row.outcome,
            )?;
        }
        writeln!(
            f,
            "final: committed {} reported {} after {}s",
            self.committed_balance,
            self.reported_balance,
            self.end - self.start
        )
    }
}

/// Rebasing asset holding only the vault's balance.
#[derive(Debug)]
struct SimulatedAsset {
    balance: Cell<Amount>,
}

impl SimulatedAsset {
    fn new(balance: Amount) -> Self {
        Self {
            balance: Cell::new(balance),
        }
    }

    fn balance(&self) -> Amount {
        self.balance.get()
    }

    fn rebase_up(&self, amount: Amount) {
        self.balance.set(self.balance.get().saturating_add(amount));
    }

    fn rebase_down(&self, amount: Amount) {
        self.balance.set(self.balance.get().saturating_sub(amount));
    }
}

impl AssetSource for SimulatedAsset {
    fn balance_of(&self, account: Address) -> Amount {
        if account == VAULT_ACCOUNT { self.balance.get() } else { Amount::ZERO }
    }
}

/// Sink forwarding vault events to the log.
#[derive(Debug, Clone, Copy)]
struct LogEvents;

impl EventSink for LogEvents {
    fn emit(&self, event: &VaultEvent) {
        match event {
            VaultEvent::Synced {
                smoothed_profit,
                committed_balance,
                ..
            } => info!(smoothed = %smoothed_profit, committed = %committed_balance, "vault synced"),
            VaultEvent::SmoothingWindowChanged {
                previous_window,
                new_window,
            } => info!(previous_window, new_window, "smoothing window changed"),
        }
    }
}
