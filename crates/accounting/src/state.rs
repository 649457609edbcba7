//! Persistent accounting state.
//!
//! [`AccountingState`] is the only mutable entity in the system. Mutation goes
//! through [`AccountingState::commit`] and the hook operations built on it
//! ([`deposit`](AccountingState::deposit), [`withdraw`](AccountingState::withdraw),
//! [`reconfigure`](AccountingState::reconfigure)), each of which commits
//! first; the reporting view ([`AccountingState::total_assets`]) only borrows.
//!
//! Every method that looks at the external balance takes it as an argument.
//! Callers snapshot the balance once per operation and pass the same value
//! through the whole pipeline.

use serde::{Deserialize, Serialize};
use sluice_primitives::{Amount, Seconds, Timestamp};
use tracing::{debug, trace};

use crate::{AccountingError, SmoothingOutcome, compute_smoothed, observe};

/// Result of a sync/commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing was recognized; the state was left untouched.
    Unchanged,
    /// Smoothed profit was folded into the committed balance.
    Committed {
        /// Profit recognized by this commit.
        smoothed_profit: Amount,
        /// Committed balance after the commit.
        committed_balance: Amount,
        /// Remaining window after the commit.
        remaining_window: Seconds,
        /// Whole windows skipped since the previous commit.
        rolled_over_periods: u64,
    },
}

impl SyncOutcome {
    /// Whether the commit changed the state.
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }

    /// Profit recognized by this commit (zero when unchanged).
    pub fn smoothed_profit(&self) -> Amount {
        match self {
            Self::Unchanged => Amount::ZERO,
            Self::Committed { smoothed_profit, .. } => *smoothed_profit,
        }
    }
}

/// Smoothing bookkeeping for a single vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountingState {
    committed_balance: Amount,
    last_sync_time: Timestamp,
    smoothing_window: Seconds,
    remaining_window: Seconds,
}

impl AccountingState {
    /// Create a fresh state starting a full window at `now`.
    pub fn new(smoothing_window: Seconds, initial_balance: Amount, now: Timestamp) -> Self {
        Self {
            committed_balance: initial_balance,
            last_sync_time: now,
            smoothing_window,
            remaining_window: smoothing_window,
        }
    }

    /// Fully recognized baseline.
    pub fn committed_balance(&self) -> Amount {
        self.committed_balance
    }

    /// Time of the last commit.
    pub fn last_sync_time(&self) -> Timestamp {
        self.last_sync_time
    }

    /// Configured smoothing window (0 = disabled).
    pub fn smoothing_window(&self) -> Seconds {
        self.smoothing_window
    }

    /// Remaining window as of [`last_sync_time`](Self::last_sync_time).
    pub fn remaining_window(&self) -> Seconds {
        self.remaining_window
    }

    /// Seconds since the last commit.
    pub fn elapsed(&self, now: Timestamp) -> Result<Seconds, AccountingError> {
        now.checked_sub(self.last_sync_time)
            .ok_or(AccountingError::InvalidState {
                now,
                last_sync_time: self.last_sync_time,
            })
    }

    /// Run observer and calculator without touching the state.
    pub fn project(
        &self,
        balance: Amount,
        now: Timestamp,
    ) -> Result<SmoothingOutcome, AccountingError> {
        let elapsed = self.elapsed(now)?;
        let profit = observe(balance, self.committed_balance);
        let outcome = compute_smoothed(
            profit,
            elapsed,
            self.remaining_window,
            self.smoothing_window,
        )?;

        trace!(
            %balance,
            committed = %self.committed_balance,
            %profit,
            elapsed,
            smoothed = %outcome.smoothed_profit,
            remaining = outcome.remaining_window,
            "projected smoothing"
        );

        Ok(outcome)
    }

    /// Reporting view: committed balance plus currently smoothed profit.
    ///
    /// Equals the committed balance a [`commit`](Self::commit) at the same
    /// `now` would store.
    pub fn total_assets(&self, balance: Amount, now: Timestamp) -> Result<Amount, AccountingError> {
        let outcome = self.project(balance, now)?;
        self.committed_balance
            .checked_add(outcome.smoothed_profit)
            .ok_or(AccountingError::overflow("total assets"))
    }

    /// Profit held back by smoothing at `now`.
    pub fn pending_profit(&self, balance: Amount, now: Timestamp) -> Result<Amount, AccountingError> {
        Ok(balance.saturating_sub(self.total_assets(balance, now)?))
    }

    /// Fold smoothed profit into the committed balance.
    ///
    /// When nothing is recognized the state is left exactly as it was,
    /// including `last_sync_time`, so the next sync still measures from the
    /// original point.
    pub fn commit(&mut self, balance: Amount, now: Timestamp) -> Result<SyncOutcome, AccountingError> {
        let outcome = self.project(balance, now)?;
        if outcome.is_zero() {
            return Ok(SyncOutcome::Unchanged);
        }

        let committed_balance = self
            .committed_balance
            .checked_add(outcome.smoothed_profit)
            .ok_or(AccountingError::overflow("commit"))?;

        self.committed_balance = committed_balance;
        self.last_sync_time = now;
        self.remaining_window = outcome.remaining_window;

        debug!(
            smoothed = %outcome.smoothed_profit,
            committed = %committed_balance,
            remaining = outcome.remaining_window,
            rolled_over = outcome.rolled_over_periods,
            "committed smoothed profit"
        );

        Ok(SyncOutcome::Committed {
            smoothed_profit: outcome.smoothed_profit,
            committed_balance,
            remaining_window: outcome.remaining_window,
            rolled_over_periods: outcome.rolled_over_periods,
        })
    }

    /// Commit, then add deposited `assets` to the committed balance.
    ///
    /// All-or-nothing: on error the state is left as it was.
    pub fn deposit(
        &mut self,
        balance: Amount,
        assets: Amount,
        now: Timestamp,
    ) -> Result<SyncOutcome, AccountingError> {
        self.atomically(|state| {
            let outcome = state.commit(balance, now)?;
            state.credit(assets)?;
            Ok(outcome)
        })
    }

    /// Commit, then remove withdrawn `assets` from the committed balance.
    ///
    /// Fails with `InsufficientBalance` if the committed balance after the
    /// commit is smaller than `assets`. The commit is discarded as well.
    pub fn withdraw(
        &mut self,
        balance: Amount,
        assets: Amount,
        now: Timestamp,
    ) -> Result<SyncOutcome, AccountingError> {
        self.atomically(|state| {
            let outcome = state.commit(balance, now)?;
            state.debit(assets)?;
            Ok(outcome)
        })
    }

    /// Commit under the current window, then replace the window.
    ///
    /// The remaining window is whatever the commit left; the new window only
    /// applies to elapsed time from here on.
    pub fn reconfigure(
        &mut self,
        balance: Amount,
        smoothing_window: Seconds,
        now: Timestamp,
    ) -> Result<SyncOutcome, AccountingError> {
        self.atomically(|state| {
            let outcome = state.commit(balance, now)?;
            state.smoothing_window = smoothing_window;
            Ok(outcome)
        })
    }

    /// Serializable copy of the state.
    pub fn snapshot(&self) -> AccountingSnapshot {
        AccountingSnapshot {
            committed_balance: self.committed_balance,
            last_sync_time: self.last_sync_time,
            smoothing_window: self.smoothing_window,
            remaining_window: self.remaining_window,
        }
    }

    /// Rebuild a state from a snapshot.
    ///
    /// A remaining window longer than the configured one is legitimate: it is
    /// what a shortening reconfigure leaves behind until the next cycle.
    pub fn restore(snapshot: AccountingSnapshot) -> Self {
        Self {
            committed_balance: snapshot.committed_balance,
            last_sync_time: snapshot.last_sync_time,
            smoothing_window: snapshot.smoothing_window,
            remaining_window: snapshot.remaining_window,
        }
    }

    fn credit(&mut self, assets: Amount) -> Result<(), AccountingError> {
        self.committed_balance = self
            .committed_balance
            .checked_add(assets)
            .ok_or(AccountingError::overflow("deposit"))?;
        Ok(())
    }

    fn debit(&mut self, assets: Amount) -> Result<(), AccountingError> {
        self.committed_balance = self.committed_balance.checked_sub(assets).ok_or(
            AccountingError::InsufficientBalance {
                requested: assets,
                available: self.committed_balance,
            },
        )?;
        Ok(())
    }

    /// Apply `f` to a copy, keeping it only on success.
    fn atomically<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, AccountingError>,
    ) -> Result<T, AccountingError> {
        let mut next = *self;
        let value = f(&mut next)?;
        *self = next;
        Ok(value)
    }
}

/// Plain-data form of [`AccountingState`] for persistence and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountingSnapshot {
    /// Fully recognized baseline.
    pub committed_balance: Amount,
    /// Time of the last commit.
    pub last_sync_time: Timestamp,
    /// Configured smoothing window.
    pub smoothing_window: Seconds,
    /// Remaining window as of `last_sync_time`.
    pub remaining_window: Seconds,
}

impl From<AccountingState> for AccountingSnapshot {
    fn from(state: AccountingState) -> Self {
        state.snapshot()
    }
}

impl From<AccountingSnapshot> for AccountingState {
    fn from(snapshot: AccountingSnapshot) -> Self {
        Self::restore(snapshot)
    }
}
