//! Vault accounting: the hook layer over [`AccountingState`].
//!
//! Every method takes the external balance as an argument. Callers read the
//! asset source once per entry point and pass that snapshot in; nothing here
//! queries the source again.
//!
//! # Atomicity
//!
//! The state operations are all-or-nothing, so a withdrawal that fails its
//! balance check also discards the commit that preceded it. Events of a call
//! are buffered and delivered only after the call has succeeded.

use sluice_accounting::{
    AccountingError, AccountingSnapshot, AccountingState, SmoothingConfig, SyncOutcome,
};
use sluice_primitives::{Address, Amount, Seconds, Timestamp};
use tracing::{debug, info, warn};

use crate::metrics::VaultMetrics;
use crate::{Authorizer, EventSink, VaultEvent, VaultResult};

/// Smoothing bookkeeping plus the policies a vault applies around it.
pub struct VaultAccounting<Z, E> {
    state: AccountingState,
    authorizer: Z,
    events: E,
    metrics: VaultMetrics,
}

impl<Z: Authorizer, E: EventSink> VaultAccounting<Z, E> {
    /// Create accounting for a vault starting at `now`.
    pub fn new(config: &impl SmoothingConfig, authorizer: Z, events: E, now: Timestamp) -> Self {
        let state = AccountingState::new(config.smoothing_window(), config.initial_balance(), now);
        Self::with_state(state, authorizer, events)
    }

    /// Wrap an existing state, e.g. one restored from a snapshot.
    pub fn with_state(state: AccountingState, authorizer: Z, events: E) -> Self {
        let metrics = VaultMetrics::default();
        metrics.set_committed_balance(state.committed_balance());
        metrics.set_smoothing_window(state.smoothing_window());

        Self {
            state,
            authorizer,
            events,
            metrics,
        }
    }

    /// Decompose into state, authorizer and event sink.
    pub fn into_parts(self) -> (AccountingState, Z, E) {
        (self.state, self.authorizer, self.events)
    }

    /// Read-only view of the accounting state.
    pub fn state(&self) -> &AccountingState {
        &self.state
    }

    /// Serializable copy of the accounting state.
    pub fn snapshot(&self) -> AccountingSnapshot {
        self.state.snapshot()
    }

    /// Get a reference to the authorizer.
    pub fn authorizer(&self) -> &Z {
        &self.authorizer
    }

    /// Get a reference to the event sink.
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Smoothed total assets at `now`. Never mutates.
    pub fn total_assets(&self, balance: Amount, now: Timestamp) -> VaultResult<Amount> {
        Ok(self.state.total_assets(balance, now)?)
    }

    /// Profit still held back by smoothing at `now`.
    pub fn pending_profit(&self, balance: Amount, now: Timestamp) -> VaultResult<Amount> {
        Ok(self.state.pending_profit(balance, now)?)
    }

    /// Largest withdrawal the before-withdraw hook would accept at `now`.
    ///
    /// This is the committed balance after the hook's implicit commit, which
    /// equals the reporting view.
    pub fn max_withdraw(&self, balance: Amount, now: Timestamp) -> VaultResult<Amount> {
        self.total_assets(balance, now)
    }

    /// Manual sync. Anyone may call it; it only moves recognition forward.
    pub fn sync(&mut self, balance: Amount, now: Timestamp) -> VaultResult<SyncOutcome> {
        self.delivering(|this, events| this.sync_buffered(balance, now, events))
    }

    /// Commit, then add `assets` to the committed balance.
    ///
    /// Called before the share ledger issues shares and before the deposited
    /// assets reach the asset source.
    pub fn before_deposit(
        &mut self,
        balance: Amount,
        assets: Amount,
        now: Timestamp,
    ) -> VaultResult<SyncOutcome> {
        self.delivering(|this, events| this.before_deposit_buffered(balance, assets, now, events))
    }

    /// Commit, then remove `assets` from the committed balance.
    ///
    /// Fails with `InsufficientBalance` if the committed balance (after the
    /// commit) is smaller than `assets`; the commit is discarded as well.
    pub fn before_withdraw(
        &mut self,
        balance: Amount,
        assets: Amount,
        now: Timestamp,
    ) -> VaultResult<SyncOutcome> {
        self.delivering(|this, events| this.before_withdraw_buffered(balance, assets, now, events))
    }

    /// Flush pending smoothing under the old window, then switch windows.
    pub fn set_smoothing_window(
        &mut self,
        new_window: Seconds,
        caller: Address,
        balance: Amount,
        now: Timestamp,
    ) -> VaultResult<SyncOutcome> {
        self.delivering(|this, events| {
            this.set_smoothing_window_buffered(new_window, caller, balance, now, events)
        })
    }

    pub(crate) fn sync_buffered(
        &mut self,
        balance: Amount,
        now: Timestamp,
        events: &mut Vec<VaultEvent>,
    ) -> VaultResult<SyncOutcome> {
        self.apply(now, events, |state| state.commit(balance, now))
    }

    pub(crate) fn before_deposit_buffered(
        &mut self,
        balance: Amount,
        assets: Amount,
        now: Timestamp,
        events: &mut Vec<VaultEvent>,
    ) -> VaultResult<SyncOutcome> {
        let outcome = self.apply(now, events, |state| state.deposit(balance, assets, now))?;
        self.metrics.inc_deposits();
        debug!(%assets, committed = %self.state.committed_balance(), "deposit accounted");
        Ok(outcome)
    }

    pub(crate) fn before_withdraw_buffered(
        &mut self,
        balance: Amount,
        assets: Amount,
        now: Timestamp,
        events: &mut Vec<VaultEvent>,
    ) -> VaultResult<SyncOutcome> {
        let outcome = self.apply(now, events, |state| state.withdraw(balance, assets, now))?;
        self.metrics.inc_withdrawals();
        debug!(%assets, committed = %self.state.committed_balance(), "withdrawal accounted");
        Ok(outcome)
    }

    pub(crate) fn set_smoothing_window_buffered(
        &mut self,
        new_window: Seconds,
        caller: Address,
        balance: Amount,
        now: Timestamp,
        events: &mut Vec<VaultEvent>,
    ) -> VaultResult<SyncOutcome> {
        if let Err(err) = self.authorizer.require_authorized(caller) {
            self.metrics.inc_rejected();
            warn!(%caller, new_window, "rejected smoothing window change");
            return Err(err);
        }

        let previous_window = self.state.smoothing_window();
        let outcome =
            self.apply(now, events, |state| state.reconfigure(balance, new_window, now))?;
        events.push(VaultEvent::SmoothingWindowChanged {
            previous_window,
            new_window,
        });

        self.metrics.inc_window_changes();
        self.metrics.set_smoothing_window(new_window);
        info!(%caller, previous_window, new_window, "smoothing window changed");
        Ok(outcome)
    }

    /// Run a state operation, buffering a `Synced` event if it committed.
    fn apply(
        &mut self,
        now: Timestamp,
        events: &mut Vec<VaultEvent>,
        f: impl FnOnce(&mut AccountingState) -> Result<SyncOutcome, AccountingError>,
    ) -> VaultResult<SyncOutcome> {
        match f(&mut self.state) {
            Ok(outcome) => {
                self.metrics.record_sync(&outcome);
                self.metrics.set_committed_balance(self.state.committed_balance());
                if let SyncOutcome::Committed {
                    smoothed_profit,
                    committed_balance,
                    remaining_window,
                    ..
                } = outcome
                {
                    info!(
                        smoothed = %smoothed_profit,
                        committed = %committed_balance,
                        remaining = remaining_window,
                        timestamp = now,
                        "synced"
                    );
                    events.push(VaultEvent::Synced {
                        smoothed_profit,
                        committed_balance,
                        remaining_window,
                        timestamp: now,
                    });
                }
                Ok(outcome)
            }
            Err(err) => {
                self.metrics.inc_rejected();
                warn!(%err, "vault call rejected, state unchanged");
                Err(err.into())
            }
        }
    }

    /// Run `f`, then hand its buffered events to the sink.
    fn delivering<T>(
        &mut self,
        f: impl FnOnce(&mut Self, &mut Vec<VaultEvent>) -> VaultResult<T>,
    ) -> VaultResult<T> {
        let mut events = Vec::new();
        let value = f(&mut *self, &mut events)?;
        for event in &events {
            self.events.emit(event);
        }
        Ok(value)
    }
}

impl<Z, E> core::fmt::Debug for VaultAccounting<Z, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VaultAccounting")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
