//! Vault component bound to an asset source.

use sluice_accounting::{AccountingSnapshot, AccountingState, SmoothingConfig, SyncOutcome};
use sluice_primitives::{Address, Amount, Seconds, Timestamp};

use crate::{AssetSource, Authorizer, EventSink, VaultAccounting, VaultResult};

/// A smoothed-yield vault.
///
/// Owns the accounting for one `account` holding the underlying asset. Each
/// entry point reads the asset balance exactly once and hands that snapshot
/// to [`VaultAccounting`].
#[derive(Debug)]
pub struct SmoothedVault<A, Z, E> {
    account: Address,
    asset: A,
    accounting: VaultAccounting<Z, E>,
}

impl<A: AssetSource, Z: Authorizer, E: EventSink> SmoothedVault<A, Z, E> {
    /// Create a vault for `account` starting a full smoothing window at `now`.
    pub fn new(
        account: Address,
        asset: A,
        config: &impl SmoothingConfig,
        authorizer: Z,
        events: E,
        now: Timestamp,
    ) -> Self {
        Self {
            account,
            asset,
            accounting: VaultAccounting::new(config, authorizer, events, now),
        }
    }

    /// Create a vault around existing accounting, e.g. one restored from a
    /// snapshot.
    pub fn with_accounting(account: Address, asset: A, accounting: VaultAccounting<Z, E>) -> Self {
        Self {
            account,
            asset,
            accounting,
        }
    }

    /// Decompose into parts.
    pub fn into_parts(self) -> (Address, A, VaultAccounting<Z, E>) {
        (self.account, self.asset, self.accounting)
    }

    /// The account whose asset balance backs the vault.
    pub fn account(&self) -> Address {
        self.account
    }

    /// Get a reference to the asset source.
    pub fn asset(&self) -> &A {
        &self.asset
    }

    /// Get a reference to the accounting layer.
    pub fn accounting(&self) -> &VaultAccounting<Z, E> {
        &self.accounting
    }

    /// Read-only view of the accounting state.
    pub fn state(&self) -> &AccountingState {
        self.accounting.state()
    }

    /// Serializable copy of the accounting state.
    pub fn snapshot(&self) -> AccountingSnapshot {
        self.accounting.snapshot()
    }

    /// Fully recognized baseline.
    pub fn committed_balance(&self) -> Amount {
        self.state().committed_balance()
    }

    /// Time of the last commit.
    pub fn last_sync_time(&self) -> Timestamp {
        self.state().last_sync_time()
    }

    /// Configured smoothing window.
    pub fn smoothing_window(&self) -> Seconds {
        self.state().smoothing_window()
    }

    /// Remaining window as of the last commit.
    pub fn remaining_window(&self) -> Seconds {
        self.state().remaining_window()
    }

    /// Current external balance of the vault account.
    pub fn observed_balance(&self) -> Amount {
        self.asset.balance_of(self.account)
    }

    /// Smoothed total assets at `now`. Never mutates.
    pub fn total_assets(&self, now: Timestamp) -> VaultResult<Amount> {
        self.accounting.total_assets(self.observed_balance(), now)
    }

    /// Profit still held back by smoothing at `now`.
    pub fn pending_profit(&self, now: Timestamp) -> VaultResult<Amount> {
        self.accounting.pending_profit(self.observed_balance(), now)
    }

    /// Largest withdrawal the before-withdraw hook would accept at `now`.
    pub fn max_withdraw(&self, now: Timestamp) -> VaultResult<Amount> {
        self.accounting.max_withdraw(self.observed_balance(), now)
    }

    /// Manual sync.
    pub fn sync(&mut self, now: Timestamp) -> VaultResult<SyncOutcome> {
        let balance = self.observed_balance();
        self.accounting.sync(balance, now)
    }

    /// Hook run before the share ledger accepts a deposit of `assets`.
    pub fn before_deposit(&mut self, assets: Amount, now: Timestamp) -> VaultResult<SyncOutcome> {
        let balance = self.observed_balance();
        self.accounting.before_deposit(balance, assets, now)
    }

    /// Hook run before the share ledger pays out a withdrawal of `assets`.
    pub fn before_withdraw(&mut self, assets: Amount, now: Timestamp) -> VaultResult<SyncOutcome> {
        let balance = self.observed_balance();
        self.accounting.before_withdraw(balance, assets, now)
    }

    /// Replace the smoothing window. Restricted to authorized callers.
    pub fn set_smoothing_window(
        &mut self,
        new_window: Seconds,
        caller: Address,
        now: Timestamp,
    ) -> VaultResult<SyncOutcome> {
        let balance = self.observed_balance();
        self.accounting
            .set_smoothing_window(new_window, caller, balance, now)
    }
}
