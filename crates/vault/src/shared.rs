//! Shared vault handle. Cheap to clone.
//!
//! Serializes calls from several owners through a mutex. The lock is held
//! only around the accounting update: the asset balance is read before it is
//! taken and events are delivered after it is released, so an asset source or
//! event sink that calls back into the vault does not deadlock.

use std::sync::Arc;

use parking_lot::Mutex;
use sluice_accounting::{AccountingSnapshot, SyncOutcome};
use sluice_primitives::{Address, Amount, Seconds, Timestamp};

use crate::{
    AssetSource, Authorizer, EventSink, NoEvents, SmoothedVault, VaultAccounting, VaultEvent,
    VaultResult,
};

/// Handle to a vault shared between callers.
pub struct SharedVault<A, Z, E> {
    account: Address,
    asset: A,
    events: Arc<E>,
    accounting: Arc<Mutex<VaultAccounting<Z, NoEvents>>>,
}

impl<A: Clone, Z, E> Clone for SharedVault<A, Z, E> {
    fn clone(&self) -> Self {
        Self {
            account: self.account,
            asset: self.asset.clone(),
            events: Arc::clone(&self.events),
            accounting: Arc::clone(&self.accounting),
        }
    }
}

impl<A: AssetSource, Z: Authorizer, E: EventSink> From<SmoothedVault<A, Z, E>>
    for SharedVault<A, Z, E>
{
    fn from(vault: SmoothedVault<A, Z, E>) -> Self {
        let (account, asset, accounting) = vault.into_parts();
        let (state, authorizer, events) = accounting.into_parts();
        Self {
            account,
            asset,
            events: Arc::new(events),
            accounting: Arc::new(Mutex::new(VaultAccounting::with_state(
                state, authorizer, NoEvents,
            ))),
        }
    }
}

impl<A: AssetSource, Z: Authorizer, E: EventSink> SharedVault<A, Z, E> {
    /// The account whose asset balance backs the vault.
    pub fn account(&self) -> Address {
        self.account
    }

    /// Get a reference to the event sink.
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Run `f` with the accounting layer locked.
    pub fn with_accounting<R>(&self, f: impl FnOnce(&VaultAccounting<Z, NoEvents>) -> R) -> R {
        f(&*self.accounting.lock())
    }

    /// Serializable copy of the accounting state.
    pub fn snapshot(&self) -> AccountingSnapshot {
        self.accounting.lock().snapshot()
    }

    /// Fully recognized baseline.
    pub fn committed_balance(&self) -> Amount {
        self.accounting.lock().state().committed_balance()
    }

    /// Configured smoothing window.
    pub fn smoothing_window(&self) -> Seconds {
        self.accounting.lock().state().smoothing_window()
    }

    /// Remaining window as of the last commit.
    pub fn remaining_window(&self) -> Seconds {
        self.accounting.lock().state().remaining_window()
    }

    /// Current external balance of the vault account.
    pub fn observed_balance(&self) -> Amount {
        self.asset.balance_of(self.account)
    }

    /// Smoothed total assets at `now`.
    pub fn total_assets(&self, now: Timestamp) -> VaultResult<Amount> {
        let balance = self.observed_balance();
        self.accounting.lock().total_assets(balance, now)
    }

    /// Profit still held back by smoothing at `now`.
    pub fn pending_profit(&self, now: Timestamp) -> VaultResult<Amount> {
        let balance = self.observed_balance();
        self.accounting.lock().pending_profit(balance, now)
    }

    /// Largest withdrawal the before-withdraw hook would accept at `now`.
    pub fn max_withdraw(&self, now: Timestamp) -> VaultResult<Amount> {
        let balance = self.observed_balance();
        self.accounting.lock().max_withdraw(balance, now)
    }

    /// Manual sync.
    pub fn sync(&self, now: Timestamp) -> VaultResult<SyncOutcome> {
        let balance = self.observed_balance();
        self.locked(|accounting, events| accounting.sync_buffered(balance, now, events))
    }

    /// Hook run before the share ledger accepts a deposit of `assets`.
    pub fn before_deposit(&self, assets: Amount, now: Timestamp) -> VaultResult<SyncOutcome> {
        let balance = self.observed_balance();
        self.locked(|accounting, events| {
            accounting.before_deposit_buffered(balance, assets, now, events)
        })
    }

    /// Hook run before the share ledger pays out a withdrawal of `assets`.
    pub fn before_withdraw(&self, assets: Amount, now: Timestamp) -> VaultResult<SyncOutcome> {
        let balance = self.observed_balance();
        self.locked(|accounting, events| {
            accounting.before_withdraw_buffered(balance, assets, now, events)
        })
    }

    /// Replace the smoothing window. Restricted to authorized callers.
    pub fn set_smoothing_window(
        &self,
        new_window: Seconds,
        caller: Address,
        now: Timestamp,
    ) -> VaultResult<SyncOutcome> {
        let balance = self.observed_balance();
        self.locked(|accounting, events| {
            accounting.set_smoothing_window_buffered(new_window, caller, balance, now, events)
        })
    }

    /// Run `f` under the lock, then deliver its events with the lock released.
    fn locked<T>(
        &self,
        f: impl FnOnce(&mut VaultAccounting<Z, NoEvents>, &mut Vec<VaultEvent>) -> VaultResult<T>,
    ) -> VaultResult<T> {
        let mut events = Vec::new();
        let mut guard = self.accounting.lock();
        let result = f(&mut *guard, &mut events);
        drop(guard);

        for event in &events {
            self.events.emit(event);
        }
        result
    }
}

impl<A, Z, E> core::fmt::Debug for SharedVault<A, Z, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedVault")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}
