//! Mock asset sources.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use sluice_primitives::{Address, Amount};
use sluice_vault::AssetSource;

/// In-memory asset. Clones share the same balances.
///
/// Yield and loss rebase a holder's balance in place, the way a rebasing
/// token would.
#[derive(Debug, Clone, Default)]
pub struct MockAsset {
    balances: Arc<Mutex<HashMap<Address, Amount>>>,
    queries: Arc<AtomicUsize>,
}

impl MockAsset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asset with `holder` starting at `balance`.
    pub fn with_balance(holder: Address, balance: u64) -> Self {
        let asset = Self::new();
        asset.set_balance(holder, Amount::from(balance));
        asset
    }

    pub fn set_balance(&self, holder: Address, balance: Amount) {
        self.balances.lock().insert(holder, balance);
    }

    pub fn balance(&self, holder: Address) -> Amount {
        self.balances
            .lock()
            .get(&holder)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Rebase `holder` upwards by `amount`.
    pub fn add_yield(&self, holder: Address, amount: u64) {
        let mut balances = self.balances.lock();
        let entry = balances.entry(holder).or_insert(Amount::ZERO);
        *entry = entry.saturating_add(Amount::from(amount));
    }

    /// Rebase `holder` downwards by `amount`, stopping at zero.
    pub fn apply_loss(&self, holder: Address, amount: u64) {
        let mut balances = self.balances.lock();
        let entry = balances.entry(holder).or_insert(Amount::ZERO);
        *entry = entry.saturating_sub(Amount::from(amount));
    }

    /// Move deposited assets into `holder`.
    pub fn transfer_in(&self, holder: Address, amount: u64) {
        self.add_yield(holder, amount);
    }

    /// Move withdrawn assets out of `holder`.
    pub fn transfer_out(&self, holder: Address, amount: u64) {
        self.apply_loss(holder, amount);
    }

    /// Number of `balance_of` calls so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl AssetSource for MockAsset {
    fn balance_of(&self, account: Address) -> Amount {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.balance(account)
    }
}

type Callback = Box<dyn FnOnce() + Send>;

/// Asset that runs a one-shot callback from inside `balance_of`.
///
/// The callback is installed after the vault is built, so it can hold a
/// handle to that vault and call back into it.
#[derive(Clone, Default)]
pub struct ReentrantAsset {
    inner: MockAsset,
    on_query: Arc<Mutex<Option<Callback>>>,
}

impl ReentrantAsset {
    pub fn new(inner: MockAsset) -> Self {
        Self {
            inner,
            on_query: Arc::default(),
        }
    }

    pub fn inner(&self) -> &MockAsset {
        &self.inner
    }

    /// Run `callback` during the next balance query.
    pub fn on_next_query(&self, callback: impl FnOnce() + Send + 'static) {
        *self.on_query.lock() = Some(Box::new(callback));
    }

    /// Whether the installed callback has run.
    pub fn fired(&self) -> bool {
        self.on_query.lock().is_none()
    }
}

impl AssetSource for ReentrantAsset {
    fn balance_of(&self, account: Address) -> Amount {
        // Released before running so the callback may query again.
        let callback = self.on_query.lock().take();
        if let Some(callback) = callback {
            callback();
        }
        self.inner.balance_of(account)
    }
}

impl std::fmt::Debug for ReentrantAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReentrantAsset")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
