//! Smoothed-yield vault component.
//!
//! Binds the bookkeeping from [`sluice_accounting`] to an external asset
//! source and exposes the hooks a share ledger calls around its own
//! operations.
//!
//! # Components
//!
//! - [`SmoothedVault`] - Vault owning its accounting, `&mut self` entry points
//! - [`SharedVault`] - Cloneable handle serializing calls through a mutex
//! - [`VaultAccounting`] - Hook layer taking the observed balance as input
//! - [`AssetSource`] / [`Authorizer`] / [`EventSink`] - Collaborator seams
//!
//! # Usage
//!
//! ```ignore
//! let mut vault = SmoothedVault::new(account, asset, &args, OwnerAuthorizer::new(owner), NoEvents, now);
//!
//! vault.before_deposit(assets, now)?;   // before shares are issued
//! vault.before_withdraw(assets, now)?;  // before assets are paid out
//! let reported = vault.total_assets(now)?;
//! ```

mod accounting;
mod auth;
mod error;
mod events;
mod metrics;
mod shared;
mod source;
mod vault;

pub use accounting::VaultAccounting;
pub use auth::{Authorizer, OwnerAuthorizer};
pub use error::{VaultError, VaultResult};
pub use events::{EventSink, NoEvents, VaultEvent};
pub use shared::SharedVault;
pub use source::AssetSource;
pub use vault::SmoothedVault;

pub use sluice_accounting::{
    AccountingError, AccountingSnapshot, AccountingState, SmoothingArgs, SmoothingConfig,
    SyncOutcome,
};
