//! External asset source.

use sluice_primitives::{Address, Amount};

/// The underlying asset whose balance backs the vault.
///
/// Implementations may be rebasing and may call back into the vault while
/// answering. The vault queries this once per entry point and never again
/// within the same call.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait AssetSource {
    /// Balance held by `account`.
    fn balance_of(&self, account: Address) -> Amount;
}
