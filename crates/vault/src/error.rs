//! Vault error types.

use sluice_accounting::AccountingError;
use sluice_primitives::Address;

/// Errors surfaced by vault entry points.
///
/// Every entry point is all-or-nothing: when one of these is returned the
/// accounting state is exactly what it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VaultError {
    /// Caller is not allowed to reconfigure the vault.
    #[error("caller {caller} is not authorized")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },

    /// Accounting failed (clock regression, insufficient balance, overflow).
    #[error(transparent)]
    Accounting(#[from] AccountingError),
}

/// Result type for vault operations.
pub type VaultResult<T> = core::result::Result<T, VaultError>;
