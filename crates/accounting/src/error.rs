//! Accounting error types.

use sluice_primitives::{Amount, Timestamp};

/// Errors that can occur while smoothing or committing profit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountingError {
    /// The supplied time is earlier than the last commit.
    #[error("clock regression: now {now} is before last sync {last_sync_time}")]
    InvalidState {
        /// The time supplied by the caller.
        now: Timestamp,
        /// The time of the last commit.
        last_sync_time: Timestamp,
    },

    /// A withdrawal would take the committed balance below zero.
    #[error("insufficient balance: requested {requested}, committed {available}")]
    InsufficientBalance {
        /// Amount the caller tried to withdraw.
        requested: Amount,
        /// Committed balance at the time of the request.
        available: Amount,
    },

    /// An intermediate value does not fit in 256 bits.
    #[error("arithmetic overflow in {operation}")]
    ArithmeticOverflow {
        /// The computation that overflowed.
        operation: &'static str,
    },
}

impl AccountingError {
    pub(crate) const fn overflow(operation: &'static str) -> Self {
        Self::ArithmeticOverflow { operation }
    }
}
