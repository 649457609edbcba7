//! Raw profit observation.

use sluice_primitives::Amount;

/// Unrecognized profit: the part of the external balance above the committed
/// baseline.
///
/// A balance below the baseline (negative yield) yields zero. Losses are never
/// deferred; they only stop new profit from being recognized until the
/// balance recovers.
pub fn observe(current_balance: Amount, committed_balance: Amount) -> Amount {
    current_balance.saturating_sub(committed_balance)
}
