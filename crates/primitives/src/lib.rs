//! Core primitive types for smoothed vault accounting.
//!
//! Asset amounts are 256-bit unsigned integers so that any balance an
//! external token can report is representable without truncation. Time is
//! measured in whole unix seconds.

#![cfg_attr(not(feature = "std"), no_std)]

pub use alloy_primitives::{Address, U256};

/// An amount of the underlying asset.
pub type Amount = U256;

/// A point in time, in unix seconds.
pub type Timestamp = u64;

/// A span of time, in seconds.
pub type Seconds = u64;

/// Lossy conversion of an amount for gauges and human-facing output.
///
/// Amounts beyond `u128::MAX` saturate.
pub fn amount_to_f64(amount: Amount) -> f64 {
    u128::try_from(amount).unwrap_or(u128::MAX) as f64
}

/// Get current timestamp in seconds.
#[cfg(feature = "std")]
pub fn current_timestamp() -> Timestamp {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
