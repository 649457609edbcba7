//! Smoothing calculator.
//!
//! Converts unrecognized profit into the portion that should be recognized
//! after `elapsed` seconds, and advances the remaining-window counter.
//!
//! # Formula
//!
//! ```text
//! new_remaining = remaining - elapsed            (cycle still running)
//!               = window - elapsed               (cycle already expired)
//! smoothed      = lump + profit × elapsed / (new_remaining + elapsed)
//! ```
//!
//! When more than one full window has passed since the last sync, all but
//! `profit / (periods + 1)` is released immediately as `lump`, the residual
//! is smoothed over a fresh window and `elapsed` is reduced modulo the window.
//!
//! All divisions floor, so recognized profit never exceeds the true profit.

use sluice_primitives::{Amount, Seconds};
use tracing::trace;

use crate::AccountingError;

/// Output of [`compute_smoothed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothingOutcome {
    /// Profit recognized by this step.
    pub smoothed_profit: Amount,
    /// Remaining window after this step.
    pub remaining_window: Seconds,
    /// Number of whole windows skipped since the last sync.
    pub rolled_over_periods: u64,
}

impl SmoothingOutcome {
    fn unchanged(remaining_window: Seconds) -> Self {
        Self {
            smoothed_profit: Amount::ZERO,
            remaining_window,
            rolled_over_periods: 0,
        }
    }

    /// Whether any profit is recognized.
    pub fn is_zero(&self) -> bool {
        self.smoothed_profit.is_zero()
    }
}

/// Compute the smoothed profit for `elapsed` seconds.
///
/// `smoothing_window == 0` disables smoothing and recognizes everything.
/// Fails only if `profit × elapsed` does not fit in 256 bits.
pub fn compute_smoothed(
    profit: Amount,
    elapsed: Seconds,
    remaining_window: Seconds,
    smoothing_window: Seconds,
) -> Result<SmoothingOutcome, AccountingError> {
    if elapsed == 0 {
        return Ok(SmoothingOutcome::unchanged(remaining_window));
    }

    if smoothing_window == 0 {
        return Ok(SmoothingOutcome {
            smoothed_profit: profit,
            remaining_window: 0,
            rolled_over_periods: 0,
        });
    }

    let mut profit = profit;
    let mut elapsed = elapsed;
    let mut lump = Amount::ZERO;
    let mut rolled_over_periods = 0;

    if elapsed > smoothing_window {
        let periods = elapsed / smoothing_window + 1;
        let residual = profit / Amount::from(periods);
        lump = profit - residual;
        profit = residual;
        elapsed %= smoothing_window;
        rolled_over_periods = periods - 1;

        trace!(periods, %lump, %residual, overflow = elapsed, "rolled over smoothing window");
    }

    let new_remaining = if remaining_window >= elapsed {
        remaining_window - elapsed
    } else {
        smoothing_window - elapsed
    };

    // An exact multiple of the window leaves no overflow time to interpolate.
    let interpolated = if elapsed == 0 {
        Amount::ZERO
    } else {
        let span = new_remaining
            .checked_add(elapsed)
            .ok_or(AccountingError::overflow("smoothing span"))?;
        profit
            .checked_mul(Amount::from(elapsed))
            .ok_or(AccountingError::overflow("profit interpolation"))?
            / Amount::from(span)
    };

    let smoothed_profit = lump
        .checked_add(interpolated)
        .ok_or(AccountingError::overflow("smoothed profit"))?;

    Ok(SmoothingOutcome {
        smoothed_profit,
        remaining_window: new_remaining,
        rolled_over_periods,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    fn amount(value: u64) -> Amount {
        Amount::from(value)
    }

    fn smoothed(profit: u64, elapsed: u64, remaining: u64, window: u64) -> SmoothingOutcome {
        compute_smoothed(amount(profit), elapsed, remaining, window).unwrap()
    }

    #[test]
    fn test_zero_elapsed_recognizes_nothing() {
        let outcome = smoothed(10, 0, 42, 100);
        assert!(outcome.is_zero());
        assert_eq!(outcome.remaining_window, 42);
    }

    #[test]
    fn test_disabled_window_recognizes_everything() {
        let outcome = smoothed(10, 1, 0, 0);
        assert_eq!(outcome.smoothed_profit, amount(10));
        assert_eq!(outcome.remaining_window, 0);
    }

    #[test]
    fn test_half_window() {
        let outcome = smoothed(10, 50, 100, 100);
        assert_eq!(outcome.smoothed_profit, amount(5));
        assert_eq!(outcome.remaining_window, 50);
    }

    #[test]
    fn test_exact_boundary_recognizes_everything() {
        let outcome = smoothed(10, 50, 50, 100);
        assert_eq!(outcome.smoothed_profit, amount(10));
        assert_eq!(outcome.remaining_window, 0);
    }

    #[test]
    fn test_uses_new_remaining_in_denominator() {
        // 30 of 60 remaining seconds: 9 × 30 / (30 + 30)
        let outcome = smoothed(9, 30, 60, 100);
        assert_eq!(outcome.smoothed_profit, amount(4));
        assert_eq!(outcome.remaining_window, 30);
    }

    #[test]
    fn test_expired_cycle_restarts_window() {
        let outcome = smoothed(10, 1, 0, 100);
        assert!(outcome.is_zero());
        assert_eq!(outcome.remaining_window, 99);

        let outcome = smoothed(10, 50, 30, 100);
        assert_eq!(outcome.smoothed_profit, amount(5));
        assert_eq!(outcome.remaining_window, 50);
    }

    #[test]
    fn test_full_window_from_expired_cycle() {
        let outcome = smoothed(10, 100, 0, 100);
        assert_eq!(outcome.smoothed_profit, amount(10));
        assert_eq!(outcome.remaining_window, 0);
        assert_eq!(outcome.rolled_over_periods, 0);
    }

    #[test]
    fn test_multi_period_rollover() {
        // 25s over a 10s window: 3 periods, 67 released as a lump, 33 carried
        // over and smoothed for the 5s overflow against 5s still remaining.
        let outcome = smoothed(100, 25, 10, 10);
        assert_eq!(outcome.rolled_over_periods, 2);
        assert_eq!(outcome.remaining_window, 5);
        assert_eq!(outcome.smoothed_profit, amount(67 + 16));
    }

    #[test]
    fn test_exact_multiple_of_window() {
        let outcome = smoothed(100, 20, 0, 10);
        assert_eq!(outcome.smoothed_profit, amount(67));
        assert_eq!(outcome.remaining_window, 0);
        assert_eq!(outcome.rolled_over_periods, 2);
    }

    #[test]
    fn test_remaining_longer_than_window() {
        // Left behind by shortening the window: the running cycle keeps its length.
        let outcome = smoothed(5, 10, 50, 20);
        assert_eq!(outcome.smoothed_profit, amount(1));
        assert_eq!(outcome.remaining_window, 40);
        assert_eq!(outcome.rolled_over_periods, 0);
    }

    #[test]
    fn test_zero_profit() {
        let outcome = smoothed(0, 30, 60, 100);
        assert!(outcome.is_zero());
        assert_eq!(outcome.remaining_window, 30);
    }

    #[test]
    fn test_overflow_is_reported() {
        let result = compute_smoothed(Amount::MAX, 2, 10, 10);
        assert_matches!(result, Err(AccountingError::ArithmeticOverflow { .. }));
    }

    fn window_and_remaining() -> impl Strategy<Value = (u64, u64)> {
        (1u64..=1_000_000).prop_flat_map(|window| (Just(window), 1..=window))
    }

    proptest! {
        #[test]
        fn prop_boundary_exactness(
            profit in any::<u128>(),
            (window, remaining) in window_and_remaining(),
        ) {
            let outcome = compute_smoothed(Amount::from(profit), remaining, remaining, window).unwrap();
            prop_assert_eq!(outcome.smoothed_profit, Amount::from(profit));
            prop_assert_eq!(outcome.remaining_window, 0);
        }

        #[test]
        fn prop_never_over_recognizes(
            profit in any::<u128>(),
            elapsed in 0u64..10_000_000,
            (window, remaining) in window_and_remaining(),
        ) {
            let outcome = compute_smoothed(Amount::from(profit), elapsed, remaining, window).unwrap();
            prop_assert!(outcome.smoothed_profit <= Amount::from(profit));
            prop_assert!(outcome.remaining_window <= window);
        }

        #[test]
        fn prop_rollover_lump(
            profit in any::<u128>(),
            periods in 1u64..50,
            overflow in 0u64..1_000,
            (window, remaining) in window_and_remaining(),
        ) {
            let overflow = overflow % window;
            let elapsed = periods * window + overflow;
            prop_assume!(elapsed > window);

            let profit = Amount::from(profit);
            let lump = profit - profit / Amount::from(periods + 1);
            let outcome = compute_smoothed(profit, elapsed, remaining, window).unwrap();

            prop_assert_eq!(outcome.rolled_over_periods, periods);
            prop_assert!(outcome.smoothed_profit >= lump);
            prop_assert!(outcome.smoothed_profit <= profit);
        }
    }
}
