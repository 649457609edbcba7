//! Smoothing configuration.

use sluice_primitives::{Amount, Seconds};

use crate::constants::DEFAULT_SMOOTHING_WINDOW;

/// Configuration needed to construct an accounting state.
///
/// CLI args implement this directly; builders receive `impl SmoothingConfig`.
#[auto_impl::auto_impl(&, Arc)]
pub trait SmoothingConfig {
    /// Smoothing window in seconds (0 disables smoothing).
    fn smoothing_window(&self) -> Seconds;

    /// Committed balance at construction, for a pre-funded asset source.
    fn initial_balance(&self) -> Amount {
        Amount::ZERO
    }

    /// Whether smoothing is enabled.
    fn is_enabled(&self) -> bool {
        self.smoothing_window() > 0
    }
}

/// Default smoothing configuration (one-week window, empty vault).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSmoothingConfig;

impl SmoothingConfig for DefaultSmoothingConfig {
    fn smoothing_window(&self) -> Seconds {
        DEFAULT_SMOOTHING_WINDOW
    }
}
