//! Default constants for smoothing.

use sluice_primitives::Seconds;

/// Default smoothing window (one week).
pub(crate) const DEFAULT_SMOOTHING_WINDOW: Seconds = 7 * 24 * 60 * 60;

/// Upper bound accepted for a configured smoothing window (one year).
pub(crate) const MAX_SMOOTHING_WINDOW: Seconds = 365 * 24 * 60 * 60;
