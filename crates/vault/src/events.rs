//! Vault notifications.

use sluice_primitives::{Amount, Seconds, Timestamp};

/// Notification emitted after a successful state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEvent {
    /// Smoothed profit was committed.
    Synced {
        /// Profit recognized by the commit.
        smoothed_profit: Amount,
        /// Committed balance after the commit.
        committed_balance: Amount,
        /// Remaining window after the commit.
        remaining_window: Seconds,
        /// Time of the commit.
        timestamp: Timestamp,
    },

    /// The smoothing window was replaced.
    SmoothingWindowChanged {
        /// Window before the change.
        previous_window: Seconds,
        /// Window after the change.
        new_window: Seconds,
    },
}

/// Receiver for [`VaultEvent`]s.
///
/// Events of a call are delivered only once the whole call has succeeded.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait EventSink {
    /// Handle one event.
    fn emit(&self, event: &VaultEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEvents;

impl EventSink for NoEvents {
    fn emit(&self, _event: &VaultEvent) {}
}
