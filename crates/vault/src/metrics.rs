//! Vault Metrics

use metrics::{Counter, Gauge};
use sluice_accounting::SyncOutcome;
use sluice_primitives::{Amount, amount_to_f64};

/// Vault Metrics
#[derive(Clone, Debug)]
pub(crate) struct VaultMetrics {
    /// Number of syncs that committed profit
    syncs_committed_total: Counter,
    /// Number of syncs that recognized nothing
    syncs_unchanged_total: Counter,
    /// Number of whole smoothing windows skipped between commits
    rolled_over_periods_total: Counter,
    /// Number of deposit hooks applied
    deposits_total: Counter,
    /// Number of withdraw hooks applied
    withdrawals_total: Counter,
    /// Number of smoothing window changes
    window_changes_total: Counter,
    /// Number of calls rejected with an error
    rejected_total: Counter,
    /// Committed balance after the last successful call
    committed_balance: Gauge,
    /// Configured smoothing window
    smoothing_window: Gauge,
}

impl Default for VaultMetrics {
    fn default() -> Self {
        Self {
            syncs_committed_total: metrics::counter!("vault.sync.committed_total"),
            syncs_unchanged_total: metrics::counter!("vault.sync.unchanged_total"),
            rolled_over_periods_total: metrics::counter!("vault.sync.rolled_over_periods_total"),
            deposits_total: metrics::counter!("vault.hooks.deposits_total"),
            withdrawals_total: metrics::counter!("vault.hooks.withdrawals_total"),
            window_changes_total: metrics::counter!("vault.hooks.window_changes_total"),
            rejected_total: metrics::counter!("vault.rejected_total"),
            committed_balance: metrics::gauge!("vault.committed_balance"),
            smoothing_window: metrics::gauge!("vault.smoothing_window_seconds"),
        }
    }
}

impl VaultMetrics {
    pub(crate) fn record_sync(&self, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Unchanged => self.syncs_unchanged_total.increment(1),
            SyncOutcome::Committed {
                rolled_over_periods,
                ..
            } => {
                self.syncs_committed_total.increment(1);
                self.rolled_over_periods_total.increment(*rolled_over_periods);
            }
        }
    }

    pub(crate) fn inc_deposits(&self) {
        self.deposits_total.increment(1);
    }

    pub(crate) fn inc_withdrawals(&self) {
        self.withdrawals_total.increment(1);
    }

    pub(crate) fn inc_window_changes(&self) {
        self.window_changes_total.increment(1);
    }

    pub(crate) fn inc_rejected(&self) {
        self.rejected_total.increment(1);
    }

    pub(crate) fn set_committed_balance(&self, balance: Amount) {
        self.committed_balance.set(amount_to_f64(balance));
    }

    pub(crate) fn set_smoothing_window(&self, window: u64) {
        self.smoothing_window.set(window as f64);
    }
}
