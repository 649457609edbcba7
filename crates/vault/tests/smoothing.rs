//! End-to-end smoothing behaviour through a vault over a rebasing asset.

use assert_matches::assert_matches;
use sluice_test_utils::fixtures::{T0, amount, funded_vault, owner, stranger, vault_account};
use sluice_vault::{AccountingError, SyncOutcome, VaultError, VaultEvent};

#[test]
fn reported_balance_ramps_across_window() {
    let (vault, asset, _) = funded_vault(100, 1000);
    asset.add_yield(vault_account(), 10);

    assert_eq!(vault.total_assets(T0).unwrap(), amount(1000));
    assert_eq!(vault.total_assets(T0 + 50).unwrap(), amount(1005));
    assert_eq!(vault.total_assets(T0 + 100).unwrap(), amount(1010));
}

#[test]
fn unsynced_profit_rolls_into_next_window() {
    let (vault, asset, _) = funded_vault(100, 1000);
    asset.add_yield(vault_account(), 10);

    // Two whole windows skipped: 7 lumped in, residual 3 ramps over a new
    // window that is already 50s in.
    assert_eq!(vault.total_assets(T0 + 250).unwrap(), amount(1008));
    assert_eq!(vault.pending_profit(T0 + 250).unwrap(), amount(2));
}

#[test]
fn per_second_syncs_reach_full_profit_at_window_end() {
    let (mut vault, asset, _) = funded_vault(100, 1000);
    asset.add_yield(vault_account(), 10);
    vault.sync(T0 + 100).unwrap();
    assert_eq!(vault.committed_balance(), amount(1010));

    let start = T0 + 100;
    asset.add_yield(vault_account(), 10);
    for i in 1..=100u64 {
        vault.sync(start + i).unwrap();
        assert_eq!(vault.committed_balance(), amount(1010 + 10 * i / 100), "second {i}");
    }
    assert_eq!(vault.total_assets(start + 100).unwrap(), amount(1020));
}

#[test]
fn view_matches_commit_at_same_time() {
    let (mut vault, asset, _) = funded_vault(100, 1000);
    asset.add_yield(vault_account(), 37);

    for now in [T0 + 3, T0 + 41, T0 + 99, T0 + 140, T0 + 333] {
        let viewed = vault.total_assets(now).unwrap();
        vault.sync(now).unwrap();
        assert_eq!(vault.committed_balance(), viewed);
        asset.add_yield(vault_account(), 13);
    }
}

#[test]
fn sync_twice_at_same_time_is_idempotent() {
    let (mut vault, asset, events) = funded_vault(100, 1000);
    asset.add_yield(vault_account(), 10);

    assert!(vault.sync(T0 + 30).unwrap().is_committed());
    let snapshot = vault.snapshot();
    assert_eq!(vault.sync(T0 + 30).unwrap(), SyncOutcome::Unchanged);
    assert_eq!(vault.snapshot(), snapshot);
    assert_eq!(events.len(), 1);
}

#[test]
fn losses_pass_through_without_amortization() {
    let (mut vault, asset, events) = funded_vault(100, 1000);
    asset.apply_loss(vault_account(), 100);

    assert_eq!(vault.total_assets(T0 + 50).unwrap(), amount(1000));
    assert_eq!(vault.pending_profit(T0 + 50).unwrap(), amount(0));
    assert_eq!(vault.sync(T0 + 50).unwrap(), SyncOutcome::Unchanged);
    assert_eq!(vault.last_sync_time(), T0);
    assert!(events.is_empty());

    // Recovery above the baseline is smoothed again.
    asset.add_yield(vault_account(), 110);
    assert_eq!(vault.total_assets(T0 + 50).unwrap(), amount(1005));
}

#[test]
fn disabled_window_recognizes_instantly() {
    let (mut vault, asset, _) = funded_vault(0, 1000);
    asset.add_yield(vault_account(), 25);

    // No time has passed, so nothing is recognized yet.
    assert_eq!(vault.total_assets(T0).unwrap(), amount(1000));
    assert_eq!(vault.total_assets(T0 + 1).unwrap(), amount(1025));
    assert_eq!(vault.pending_profit(T0 + 1).unwrap(), amount(0));
    assert_matches!(
        vault.sync(T0 + 1).unwrap(),
        SyncOutcome::Committed { smoothed_profit, remaining_window: 0, .. } if smoothed_profit == amount(25)
    );
}

#[test]
fn skipped_windows_roll_over() {
    let (mut vault, asset, _) = funded_vault(10, 0);
    asset.add_yield(vault_account(), 100);

    assert_matches!(
        vault.sync(T0 + 25).unwrap(),
        SyncOutcome::Committed { smoothed_profit, remaining_window: 5, rolled_over_periods: 2, .. }
            if smoothed_profit == amount(83)
    );
    assert_eq!(vault.remaining_window(), 5);
}

#[test]
fn clock_regression_is_fatal_to_the_call() {
    let (mut vault, asset, _) = funded_vault(100, 1000);
    asset.add_yield(vault_account(), 10);
    vault.sync(T0 + 50).unwrap();
    let snapshot = vault.snapshot();

    assert_matches!(
        vault.sync(T0 + 49),
        Err(VaultError::Accounting(AccountingError::InvalidState { now, last_sync_time }))
            if now == T0 + 49 && last_sync_time == T0 + 50
    );
    assert_matches!(vault.before_deposit(amount(1), T0), Err(VaultError::Accounting(_)));
    assert_eq!(vault.snapshot(), snapshot);
}

#[test]
fn owner_window_change_flushes_then_switches() {
    let (mut vault, asset, events) = funded_vault(100, 1000);
    asset.add_yield(vault_account(), 10);

    vault.set_smoothing_window(20, owner(), T0 + 50).unwrap();
    assert_eq!(vault.committed_balance(), amount(1005));
    assert_eq!(vault.smoothing_window(), 20);
    // The running cycle keeps what the flush left of it.
    assert_eq!(vault.remaining_window(), 50);

    assert_eq!(
        events.events(),
        vec![
            VaultEvent::Synced {
                smoothed_profit: amount(5),
                committed_balance: amount(1005),
                remaining_window: 50,
                timestamp: T0 + 50,
            },
            VaultEvent::SmoothingWindowChanged {
                previous_window: 100,
                new_window: 20,
            },
        ]
    );

    // Remaining 5 keeps draining over the 50s left: 5 × 10 / 50, then 5 × 20 / 50.
    assert_eq!(vault.total_assets(T0 + 60).unwrap(), amount(1006));
    assert_eq!(vault.total_assets(T0 + 70).unwrap(), amount(1007));
}

#[test]
fn stranger_window_change_is_rejected() {
    let (mut vault, asset, events) = funded_vault(100, 1000);
    asset.add_yield(vault_account(), 10);
    let snapshot = vault.snapshot();

    assert_matches!(
        vault.set_smoothing_window(1, stranger(), T0 + 50),
        Err(VaultError::Unauthorized { caller }) if caller == stranger()
    );
    assert_eq!(vault.snapshot(), snapshot);
    assert!(events.is_empty());
}

#[test]
fn disabling_window_releases_pending_profit() {
    let (mut vault, asset, _) = funded_vault(100, 1000);
    asset.add_yield(vault_account(), 10);

    vault.set_smoothing_window(0, owner(), T0 + 50).unwrap();
    assert_eq!(vault.committed_balance(), amount(1005));
    assert_eq!(vault.total_assets(T0 + 51).unwrap(), amount(1010));
}
