//! Deposit and withdraw hooks around a share ledger.

use assert_matches::assert_matches;
use sluice_test_utils::fixtures::{T0, amount, funded_vault, vault_account};
use sluice_vault::{AccountingError, SyncOutcome, VaultError};

#[test]
fn deposit_commits_then_credits() {
    let (mut vault, asset, events) = funded_vault(100, 1000);
    asset.add_yield(vault_account(), 10);

    let outcome = vault.before_deposit(amount(500), T0 + 50).unwrap();
    asset.transfer_in(vault_account(), 500);

    assert_eq!(outcome.smoothed_profit(), amount(5));
    assert_eq!(vault.committed_balance(), amount(1505));
    assert_eq!(vault.last_sync_time(), T0 + 50);
    assert_eq!(events.len(), 1);

    // Deposited assets are not profit; the other 5 still ramps in.
    assert_eq!(vault.pending_profit(T0 + 50).unwrap(), amount(5));
    assert_eq!(vault.total_assets(T0 + 100).unwrap(), amount(1510));
}

#[test]
fn deposit_into_empty_vault_starts_baseline() {
    let (mut vault, asset, _) = funded_vault(100, 0);

    assert_eq!(vault.before_deposit(amount(1000), T0 + 5).unwrap(), SyncOutcome::Unchanged);
    asset.transfer_in(vault_account(), 1000);

    assert_eq!(vault.committed_balance(), amount(1000));
    assert_eq!(vault.total_assets(T0 + 5).unwrap(), amount(1000));
}

#[test]
fn withdraw_commits_then_debits() {
    let (mut vault, asset, _) = funded_vault(100, 1000);
    asset.add_yield(vault_account(), 10);

    vault.before_withdraw(amount(400), T0 + 50).unwrap();
    asset.transfer_out(vault_account(), 400);

    assert_eq!(vault.committed_balance(), amount(605));
    assert_eq!(vault.total_assets(T0 + 100).unwrap(), amount(610));
}

#[test]
fn withdraw_everything_recognized() {
    let (mut vault, asset, _) = funded_vault(100, 1000);
    asset.add_yield(vault_account(), 10);

    let max = vault.max_withdraw(T0 + 50).unwrap();
    assert_eq!(max, amount(1005));
    vault.before_withdraw(max, T0 + 50).unwrap();
    asset.transfer_out(vault_account(), 1005);

    assert_eq!(vault.committed_balance(), amount(0));
    assert_eq!(vault.pending_profit(T0 + 50).unwrap(), amount(5));
}

#[test]
fn failed_withdraw_reverts_whole_call() {
    let (mut vault, asset, events) = funded_vault(100, 1000);
    asset.add_yield(vault_account(), 10);
    let snapshot = vault.snapshot();

    assert_matches!(
        vault.before_withdraw(amount(1006), T0 + 50),
        Err(VaultError::Accounting(AccountingError::InsufficientBalance { requested, available }))
            if requested == amount(1006) && available == amount(1005)
    );
    assert_eq!(vault.snapshot(), snapshot);
    assert!(events.is_empty());

    // Nothing was lost: a later sync recognizes as if the failed call never ran.
    vault.sync(T0 + 100).unwrap();
    assert_eq!(vault.committed_balance(), amount(1010));
}

#[test]
fn each_entry_point_reads_balance_once() {
    let (mut vault, asset, _) = funded_vault(100, 1000);
    asset.add_yield(vault_account(), 10);
    let base = asset.queries();

    vault.total_assets(T0 + 1).unwrap();
    assert_eq!(asset.queries(), base + 1);
    vault.sync(T0 + 2).unwrap();
    assert_eq!(asset.queries(), base + 2);
    vault.before_deposit(amount(1), T0 + 3).unwrap();
    assert_eq!(asset.queries(), base + 3);
    vault.before_withdraw(amount(1), T0 + 4).unwrap();
    assert_eq!(asset.queries(), base + 4);
}
