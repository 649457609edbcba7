//! Property tests over random sequences of vault operations.

use proptest::prelude::*;
use sluice_test_utils::fixtures::{T0, amount, funded_vault, vault_account};

#[derive(Debug, Clone)]
enum Op {
    Advance(u64),
    Yield(u64),
    Sync,
    Deposit(u64),
    Withdraw(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..500).prop_map(Op::Advance),
        (0u64..10_000).prop_map(Op::Yield),
        Just(Op::Sync),
        (0u64..5_000).prop_map(Op::Deposit),
        (0u64..5_000).prop_map(Op::Withdraw),
    ]
}

proptest! {
    #[test]
    fn view_bounded_by_balance_and_never_over_recognizes(
        window in 0u64..300,
        ops in prop::collection::vec(op(), 1..60),
    ) {
        let (mut vault, asset, _) = funded_vault(window, 1_000);
        let mut now = T0;

        for op in ops {
            match op {
                Op::Advance(secs) => now += secs,
                Op::Yield(value) => asset.add_yield(vault_account(), value),
                Op::Sync => { vault.sync(now).unwrap(); }
                Op::Deposit(value) => {
                    vault.before_deposit(amount(value), now).unwrap();
                    asset.transfer_in(vault_account(), value);
                }
                Op::Withdraw(value) => {
                    if vault.before_withdraw(amount(value), now).is_ok() {
                        asset.transfer_out(vault_account(), value);
                    }
                }
            }

            let reported = vault.total_assets(now).unwrap();
            let balance = asset.balance(vault_account());
            prop_assert!(reported >= vault.committed_balance());
            prop_assert!(reported <= balance.max(vault.committed_balance()));
            prop_assert!(window == 0 || vault.remaining_window() <= window);
        }
    }

    #[test]
    fn view_non_decreasing_between_mutations(
        window in 1u64..500,
        profit in 0u64..1_000_000,
        steps in prop::collection::vec(0u64..100, 1..40),
    ) {
        let (vault, asset, _) = funded_vault(window, 1_000);
        asset.add_yield(vault_account(), profit);

        // Within one cycle; skipped windows restart the ramp.
        let mut now = T0;
        let mut previous = vault.total_assets(now).unwrap();
        for step in steps {
            now = (now + step).min(T0 + window);
            let reported = vault.total_assets(now).unwrap();
            prop_assert!(reported >= previous);
            previous = reported;
        }
        prop_assert!(vault.total_assets(T0 + window).unwrap() == amount(1_000 + profit));
    }
}
