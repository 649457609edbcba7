//! Shared fixtures.

use sluice_primitives::{Address, Amount, Seconds, Timestamp};
use sluice_vault::{OwnerAuthorizer, SmoothedVault, SmoothingArgs};

use crate::{MockAsset, RecordingEvents};

/// Start time used across tests.
pub const T0: Timestamp = 1_700_000_000;

/// Account holding the vault's assets.
pub fn vault_account() -> Address {
    Address::repeat_byte(0x5a)
}

/// Administrator allowed to reconfigure.
pub fn owner() -> Address {
    Address::repeat_byte(0xaa)
}

/// Anyone else.
pub fn stranger() -> Address {
    Address::repeat_byte(0x01)
}

pub fn amount(value: u64) -> Amount {
    Amount::from(value)
}

pub fn smoothing_args(window: Seconds, initial_balance: u64) -> SmoothingArgs {
    SmoothingArgs {
        window,
        initial_balance: Amount::from(initial_balance),
    }
}

/// Vault over a fresh [`MockAsset`].
pub type TestVault = SmoothedVault<MockAsset, OwnerAuthorizer, RecordingEvents>;

/// Vault with `funded` assets already committed at [`T0`].
///
/// Returns the vault together with handles to its asset and event log.
pub fn funded_vault(window: Seconds, funded: u64) -> (TestVault, MockAsset, RecordingEvents) {
    let asset = MockAsset::with_balance(vault_account(), funded);
    let events = RecordingEvents::new();
    let vault = SmoothedVault::new(
        vault_account(),
        asset.clone(),
        &smoothing_args(window, funded),
        OwnerAuthorizer::new(owner()),
        events.clone(),
        T0,
    );
    (vault, asset, events)
}
