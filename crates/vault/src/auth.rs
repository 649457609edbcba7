//! Authorization for administrative calls.

use sluice_primitives::Address;

use crate::VaultError;

/// Authorization check guarding vault reconfiguration.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait Authorizer {
    /// Fail with [`VaultError::Unauthorized`] unless `caller` may reconfigure.
    fn require_authorized(&self, caller: Address) -> Result<(), VaultError>;
}

/// Single-owner authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerAuthorizer {
    owner: Address,
}

impl OwnerAuthorizer {
    /// Create an authorizer that only admits `owner`.
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    /// The admitted owner.
    pub fn owner(&self) -> Address {
        self.owner
    }
}

impl Authorizer for OwnerAuthorizer {
    fn require_authorized(&self, caller: Address) -> Result<(), VaultError> {
        if caller != self.owner {
            return Err(VaultError::Unauthorized { caller });
        }
        Ok(())
    }
}
