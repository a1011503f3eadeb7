//! Access Gate
//!
//! The ledger core never embeds ownership logic; the two configuration
//! setters only ask "is this caller privileged?". Embedders supply their
//! own gate. `OwnerGate` is a minimal single-owner implementation for
//! tests and simple deployments.

use log::info;

use crate::address::Address;
use crate::error::{TokenError, TokenResult};

/// Authorization check consulted by the configuration setters
pub trait AccessGate {
    /// Whether the caller may perform privileged configuration
    fn is_authorized(&self, caller: &Address) -> bool;
}

/// Single-owner gate
///
/// Holds one privileged identity. Ownership can be handed to a new owner
/// or renounced, after which no caller is ever authorized again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnerGate {
    owner: Option<Address>,
}

impl OwnerGate {
    pub fn new(owner: Address) -> Self {
        Self { owner: Some(owner) }
    }

    /// Current owner, `None` once renounced
    pub fn owner(&self) -> Option<&Address> {
        self.owner.as_ref()
    }

    /// Hand ownership to a new owner; only the current owner may do this
    pub fn transfer(&mut self, caller: &Address, new_owner: Address) -> TokenResult<()> {
        if !self.is_authorized(caller) {
            return Err(TokenError::Unauthorized);
        }
        if new_owner.is_zero() {
            return Err(TokenError::ZeroAddress);
        }
        info!("ownership transferred from {} to {}", caller, new_owner);
        self.owner = Some(new_owner);
        Ok(())
    }

    /// Permanently disable the gate; only the current owner may do this
    pub fn renounce(&mut self, caller: &Address) -> TokenResult<()> {
        if !self.is_authorized(caller) {
            return Err(TokenError::Unauthorized);
        }
        info!("ownership renounced by {}", caller);
        self.owner = None;
        Ok(())
    }
}

impl AccessGate for OwnerGate {
    fn is_authorized(&self, caller: &Address) -> bool {
        self.owner.as_ref() == Some(caller)
    }
}
