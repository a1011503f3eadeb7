//! Tax Policy
//!
//! Pure fee assessment, consulted by the transfer engine before any
//! balance mutation. Tax applies only to transfers into or out of the
//! configured pool address; the tie-break order of the rules below is
//! significant and must not be reordered.

use log::trace;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::constants::{BASIS_POINTS_DIVISOR, TAX_BASIS_POINTS};
use crate::error::{TokenError, TokenResult};

/// Tax configuration state
///
/// The tax destination is fixed at construction. The pool and tax-exempt
/// addresses are mutable through the gate-checked setters on the token;
/// `Address::ZERO` marks an unset slot and never matches a valid transfer
/// endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxConfig {
    /// Fixed address accumulating collected fees
    tax_destination: Address,
    /// Liquidity pool counterparty against which tax is assessed
    pool_address: Address,
    /// Address whose transfers bypass tax entirely
    tax_exempt_address: Address,
}

impl TaxConfig {
    /// Create a configuration with no pool and no exemption set
    pub fn new(tax_destination: Address) -> Self {
        Self {
            tax_destination,
            pool_address: Address::ZERO,
            tax_exempt_address: Address::ZERO,
        }
    }

    pub fn tax_destination(&self) -> &Address {
        &self.tax_destination
    }

    pub fn pool_address(&self) -> &Address {
        &self.pool_address
    }

    pub fn tax_exempt_address(&self) -> &Address {
        &self.tax_exempt_address
    }

    pub(crate) fn set_pool_address(&mut self, address: Address) {
        self.pool_address = address;
    }

    pub(crate) fn set_tax_exempt_address(&mut self, address: Address) {
        self.tax_exempt_address = address;
    }

    /// Compute the fee owed on a transfer
    ///
    /// Rule order is significant: exemption outranks pool membership,
    /// which outranks the tax-sink exclusion. This lets an exempt
    /// liquidity-provisioning address interact with the pool untaxed.
    ///
    /// The division truncates; the sub-unit remainder is never collected.
    pub fn compute_tax(
        &self,
        sender: &Address,
        recipient: &Address,
        amount: U256,
    ) -> TokenResult<U256> {
        if *sender == self.tax_exempt_address || *recipient == self.tax_exempt_address {
            return Ok(U256::zero());
        }
        if *sender != self.pool_address && *recipient != self.pool_address {
            return Ok(U256::zero());
        }
        if *sender == self.tax_destination || *recipient == self.tax_destination {
            return Ok(U256::zero());
        }

        let fee = amount
            .checked_mul(U256::from(TAX_BASIS_POINTS))
            .ok_or(TokenError::ArithmeticOverflow)?
            .checked_div(U256::from(BASIS_POINTS_DIVISOR))
            .ok_or(TokenError::ArithmeticOverflow)?;

        trace!("tax assessed: {} on {} ({} -> {})", fee, amount, sender, recipient);
        Ok(fee)
    }
}
