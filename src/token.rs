//! Transfer Engine
//!
//! `TaxedToken` owns the ledger and the tax configuration and exposes the
//! external operation surface: transfers, approvals, gate-checked
//! configuration setters, and read-only queries. Every mutating operation
//! validates completely before the first write, so each call either
//! commits all of its state changes or none of them.

use log::{debug, info};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::access::AccessGate;
use crate::address::Address;
use crate::constants::{initial_supply, DECIMALS, TAX_BASIS_POINTS};
use crate::error::{TokenError, TokenResult};
use crate::ledger::Ledger;
use crate::tax::TaxConfig;
use crate::types::TokenEvent;

/// Fixed-supply fungible token with an address-conditional transfer tax
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxedToken {
    ledger: Ledger,
    config: TaxConfig,
}

impl TaxedToken {
    /// Create the token, minting the full fixed supply to the deployer
    ///
    /// The tax destination is immutable for the life of the token.
    pub fn new(deployer: Address, tax_destination: Address) -> TokenResult<Self> {
        if deployer.is_zero() || tax_destination.is_zero() {
            return Err(TokenError::ZeroAddress);
        }
        let supply = initial_supply()?;
        info!("minting {} minor units to deployer {}", supply, deployer);
        Ok(Self {
            ledger: Ledger::new(deployer, supply),
            config: TaxConfig::new(tax_destination),
        })
    }

    // ===== Queries =====

    /// Balance of an account, zero for unknown addresses
    pub fn balance_of(&self, account: &Address) -> U256 {
        self.ledger.balance_of(account)
    }

    /// Remaining allowance from owner to spender, zero for unknown pairs
    pub fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.ledger.allowance(owner, spender)
    }

    /// Fixed total supply in minor units
    pub fn total_supply(&self) -> U256 {
        self.ledger.total_supply()
    }

    /// Decimal places of the token
    pub const fn decimals(&self) -> u8 {
        DECIMALS
    }

    /// Transfer tax rate in basis points
    pub const fn tax_basis_points(&self) -> u64 {
        TAX_BASIS_POINTS
    }

    /// Fixed address accumulating collected fees
    pub fn tax_destination(&self) -> &Address {
        self.config.tax_destination()
    }

    /// Currently configured pool address (`Address::ZERO` when unset)
    pub fn pool_address(&self) -> &Address {
        self.config.pool_address()
    }

    /// Currently configured tax-exempt address (`Address::ZERO` when unset)
    pub fn tax_exempt_address(&self) -> &Address {
        self.config.tax_exempt_address()
    }

    /// The ledger tables (read-only)
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    // ===== Transfers =====

    /// Move `amount` from the caller to `recipient`
    pub fn transfer(
        &mut self,
        caller: &Address,
        recipient: &Address,
        amount: U256,
    ) -> TokenResult<Vec<TokenEvent>> {
        self.transfer_internal(caller, recipient, amount)
    }

    /// Move `amount` from `sender` to `recipient` on the caller's allowance
    ///
    /// Requires an allowance from `sender` to the caller of at least
    /// `amount`; the allowance is decremented by the full pre-tax amount on
    /// success. There is no infinite-allowance sentinel: every approval is
    /// a finite cap.
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        sender: &Address,
        recipient: &Address,
        amount: U256,
    ) -> TokenResult<Vec<TokenEvent>> {
        // Endpoint validation first: a zero address can never hold an
        // allowance, so checking the allowance first would mask the
        // distinguishing error for degenerate inputs.
        if sender.is_zero() || recipient.is_zero() {
            return Err(TokenError::ZeroAddress);
        }
        let granted = self.ledger.allowance(sender, caller);
        if granted < amount {
            return Err(TokenError::AllowanceExceeded {
                need: amount,
                have: granted,
            });
        }
        let events = self.transfer_internal(sender, recipient, amount)?;
        // granted >= amount was checked above
        self.ledger.set_allowance(sender, caller, granted - amount);
        Ok(events)
    }

    /// Shared transfer path: validation, tax assessment, atomic mutation
    fn transfer_internal(
        &mut self,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> TokenResult<Vec<TokenEvent>> {
        if from.is_zero() || to.is_zero() {
            return Err(TokenError::ZeroAddress);
        }
        if amount.is_zero() {
            return Err(TokenError::ZeroAmount);
        }

        let fee = self.config.compute_tax(from, to, amount)?;
        let net = amount
            .checked_sub(fee)
            .ok_or(TokenError::ArithmeticOverflow)?;
        let tax_destination = *self.config.tax_destination();
        self.ledger
            .apply_transfer(from, to, amount, &tax_destination, fee)?;

        debug!("transfer: {} from {} to {} (fee {})", amount, from, to, fee);

        let mut events = Vec::with_capacity(2);
        if fee.is_zero() {
            events.push(TokenEvent::Transfer {
                from: *from,
                to: *to,
                amount,
            });
        } else {
            events.push(TokenEvent::Transfer {
                from: *from,
                to: tax_destination,
                amount: fee,
            });
            events.push(TokenEvent::Transfer {
                from: *from,
                to: *to,
                amount: net,
            });
        }
        Ok(events)
    }

    // ===== Approvals =====

    /// Set the allowance from the caller to `spender`, overwriting any
    /// prior value
    ///
    /// Changing a non-zero allowance directly is unsafe against a spender
    /// racing to consume the old value before the new one lands. Zero the
    /// allowance first, or use [`Self::increase_allowance`] /
    /// [`Self::decrease_allowance`].
    pub fn approve(
        &mut self,
        caller: &Address,
        spender: &Address,
        amount: U256,
    ) -> TokenResult<TokenEvent> {
        if caller.is_zero() || spender.is_zero() {
            return Err(TokenError::ZeroAddress);
        }
        self.ledger.set_allowance(caller, spender, amount);
        Ok(TokenEvent::Approval {
            owner: *caller,
            spender: *spender,
            amount,
        })
    }

    /// Raise the allowance from the caller to `spender` by `delta`
    pub fn increase_allowance(
        &mut self,
        caller: &Address,
        spender: &Address,
        delta: U256,
    ) -> TokenResult<TokenEvent> {
        if caller.is_zero() || spender.is_zero() {
            return Err(TokenError::ZeroAddress);
        }
        let updated = self
            .ledger
            .allowance(caller, spender)
            .checked_add(delta)
            .ok_or(TokenError::ArithmeticOverflow)?;
        self.ledger.set_allowance(caller, spender, updated);
        Ok(TokenEvent::Approval {
            owner: *caller,
            spender: *spender,
            amount: updated,
        })
    }

    /// Lower the allowance from the caller to `spender` by `delta`
    pub fn decrease_allowance(
        &mut self,
        caller: &Address,
        spender: &Address,
        delta: U256,
    ) -> TokenResult<TokenEvent> {
        if caller.is_zero() || spender.is_zero() {
            return Err(TokenError::ZeroAddress);
        }
        let updated = self
            .ledger
            .allowance(caller, spender)
            .checked_sub(delta)
            .ok_or(TokenError::AllowanceUnderflow)?;
        self.ledger.set_allowance(caller, spender, updated);
        Ok(TokenEvent::Approval {
            owner: *caller,
            spender: *spender,
            amount: updated,
        })
    }

    // ===== Configuration (gate-checked) =====

    /// Set the taxed pool address; `Address::ZERO` returns it to unset
    pub fn set_pool_address(
        &mut self,
        gate: &dyn AccessGate,
        caller: &Address,
        address: Address,
    ) -> TokenResult<()> {
        if !gate.is_authorized(caller) {
            return Err(TokenError::Unauthorized);
        }
        info!("pool address set to {} by {}", address, caller);
        self.config.set_pool_address(address);
        Ok(())
    }

    /// Set the tax-exempt address; `Address::ZERO` returns it to unset
    pub fn set_tax_exempt_address(
        &mut self,
        gate: &dyn AccessGate,
        caller: &Address,
        address: Address,
    ) -> TokenResult<()> {
        if !gate.is_authorized(caller) {
            return Err(TokenError::Unauthorized);
        }
        info!("tax-exempt address set to {} by {}", address, caller);
        self.config.set_tax_exempt_address(address);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::OwnerGate;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 32])
    }

    const DEPLOYER: u8 = 0x01;
    const TAX_SINK: u8 = 0xFE;

    fn token() -> TaxedToken {
        TaxedToken::new(addr(DEPLOYER), addr(TAX_SINK)).unwrap()
    }

    #[test]
    fn test_construction_mints_to_deployer() {
        let token = token();
        assert_eq!(token.balance_of(&addr(DEPLOYER)), token.total_supply());
        assert_eq!(token.decimals(), 18);
        assert_eq!(token.tax_basis_points(), 150);
        assert_eq!(token.tax_destination(), &addr(TAX_SINK));
        assert!(token.pool_address().is_zero());
        assert!(token.tax_exempt_address().is_zero());
    }

    #[test]
    fn test_construction_rejects_zero_addresses() {
        assert_eq!(
            TaxedToken::new(Address::ZERO, addr(TAX_SINK)),
            Err(TokenError::ZeroAddress)
        );
        assert_eq!(
            TaxedToken::new(addr(DEPLOYER), Address::ZERO),
            Err(TokenError::ZeroAddress)
        );
    }

    #[test]
    fn test_transfer_validation_errors() {
        let mut token = token();
        assert_eq!(
            token.transfer(&addr(DEPLOYER), &Address::ZERO, U256::from(1u64)),
            Err(TokenError::ZeroAddress)
        );
        assert_eq!(
            token.transfer(&addr(DEPLOYER), &addr(2), U256::zero()),
            Err(TokenError::ZeroAmount)
        );
        let supply = token.total_supply();
        assert!(matches!(
            token.transfer(&addr(DEPLOYER), &addr(2), supply + U256::from(1u64)),
            Err(TokenError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn test_untaxed_transfer_single_event() {
        let mut token = token();
        let amount = U256::from(1_000u64);
        let events = token.transfer(&addr(DEPLOYER), &addr(2), amount).unwrap();
        assert_eq!(
            events,
            vec![TokenEvent::Transfer {
                from: addr(DEPLOYER),
                to: addr(2),
                amount,
            }]
        );
        assert_eq!(token.balance_of(&addr(2)), amount);
    }

    #[test]
    fn test_taxed_transfer_emits_fee_then_net() {
        let mut token = token();
        let gate = OwnerGate::new(addr(DEPLOYER));
        token
            .set_pool_address(&gate, &addr(DEPLOYER), addr(0xAA))
            .unwrap();

        let amount = U256::from(10_000u64);
        let events = token.transfer(&addr(DEPLOYER), &addr(0xAA), amount).unwrap();
        assert_eq!(
            events,
            vec![
                TokenEvent::Transfer {
                    from: addr(DEPLOYER),
                    to: addr(TAX_SINK),
                    amount: U256::from(150u64),
                },
                TokenEvent::Transfer {
                    from: addr(DEPLOYER),
                    to: addr(0xAA),
                    amount: U256::from(9_850u64),
                },
            ]
        );
        assert_eq!(token.balance_of(&addr(0xAA)), U256::from(9_850u64));
        assert_eq!(token.balance_of(&addr(TAX_SINK)), U256::from(150u64));
    }

    #[test]
    fn test_approve_and_transfer_from() {
        let mut token = token();
        token
            .approve(&addr(DEPLOYER), &addr(2), U256::from(500u64))
            .unwrap();
        assert_eq!(
            token.allowance(&addr(DEPLOYER), &addr(2)),
            U256::from(500u64)
        );

        token
            .transfer_from(&addr(2), &addr(DEPLOYER), &addr(3), U256::from(200u64))
            .unwrap();
        assert_eq!(token.balance_of(&addr(3)), U256::from(200u64));
        assert_eq!(
            token.allowance(&addr(DEPLOYER), &addr(2)),
            U256::from(300u64)
        );
    }

    #[test]
    fn test_transfer_from_exceeding_allowance_mutates_nothing() {
        let mut token = token();
        token
            .approve(&addr(DEPLOYER), &addr(2), U256::from(100u64))
            .unwrap();
        let result = token.transfer_from(&addr(2), &addr(DEPLOYER), &addr(3), U256::from(101u64));
        assert_eq!(
            result,
            Err(TokenError::AllowanceExceeded {
                need: U256::from(101u64),
                have: U256::from(100u64),
            })
        );
        assert_eq!(token.balance_of(&addr(3)), U256::zero());
        assert_eq!(
            token.allowance(&addr(DEPLOYER), &addr(2)),
            U256::from(100u64)
        );
    }

    #[test]
    fn test_transfer_from_zero_endpoint_reports_zero_address() {
        let mut token = token();
        // Even with no allowance in place, the zero endpoint is the
        // reported failure, not the allowance
        assert_eq!(
            token.transfer_from(&addr(2), &Address::ZERO, &addr(3), U256::from(1u64)),
            Err(TokenError::ZeroAddress)
        );
        assert_eq!(
            token.transfer_from(&addr(2), &addr(DEPLOYER), &Address::ZERO, U256::from(1u64)),
            Err(TokenError::ZeroAddress)
        );
    }

    #[test]
    fn test_transfer_from_failed_transfer_keeps_allowance() {
        let mut token = token();
        // Allowance granted by an account with no balance
        token.approve(&addr(5), &addr(2), U256::from(100u64)).unwrap();
        let result = token.transfer_from(&addr(2), &addr(5), &addr(3), U256::from(50u64));
        assert!(matches!(
            result,
            Err(TokenError::InsufficientBalance { .. })
        ));
        assert_eq!(token.allowance(&addr(5), &addr(2)), U256::from(100u64));
    }

    #[test]
    fn test_increase_decrease_allowance() {
        let mut token = token();
        token
            .increase_allowance(&addr(DEPLOYER), &addr(2), U256::from(70u64))
            .unwrap();
        let event = token
            .increase_allowance(&addr(DEPLOYER), &addr(2), U256::from(30u64))
            .unwrap();
        assert_eq!(
            event,
            TokenEvent::Approval {
                owner: addr(DEPLOYER),
                spender: addr(2),
                amount: U256::from(100u64),
            }
        );

        token
            .decrease_allowance(&addr(DEPLOYER), &addr(2), U256::from(100u64))
            .unwrap();
        assert_eq!(token.allowance(&addr(DEPLOYER), &addr(2)), U256::zero());
        assert_eq!(
            token.decrease_allowance(&addr(DEPLOYER), &addr(2), U256::from(1u64)),
            Err(TokenError::AllowanceUnderflow)
        );
    }

    #[test]
    fn test_increase_allowance_overflow() {
        let mut token = token();
        token
            .approve(&addr(DEPLOYER), &addr(2), U256::MAX)
            .unwrap();
        assert_eq!(
            token.increase_allowance(&addr(DEPLOYER), &addr(2), U256::from(1u64)),
            Err(TokenError::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_approve_zero_spender_rejected() {
        let mut token = token();
        assert_eq!(
            token.approve(&addr(DEPLOYER), &Address::ZERO, U256::from(1u64)),
            Err(TokenError::ZeroAddress)
        );
    }

    #[test]
    fn test_config_setters_gate_checked() {
        let mut token = token();
        let gate = OwnerGate::new(addr(DEPLOYER));

        assert_eq!(
            token.set_pool_address(&gate, &addr(9), addr(0xAA)),
            Err(TokenError::Unauthorized)
        );
        assert_eq!(
            token.set_tax_exempt_address(&gate, &addr(9), addr(0xBB)),
            Err(TokenError::Unauthorized)
        );

        token.set_pool_address(&gate, &addr(DEPLOYER), addr(0xAA)).unwrap();
        token
            .set_tax_exempt_address(&gate, &addr(DEPLOYER), addr(0xBB))
            .unwrap();
        assert_eq!(token.pool_address(), &addr(0xAA));
        assert_eq!(token.tax_exempt_address(), &addr(0xBB));
    }

    #[test]
    fn test_reads_are_idempotent() {
        let token = token();
        let first = token.balance_of(&addr(DEPLOYER));
        let second = token.balance_of(&addr(DEPLOYER));
        assert_eq!(first, second);
        assert_eq!(
            token.allowance(&addr(DEPLOYER), &addr(2)),
            token.allowance(&addr(DEPLOYER), &addr(2))
        );
    }
}
