//! Ledger
//!
//! Balance and allowance bookkeeping. The two tables are only mutated
//! through the checked operations here; every mutation either fails before
//! the first write or completes entirely, which is what upholds the supply
//! conservation invariant despite fee-splitting.

use indexmap::IndexMap;
use log::trace;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::{TokenError, TokenResult};

/// Balance and allowance tables
///
/// Invariants:
/// - the sum of all balance entries equals the total supply at all times
/// - no entry is ever negative (underflow is rejected, not wrapped)
/// - entries are driven to zero, never deleted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Holder -> balance in minor units
    balances: IndexMap<Address, U256>,
    /// (owner, spender) -> remaining spend budget
    allowances: IndexMap<(Address, Address), U256>,
    /// Fixed total supply, minted once at construction
    total_supply: U256,
}

impl Ledger {
    /// Create a ledger with the full supply credited to the initial holder
    pub(crate) fn new(initial_holder: Address, total_supply: U256) -> Self {
        let mut balances = IndexMap::new();
        balances.insert(initial_holder, total_supply);
        Self {
            balances,
            allowances: IndexMap::new(),
            total_supply,
        }
    }

    /// Balance of an account, zero for unknown addresses
    pub fn balance_of(&self, account: &Address) -> U256 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    /// Remaining allowance from owner to spender, zero for unknown pairs
    pub fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    /// Fixed total supply
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Sum of all balance entries
    ///
    /// Equals `total_supply()` whenever the conservation invariant holds.
    /// Saturating addition is safe here: the sum can never legitimately
    /// exceed the fixed supply.
    pub fn balance_sum(&self) -> U256 {
        self.balances
            .values()
            .fold(U256::zero(), |sum, balance| sum.saturating_add(*balance))
    }

    /// Credit an account, rejecting overflow
    pub(crate) fn credit(&mut self, account: &Address, amount: U256) -> TokenResult<()> {
        let balance = self.balance_of(account);
        let updated = balance
            .checked_add(amount)
            .ok_or(TokenError::ArithmeticOverflow)?;
        self.balances.insert(*account, updated);
        Ok(())
    }

    /// Debit an account, rejecting underflow
    pub(crate) fn debit(&mut self, account: &Address, amount: U256) -> TokenResult<()> {
        let balance = self.balance_of(account);
        let updated = balance
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                need: amount,
                have: balance,
            })?;
        self.balances.insert(*account, updated);
        Ok(())
    }

    /// Set the allowance from owner to spender, overwriting any prior value
    pub(crate) fn set_allowance(&mut self, owner: &Address, spender: &Address, amount: U256) {
        self.allowances.insert((*owner, *spender), amount);
    }

    /// Apply a transfer atomically: debit `from` by `amount`, credit `to`
    /// with `amount - fee`, credit `fee_to` with `fee` when non-zero.
    ///
    /// Every post-state balance is computed with checked arithmetic before
    /// the first write, so a failing call leaves the tables untouched.
    /// `from == to` is handled by reading the post-debit value for the
    /// credit: the net effect is zero unless the transfer is taxed.
    pub(crate) fn apply_transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: U256,
        fee_to: &Address,
        fee: U256,
    ) -> TokenResult<()> {
        let net = amount
            .checked_sub(fee)
            .ok_or(TokenError::ArithmeticOverflow)?;

        let from_balance = self.balance_of(from);
        let from_updated =
            from_balance
                .checked_sub(amount)
                .ok_or(TokenError::InsufficientBalance {
                    need: amount,
                    have: from_balance,
                })?;

        let to_base = if to == from {
            from_updated
        } else {
            self.balance_of(to)
        };
        let to_updated = to_base
            .checked_add(net)
            .ok_or(TokenError::ArithmeticOverflow)?;

        if fee.is_zero() {
            self.balances.insert(*from, from_updated);
            self.balances.insert(*to, to_updated);
        } else {
            // The tax policy never charges a fee when either endpoint is
            // the fee destination, so fee_to is distinct from both here.
            let fee_updated = self
                .balance_of(fee_to)
                .checked_add(fee)
                .ok_or(TokenError::ArithmeticOverflow)?;
            self.balances.insert(*from, from_updated);
            self.balances.insert(*to, to_updated);
            self.balances.insert(*fee_to, fee_updated);
        }

        trace!(
            "applied transfer: {} from {} to {} (fee {})",
            amount,
            from,
            to,
            fee
        );
        debug_assert_eq!(self.balance_sum(), self.total_supply);
        Ok(())
    }
}
