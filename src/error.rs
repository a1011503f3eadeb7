use primitive_types::U256;
use thiserror::Error;

/// Token operation result type
pub type TokenResult<T> = Result<T, TokenError>;

/// Error taxonomy for ledger and configuration operations
///
/// Every failure is total: the triggering call performs no mutation and
/// emits no notification. Variants carry enough detail for automated
/// callers to match on the failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Address cannot be zero")]
    ZeroAddress,

    #[error("Amount cannot be zero")]
    ZeroAmount,

    #[error("Insufficient balance: need {need}, have {have}")]
    InsufficientBalance { need: U256, have: U256 },

    #[error("Allowance exceeded: need {need}, have {have}")]
    AllowanceExceeded { need: U256, have: U256 },

    #[error("Allowance decrease below zero")]
    AllowanceUnderflow,

    #[error("Not authorized")]
    Unauthorized,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}
