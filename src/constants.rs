//! Ledger Constants
//!
//! Supply, decimal convention, and tax rate. All amounts in this crate are
//! integer minor units; the decimal place count is a display convention.

use primitive_types::U256;

use crate::error::{TokenError, TokenResult};

/// Decimal places of the token (display convention)
pub const DECIMALS: u8 = 18;

/// Transfer tax rate in basis points (150 = 1.5%)
pub const TAX_BASIS_POINTS: u64 = 150;

/// Basis point divisor (10000 = 100%)
pub const BASIS_POINTS_DIVISOR: u64 = 10_000;

/// Fixed total supply in whole tokens, minted once at construction
pub const TOTAL_SUPPLY_WHOLE: u64 = 69_000_000_000;

/// Total supply in minor units (whole supply scaled by 10^DECIMALS)
///
/// Checked at construction time: the result does not fit in u64, so the
/// multiplication is performed on U256 and verified rather than assumed.
pub fn initial_supply() -> TokenResult<U256> {
    U256::from(TOTAL_SUPPLY_WHOLE)
        .checked_mul(U256::exp10(DECIMALS as usize))
        .ok_or(TokenError::ArithmeticOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_supply() {
        let supply = initial_supply().unwrap();
        // 69e9 * 1e18 = 6.9e28
        let expected = U256::from_dec_str("69000000000000000000000000000").unwrap();
        assert_eq!(supply, expected);
        assert!(supply > U256::from(u64::MAX));
    }

    #[test]
    fn test_tax_rate_is_150_bps() {
        assert_eq!(TAX_BASIS_POINTS, 150);
        assert_eq!(BASIS_POINTS_DIVISOR, 10_000);
    }
}
