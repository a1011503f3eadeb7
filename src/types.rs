use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::address::Address;

/// Notification produced by a mutating ledger operation
///
/// Transfers that collect a tax produce two events: one recording the fee
/// routed to the tax destination, followed by one recording the net amount
/// delivered to the recipient. Untaxed transfers produce a single event
/// for the full amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenEvent {
    /// Tokens moved between accounts
    Transfer {
        from: Address,
        to: Address,
        amount: U256,
    },
    /// An allowance was set or adjusted
    Approval {
        owner: Address,
        spender: Address,
        amount: U256,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_event_json_shape() {
        let event = TokenEvent::Transfer {
            from: Address::new([1u8; 32]),
            to: Address::new([2u8; 32]),
            amount: U256::from(1000u64),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("transfer").is_some());
        let back: TokenEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_approval_event_json_shape() {
        let event = TokenEvent::Approval {
            owner: Address::new([1u8; 32]),
            spender: Address::new([3u8; 32]),
            amount: U256::from(42u64),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("approval").is_some());
    }
}
