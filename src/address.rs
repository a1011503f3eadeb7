use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque 32-byte account identifier
///
/// The all-zero address is the null address: it can never hold a balance
/// because every transfer or approval naming it is rejected up front.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(#[serde(with = "hex::serde")] [u8; 32]);

impl Address {
    /// The null address
    pub const ZERO: Address = Address([0u8; 32]);

    /// Create an address from raw bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create an address from a byte slice, if it is exactly 32 bytes
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; 32] = slice.try_into().ok()?;
        Some(Self(bytes))
    }

    /// Whether this is the null address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Raw bytes of the address
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form: first and last 4 bytes are enough to tell accounts apart in logs
        let full = hex::encode(self.0);
        write!(f, "Address({}..{})", &full[..8], &full[56..])
    }
}

impl FromStr for Address {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}
