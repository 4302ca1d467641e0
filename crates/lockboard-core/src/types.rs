//! Core type definitions for Lockboard

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ConfigError;

/// EVM account or contract address (20 bytes, 0x-prefixed hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Parse and normalize an address. Accepts mixed-case hex, stores
    /// lowercase so equality behaves the way on-chain identity does.
    pub fn parse(addr: &str) -> Result<Self, ConfigError> {
        let body = addr
            .strip_prefix("0x")
            .ok_or_else(|| ConfigError::InvalidAddress {
                reason: format!("missing 0x prefix: {}", addr),
            })?;

        if body.len() != 40 {
            return Err(ConfigError::InvalidAddress {
                reason: format!("expected 40 hex chars, got {}", body.len()),
            });
        }

        if !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidAddress {
                reason: format!("non-hex character in address: {}", addr),
            });
        }

        Ok(Self(format!("0x{}", body.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Address equality ignoring hex case. Addresses are not case-sensitive
    /// identifiers; ownership checks must go through this, not `==` on raw
    /// user input.
    pub fn same_as(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }

    /// Raw 20-byte form, for ABI encoding.
    pub fn to_bytes(&self) -> [u8; 20] {
        let mut out = [0u8; 20];
        // Infallible: `parse` validated the hex on construction.
        if let Ok(bytes) = hex::decode(&self.0[2..]) {
            out.copy_from_slice(&bytes);
        }
        out
    }

    /// Shortened display form, e.g. `0x1234...abcd`.
    pub fn shorten(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lock identifier (32 bytes, 0x-prefixed hex). Unique per deposit event,
/// opaque to this system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockId(String);

impl LockId {
    pub fn parse(id: &str) -> Result<Self, ConfigError> {
        let body = id
            .strip_prefix("0x")
            .ok_or_else(|| ConfigError::InvalidAddress {
                reason: format!("missing 0x prefix: {}", id),
            })?;

        if body.len() != 64 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidAddress {
                reason: format!("lock id must be 32 bytes of hex: {}", id),
            });
        }

        Ok(Self(format!("0x{}", body.to_ascii_lowercase())))
    }

    /// Wrap raw 32 bytes (e.g. decoded from a contract return word).
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        if let Ok(bytes) = hex::decode(&self.0[2..]) {
            out.copy_from_slice(&bytes);
        }
        out
    }
}

impl fmt::Display for LockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction hash (32 bytes, 0x-prefixed hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    /// Parse and normalize a transaction hash. Anything that is not
    /// exactly 32 bytes of 0x-prefixed hex is rejected; the watcher would
    /// otherwise poll a garbage hash as a bad RPC param until it times out.
    pub fn parse(hash: &str) -> Result<Self, ConfigError> {
        let body = hash
            .strip_prefix("0x")
            .ok_or_else(|| ConfigError::InvalidAddress {
                reason: format!("missing 0x prefix: {}", hash),
            })?;

        if body.len() != 64 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidAddress {
                reason: format!("transaction hash must be 32 bytes of hex: {:.80}", hash),
            });
        }

        Ok(Self(format!("0x{}", body.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// EVM chain identifier
pub type ChainId = u64;

/// Block height
pub type BlockHeight = u64;

/// Token amount in base units. Contract words wider than u128 are treated
/// as malformed data rather than silently truncated.
pub type TokenUnits = u128;

/// Unix timestamp, seconds
pub type UnixSeconds = u64;

/// Where a timestamp came from. Local wall-clock time can be skewed against
/// the chain, so consumers must always see which source was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSource {
    Chain,
    Local,
}

impl TimeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chain => "chain",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for TimeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parse_normalizes_case() {
        let addr = Address::parse("0xE7f1725E7734CE288F8367e1Bb143E90bb3F0512").unwrap();
        assert_eq!(addr.as_str(), "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512");
    }

    #[test]
    fn test_address_parse_rejects_bad_input() {
        assert!(Address::parse("e7f1725e7734ce288f8367e1bb143e90bb3f0512").is_err());
        assert!(Address::parse("0x1234").is_err());
        assert!(Address::parse("0xzzf1725e7734ce288f8367e1bb143e90bb3f0512").is_err());
    }

    #[test]
    fn test_address_same_as_ignores_case() {
        let addr = Address::parse("0xe7f1725e7734ce288f8367e1bb143e90bb3f0512").unwrap();
        assert!(addr.same_as("0xE7F1725E7734CE288F8367E1BB143E90BB3F0512"));
        assert!(!addr.same_as("0x5fbdb2315678afecb367f032d93f642f64180aa3"));
    }

    #[test]
    fn test_address_bytes_roundtrip() {
        let addr = Address::parse("0xe7f1725e7734ce288f8367e1bb143e90bb3f0512").unwrap();
        let bytes = addr.to_bytes();
        assert_eq!(bytes[0], 0xe7);
        assert_eq!(bytes[19], 0x12);
    }

    #[test]
    fn test_lock_id_roundtrip() {
        let mut raw = [0u8; 32];
        raw[31] = 7;
        let id = LockId::from_bytes(&raw);
        assert_eq!(id.to_bytes(), raw);
        assert_eq!(
            id.as_str(),
            "0x0000000000000000000000000000000000000000000000000000000000000007"
        );
    }

    #[test]
    fn test_tx_hash_parse_validates_and_normalizes() {
        let hash = TxHash::parse(
            "0xABCDEF0000000000000000000000000000000000000000000000000000000001",
        )
        .unwrap();
        assert_eq!(
            hash.as_str(),
            "0xabcdef0000000000000000000000000000000000000000000000000000000001"
        );

        assert!(TxHash::parse("definitely-not-a-32-byte-hash").is_err());
        assert!(TxHash::parse("0xzzz").is_err());
        assert!(TxHash::parse("0xabc").is_err());
        assert!(TxHash::parse("").is_err());
    }

    #[test]
    fn test_shorten() {
        let addr = Address::parse("0xe7f1725e7734ce288f8367e1bb143e90bb3f0512").unwrap();
        assert_eq!(addr.shorten(), "0xe7f1...0512");
    }
}
