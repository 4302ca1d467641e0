//! Locker protocol state types

use lockboard_core::{Address, LockId, TimeSource, TokenUnits, UnixSeconds};
use serde::{Deserialize, Serialize};

/// Token amounts cross the wire as decimal strings so browser clients
/// never round them through a float.
pub mod amount_string {
    use lockboard_core::TokenUnits;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &TokenUnits, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TokenUnits, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One lock record as the contract returns it: the raw 7-field tuple from
/// `getLockInfo`, plus the id it was queried by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lock {
    pub lock_id: LockId,
    pub owner: Address,
    pub fee_receiver: Address,
    pub token_contract: Address,
    #[serde(with = "amount_string")]
    pub amount: TokenUnits,
    /// Unlock timestamp (epoch seconds). Zero means withdrawal has not been
    /// triggered yet and no deadline exists; display must not treat it as
    /// an elapsed epoch-zero deadline.
    pub unlock_time: UnixSeconds,
    /// False once fully withdrawn
    pub is_liquidity_locked: bool,
    pub is_withdrawal_triggered: bool,
}

/// Derived display state for one lock. A pure function of (lock, now);
/// recomputed on every fetch, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
    pub status_label: String,
    pub status_color: String,
    pub can_withdraw: bool,
}

/// A lock paired with its derived display state and viewer context
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockView {
    #[serde(flatten)]
    pub lock: Lock,
    #[serde(flatten)]
    pub display: DisplayState,
    /// Whether the lock belongs to the viewing wallet
    pub is_own: bool,
}

/// Complete locker state for the locks panel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockerState {
    pub locks: Vec<LockView>,
    /// Timestamp the display states were derived against
    pub current_time: UnixSeconds,
    /// Whether `current_time` came from the chain or the local clock
    pub time_source: TimeSource,
    pub total_locks: usize,
    pub own_locks: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lock() -> Lock {
        Lock {
            lock_id: LockId::parse(
                "0x00000000000000000000000000000000000000000000000000000000000000aa",
            )
            .unwrap(),
            owner: Address::parse("0xe7f1725e7734ce288f8367e1bb143e90bb3f0512").unwrap(),
            fee_receiver: Address::parse("0x5fbdb2315678afecb367f032d93f642f64180aa3").unwrap(),
            token_contract: Address::parse("0xa85233c63b9ee964add6f2cffe00fd84eb32338f").unwrap(),
            amount: 340_282_366_920_938_463_463_374_607_431_768_211_455, // u128::MAX
            unlock_time: 1_750_000_000,
            is_liquidity_locked: true,
            is_withdrawal_triggered: true,
        }
    }

    #[test]
    fn test_amount_serializes_as_string() {
        let json = serde_json::to_value(sample_lock()).unwrap();
        assert_eq!(
            json["amount"],
            "340282366920938463463374607431768211455"
        );
    }

    #[test]
    fn test_lock_json_roundtrip() {
        let lock = sample_lock();
        let json = serde_json::to_string(&lock).unwrap();
        let parsed: Lock = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, lock);
    }

    #[test]
    fn test_lock_view_flattens() {
        let view = LockView {
            lock: sample_lock(),
            display: DisplayState {
                status_label: "Withdrawable".into(),
                status_color: "bg-green-500/20 text-green-400".into(),
                can_withdraw: true,
            },
            is_own: true,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["statusLabel"], "Withdrawable");
        assert_eq!(json["lockId"].as_str().unwrap().len(), 66);
        assert_eq!(json["isOwn"], true);
    }
}
