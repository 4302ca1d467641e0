//! Unsigned-call builders
//!
//! The service never holds keys. Each mutating action is encoded into an
//! `UnsignedCall` that the operator's wallet signs and broadcasts; the
//! caller then reports the resulting hash back for receipt watching.

use evm_rpc_client::abi;
use lockboard_core::{Address, ChainContracts, LockId, ProtocolError, TokenUnits};
use serde::{Deserialize, Serialize};

/// A fully encoded contract call awaiting an external signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedCall {
    /// Target contract
    pub to: Address,
    /// ABI-encoded calldata, 0x-prefixed
    pub data: String,
    /// ETH value, always zero for the locker surface
    pub value: String,
}

impl UnsignedCall {
    fn new(to: &Address, data: Vec<u8>) -> Self {
        Self {
            to: to.clone(),
            data: format!("0x{}", hex::encode(data)),
            value: "0x0".to_string(),
        }
    }
}

fn require_positive(amount: TokenUnits, what: &str) -> Result<(), ProtocolError> {
    if amount == 0 {
        return Err(ProtocolError::InvalidAmount {
            message: format!("{} amount must be positive", what),
        });
    }
    Ok(())
}

/// ERC-20 approval of the locker as spender.
pub fn build_approve(
    contracts: &ChainContracts,
    amount: TokenUnits,
) -> Result<UnsignedCall, ProtocolError> {
    require_positive(amount, "approval")?;

    let data = abi::encode_call(
        crate::constants::SEL_ERC20_APPROVE,
        &[
            abi::word_from_address(&contracts.locker),
            abi::word_from_amount(amount),
        ],
    );
    Ok(UnsignedCall::new(&contracts.lp_token, data))
}

/// Deposit LP tokens into a new lock.
pub fn build_lock_liquidity(
    contracts: &ChainContracts,
    amount: TokenUnits,
) -> Result<UnsignedCall, ProtocolError> {
    require_positive(amount, "deposit")?;

    let data = abi::encode_call(
        crate::constants::SEL_LOCK_LIQUIDITY,
        &[abi::word_from_amount(amount)],
    );
    Ok(UnsignedCall::new(&contracts.locker, data))
}

/// Start the withdrawal timelock for a lock.
pub fn build_trigger_withdrawal(contracts: &ChainContracts, lock_id: &LockId) -> UnsignedCall {
    let data = abi::encode_call(
        crate::constants::SEL_TRIGGER_WITHDRAWAL,
        &[abi::word_from_lock_id(lock_id)],
    );
    UnsignedCall::new(&contracts.locker, data)
}

/// Cancel a pending withdrawal trigger.
pub fn build_cancel_withdrawal_trigger(
    contracts: &ChainContracts,
    lock_id: &LockId,
) -> UnsignedCall {
    let data = abi::encode_call(
        crate::constants::SEL_CANCEL_WITHDRAWAL_TRIGGER,
        &[abi::word_from_lock_id(lock_id)],
    );
    UnsignedCall::new(&contracts.locker, data)
}

/// Withdraw LP tokens from a matured lock. The amount is explicit; partial
/// withdrawals are the one supported call shape.
pub fn build_withdraw_lp(
    contracts: &ChainContracts,
    lock_id: &LockId,
    amount: TokenUnits,
) -> Result<UnsignedCall, ProtocolError> {
    require_positive(amount, "withdrawal")?;

    let data = abi::encode_call(
        crate::constants::SEL_WITHDRAW_LP,
        &[
            abi::word_from_lock_id(lock_id),
            abi::word_from_amount(amount),
        ],
    );
    Ok(UnsignedCall::new(&contracts.locker, data))
}

/// Refresh the fee accounting for a lock before claiming.
pub fn build_update_claimable_fees(
    contracts: &ChainContracts,
    lock_id: &LockId,
) -> UnsignedCall {
    let data = abi::encode_call(
        crate::constants::SEL_UPDATE_CLAIMABLE_FEES,
        &[abi::word_from_lock_id(lock_id)],
    );
    UnsignedCall::new(&contracts.locker, data)
}

/// Claim accrued trading fees for a lock.
pub fn build_claim_lp_fees(contracts: &ChainContracts, lock_id: &LockId) -> UnsignedCall {
    let data = abi::encode_call(
        crate::constants::SEL_CLAIM_LP_FEES,
        &[abi::word_from_lock_id(lock_id)],
    );
    UnsignedCall::new(&contracts.locker, data)
}

/// Recover stray tokens sent to the locker by mistake. Refuses the LP
/// token itself; the principal can only leave through the timelock path.
pub fn build_recover_token(
    contracts: &ChainContracts,
    token: &Address,
    amount: TokenUnits,
) -> Result<UnsignedCall, ProtocolError> {
    require_positive(amount, "recovery")?;

    if token.same_as(contracts.lp_token.as_str()) {
        return Err(ProtocolError::ActionNotAllowed {
            reason: "the locked LP token cannot be recovered through emergency recovery"
                .to_string(),
        });
    }

    let data = abi::encode_call(
        crate::constants::SEL_RECOVER_TOKEN,
        &[
            abi::word_from_address(token),
            abi::word_from_amount(amount),
        ],
    );
    Ok(UnsignedCall::new(&contracts.locker, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contracts() -> ChainContracts {
        ChainContracts {
            locker: Address::parse("0x09635f643e140090a9a8dcd712ed6285858cebef").unwrap(),
            lp_token: Address::parse("0xa85233c63b9ee964add6f2cffe00fd84eb32338f").unwrap(),
        }
    }

    fn lock_id() -> LockId {
        LockId::parse("0x00000000000000000000000000000000000000000000000000000000000000aa")
            .unwrap()
    }

    #[test]
    fn test_approve_targets_lp_token_with_locker_spender() {
        let call = build_approve(&contracts(), 1_000).unwrap();
        assert_eq!(call.to, contracts().lp_token);
        assert!(call.data.starts_with("0x095ea7b3"));
        assert!(call
            .data
            .contains("09635f643e140090a9a8dcd712ed6285858cebef"));
        assert_eq!(call.value, "0x0");
    }

    #[test]
    fn test_lock_liquidity_encodes_amount() {
        let call = build_lock_liquidity(&contracts(), 0x1234).unwrap();
        assert_eq!(call.to, contracts().locker);
        assert!(call.data.starts_with("0x2bfbd9cf"));
        assert!(call.data.ends_with("1234"));
        // selector + one word
        assert_eq!(call.data.len(), 2 + 8 + 64);
    }

    #[test]
    fn test_zero_amounts_rejected() {
        assert!(matches!(
            build_lock_liquidity(&contracts(), 0),
            Err(ProtocolError::InvalidAmount { .. })
        ));
        assert!(matches!(
            build_withdraw_lp(&contracts(), &lock_id(), 0),
            Err(ProtocolError::InvalidAmount { .. })
        ));
        assert!(matches!(
            build_approve(&contracts(), 0),
            Err(ProtocolError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_withdraw_lp_takes_lock_id_and_amount() {
        let call = build_withdraw_lp(&contracts(), &lock_id(), 500).unwrap();
        assert!(call.data.starts_with("0x029bb921"));
        // selector + lock id word + amount word
        assert_eq!(call.data.len(), 2 + 8 + 64 + 64);
        assert!(call.data[10..74].ends_with("aa"));
    }

    #[test]
    fn test_trigger_and_cancel_shapes() {
        let trigger = build_trigger_withdrawal(&contracts(), &lock_id());
        assert!(trigger.data.starts_with("0x9cb15243"));
        assert_eq!(trigger.data.len(), 2 + 8 + 64);

        let cancel = build_cancel_withdrawal_trigger(&contracts(), &lock_id());
        assert!(cancel.data.starts_with("0xabe2ff14"));
        assert_eq!(cancel.to, contracts().locker);
    }

    #[test]
    fn test_recover_token_refuses_lp_token() {
        let lp_mixed_case =
            Address::parse("0xA85233C63B9EE964ADD6F2CFFE00FD84EB32338F").unwrap();
        let err = build_recover_token(&contracts(), &lp_mixed_case, 100).unwrap_err();
        assert!(matches!(err, ProtocolError::ActionNotAllowed { .. }));
    }

    #[test]
    fn test_recover_token_encodes_stray_token() {
        let stray = Address::parse("0x0000000000000000000000000000000000000bad").unwrap();
        let call = build_recover_token(&contracts(), &stray, 100).unwrap();
        assert!(call.data.starts_with("0xb29a8140"));
        assert!(call.data.contains("0bad"));
    }

    #[test]
    fn test_unsigned_call_serializes_camel_case() {
        let call = build_claim_lp_fees(&contracts(), &lock_id());
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["to"], contracts().locker.as_str());
        assert!(json["data"].as_str().unwrap().starts_with("0x202c28b0"));
        assert_eq!(json["value"], "0x0");
    }
}
