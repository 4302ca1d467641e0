//! Locker contract constants
//!
//! Function selectors are the first 4 bytes of keccak-256 over the
//! canonical signature. They are fixed per signature, so they are pinned
//! here as constants; the ERC-20 ones match the well-known values
//! (`approve` = 0x095ea7b3, `balanceOf` = 0x70a08231).

/// `getAllLockIds()` → `bytes32[]`
pub const SEL_GET_ALL_LOCK_IDS: [u8; 4] = [0xbc, 0x4a, 0xb7, 0xfb];

/// `getLockInfo(bytes32)` → `(address,address,address,uint256,uint256,bool,bool)`
pub const SEL_GET_LOCK_INFO: [u8; 4] = [0x8e, 0x54, 0x64, 0xdb];

/// `getLPBalance()` → `uint256`
pub const SEL_GET_LP_BALANCE: [u8; 4] = [0x6f, 0x43, 0xf1, 0x7b];

/// `getClaimableFees(bytes32)` → `uint256`
pub const SEL_GET_CLAIMABLE_FEES: [u8; 4] = [0x4a, 0x6d, 0x71, 0x42];

/// `getTotalAccumulatedFees(bytes32)` → `uint256`
pub const SEL_GET_TOTAL_ACCUMULATED_FEES: [u8; 4] = [0x22, 0xa0, 0xcb, 0x0d];

/// `owner()` → `address`
pub const SEL_OWNER: [u8; 4] = [0x8d, 0xa5, 0xcb, 0x5b];

/// `lockLiquidity(uint256)`
pub const SEL_LOCK_LIQUIDITY: [u8; 4] = [0x2b, 0xfb, 0xd9, 0xcf];

/// `triggerWithdrawal(bytes32)`
pub const SEL_TRIGGER_WITHDRAWAL: [u8; 4] = [0x9c, 0xb1, 0x52, 0x43];

/// `cancelWithdrawalTrigger(bytes32)`
pub const SEL_CANCEL_WITHDRAWAL_TRIGGER: [u8; 4] = [0xab, 0xe2, 0xff, 0x14];

/// `withdrawLP(bytes32,uint256)`
pub const SEL_WITHDRAW_LP: [u8; 4] = [0x02, 0x9b, 0xb9, 0x21];

/// `updateClaimableFees(bytes32)`
pub const SEL_UPDATE_CLAIMABLE_FEES: [u8; 4] = [0xd5, 0x06, 0x05, 0x51];

/// `claimLPFees(bytes32)`
pub const SEL_CLAIM_LP_FEES: [u8; 4] = [0x20, 0x2c, 0x28, 0xb0];

/// `recoverToken(address,uint256)`
pub const SEL_RECOVER_TOKEN: [u8; 4] = [0xb2, 0x9a, 0x81, 0x40];

/// ERC-20 `balanceOf(address)` → `uint256`
pub const SEL_ERC20_BALANCE_OF: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

/// ERC-20 `allowance(address,address)` → `uint256`
pub const SEL_ERC20_ALLOWANCE: [u8; 4] = [0xdd, 0x62, 0xed, 0x3e];

/// ERC-20 `approve(address,uint256)`
pub const SEL_ERC20_APPROVE: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];

/// `getLockInfo` tuple arity: owner, feeReceiver, tokenContract, amount,
/// lockUpEndTime, isLiquidityLocked, isWithdrawalTriggered
pub const LOCK_INFO_WORDS: usize = 7;
