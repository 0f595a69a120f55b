use super::*;

/// Raw amount in the smallest unit of an agent's funding asset: micro-CCD
/// when the asset is native, raw CIS-2 token units otherwise. Allowance
/// limits, bids and claims all use this unit.
pub type AssetAmount = u64;

/// Token identifier type shared by the suite.
pub type ContractTokenId = TokenIdVec;

/// Token amount type shared by the suite. Serialized as LEB128, so it is
/// wire compatible with smaller CIS-2 amount types.
pub type ContractTokenAmount = TokenAmountU64;

/// Committed digest of an off-chain allowance table. See the `merkle`
/// helpers for the exact commitment scheme.
pub type AllowanceRoot = [u8; 32];
