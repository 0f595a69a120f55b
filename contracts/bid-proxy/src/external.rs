use commons::{AgentConfig, AllowanceProof, AssetAmount, ContractTokenAmount, TokenAsset};
use concordium_std::*;

#[derive(Debug, Serialize, SchemaType)]
pub struct InitParams {
    /// Factory allowed to configure this clone.
    pub factory: ContractAddress,
}

/// Parameter of the `proxyBid` entrypoint.
#[derive(Debug, Serialize, SchemaType)]
pub struct ProxyBidParams {
    /// Inclusion proof for `(account, allowance)` under the bound registry
    /// root.
    pub proof: AllowanceProof,
    /// Account whose spending authorization is exercised.
    pub account: AccountAddress,
    /// Maximum cumulative spend committed for `account`.
    pub allowance: AssetAmount,
    /// Requested new total bid of this agent.
    pub bid: AssetAmount,
}

#[derive(Debug, Serialize, SchemaType)]
pub struct RecoverCcdParams {
    pub recipient: AccountAddress,
    pub amount: Amount,
}

#[derive(Debug, Serialize, SchemaType)]
pub struct RecoverTokensParams {
    pub token: TokenAsset,
    pub recipient: AccountAddress,
    pub amount: ContractTokenAmount,
}

/// Return value of the `view` entrypoint.
#[derive(Debug, Serialize, SchemaType)]
pub struct ViewResult {
    pub config: Option<AgentConfig>,
    pub engaged: bool,
}
