use commons::{AllowanceRoot, AuctionKey, TokenAsset};
use concordium_std::*;

#[derive(Debug, Serialize, SchemaType)]
pub struct InitParams {
    /// Whitelist gate wired into every bid proxy this factory configures.
    pub whitelist: ContractAddress,
}

/// Spare pool selector.
#[derive(Debug, Clone, Copy, Serialize, SchemaType)]
pub enum InstanceKind {
    BidProxy,
    Registry,
}

/// Parameter of the `registerInstances` entrypoint.
#[derive(Debug, Serialize, SchemaType)]
pub struct RegisterInstancesParams {
    pub kind: InstanceKind,
    /// Blank instances deployed from the matching reference module with
    /// this factory as their bound factory.
    pub instances: Vec<ContractAddress>,
}

/// Parameter of the `newBidProxyClone` entrypoint.
#[derive(Debug, Serialize, SchemaType)]
pub struct NewBidProxyParams {
    /// Allowance root for the fresh registry the new agent trusts.
    pub root: AllowanceRoot,
    /// Funding asset of the new agent. `None` bids native CCD.
    pub funding_asset: Option<TokenAsset>,
    /// Auction contract the agent will bid in.
    pub auction: ContractAddress,
    /// Auction the agent is bound to.
    pub auction_key: AuctionKey,
    /// Principal that may release won assets and rotate ownership.
    pub admin: Address,
    /// Principal that may reconfigure, claim and recover.
    pub maintainer: Address,
}

/// Parameter of the `newAllowanceRegistryClone` entrypoint.
#[derive(Debug, Serialize, SchemaType)]
pub struct NewRegistryParams {
    pub root: AllowanceRoot,
}

/// Return value of the `view` entrypoint.
#[derive(Debug, Serialize, SchemaType)]
pub struct ViewResult {
    pub whitelist: ContractAddress,
    pub spare_bid_proxies: u32,
    pub spare_registries: u32,
}
