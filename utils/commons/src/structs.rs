//! Wire types shared between the contracts of the suite, plus the parameter
//! types of the external collaborators the suite consumes.
//!
//! The auction contract is consumed through four entrypoints, all keyed by
//! [`AuctionKey`]:
//!
//! * `bid`: payable; the attached CCD raises the caller's total bid. The
//!   auction enforces the start/deadline window, the minimum bid and
//!   strictly increasing per-bidder totals.
//! * `bidToken`: CIS-2 receive hook for token funded auctions; the
//!   transferred amount is the raise and the serialized [`AuctionKey`]
//!   rides in the transfer data.
//! * `getBid`: read only; the caller-visible total for one bidder, zeroed
//!   by finalization for the winner and by withdrawal for losers.
//! * `withdraw`: post-finalize refund of a losing bidder's escrow. A
//!   contract bidder receives CCD through its payable `deposit` entrypoint
//!   and tokens through its CIS-2 hook.
//!
//! `finalize` is role gated on the auction side and never invoked by this
//! suite; its parameter type is published here for integrators. The
//! whitelist gate is consumed through a single read only entrypoint,
//! `isWhitelisted`, taking an `Address` and returning a `bool`.

use super::*;

/// A CIS-2 token: contract instance plus token identifier within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SchemaType)]
pub struct TokenAsset {
    pub contract: ContractAddress,
    pub id: ContractTokenId,
}

/// Key under which the auction contract tracks a single auction. One
/// auction exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SchemaType)]
pub struct AuctionKey {
    /// NFT collection contract holding the auctioned item.
    pub collection: ContractAddress,
    /// Identifier of the auctioned item within the collection.
    pub item_id: ContractTokenId,
    /// Scheduled start time of the auction.
    pub start: Timestamp,
}

/// Full configuration of one bid proxy: the collaborators it trusts and the
/// auction it is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SchemaType)]
pub struct AgentConfig {
    /// Allowance registry spending limits are verified against.
    pub registry: ContractAddress,
    /// Whitelist gate consulted before any fund moving action.
    pub whitelist: ContractAddress,
    /// Funding asset used for bids. `None` bids native CCD.
    pub funding_asset: Option<TokenAsset>,
    /// Auction contract the agent bids in.
    pub auction: ContractAddress,
    /// Auction the agent is bound to within the auction contract.
    pub auction_key: AuctionKey,
}

/// Parameter of the cloneable contracts' one-shot `configure` entrypoint on
/// a blank bid proxy.
#[derive(Debug, Clone, Serialize, SchemaType)]
pub struct ConfigureParams {
    pub config: AgentConfig,
    /// Principal that may release won assets and rotate ownership.
    pub admin: Address,
    /// Principal that may reconfigure, claim and recover.
    pub maintainer: Address,
}

/// Parameter of the registry `verify` entrypoint.
#[derive(Debug, Clone, Serialize, SchemaType)]
pub struct VerifyParams {
    /// Account whose spending authorization is claimed.
    pub account: AccountAddress,
    /// Claimed maximum cumulative spend for `account`.
    pub allowance: AssetAmount,
    /// Inclusion proof for the `(account, allowance)` leaf.
    pub proof: AllowanceProof,
}

/// Parameter of the auction `getBid` query.
#[derive(Debug, Clone, Serialize, SchemaType)]
pub struct GetBidParams {
    pub key: AuctionKey,
    pub bidder: Address,
}

/// Parameter of the auction `finalize` entrypoint. Published for
/// integrators; the proxy only ever observes its effects through `getBid`
/// and asset ownership.
#[derive(Debug, Clone, Serialize, SchemaType)]
pub struct FinalizeParams {
    pub key: AuctionKey,
    pub winner: Address,
    pub payout_addresses: Vec<AccountAddress>,
    pub payout_amounts: Vec<AssetAmount>,
}
