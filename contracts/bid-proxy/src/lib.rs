//! Proxy bidding agent for sealed/ascending NFT auctions.
//!
//! The agent holds its own funds and raises its own bid in one bound
//! auction on behalf of bidders whose spending limits are committed in an
//! allowance registry. It never stores per-bidder balances: every raise
//! re-proves the caller's limit against the registry bound at call time and
//! re-reads the live bid from the auction.
#![cfg_attr(not(feature = "std"), no_std)]

mod auction;
mod contract;
mod events;
mod external;
mod registry;
mod state;
mod token;
mod whitelist;
