//! Allowance registry: one committed digest of an off-chain
//! (account, spending limit) table, checked by inclusion proofs.
//!
//! A registry instance is immutable once configured. Changing anyone's
//! limit means committing a fresh table to a new clone and rebinding the
//! agents that should trust it.
#![cfg_attr(not(feature = "std"), no_std)]

mod contract;
mod state;
