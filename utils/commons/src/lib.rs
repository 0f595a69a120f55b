//! Shared types and helpers for the proxy-bid contract suite.
#![cfg_attr(not(feature = "std"), no_std)]
pub use crate::{authority::*, constants::*, errors::*, merkle::*, structs::*, types::*};
use concordium_cis2::*;
use concordium_std::*;

#[cfg(not(target_arch = "wasm32"))]
pub mod test;

mod authority;
mod constants;
mod errors;
mod merkle;
mod structs;
mod types;
