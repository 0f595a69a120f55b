//! Factory for the cloneable bid proxy and allowance registry contracts.
//!
//! Contracts cannot instantiate contracts on this chain, so cloning works
//! with spare pools: blank instances are deployed from the two reference
//! modules, registered here, and handed out fully wired. The factory's
//! event log is the only discovery mechanism for configured clones.
#![cfg_attr(not(feature = "std"), no_std)]

mod contract;
mod events;
mod external;
mod state;
