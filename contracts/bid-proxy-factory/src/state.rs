use commons::{Authority, CustomContractError};
use concordium_std::*;

/// The contract state.
#[derive(Serial, DeserialWithState, StateClone)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Authority module: the owning admin may be rotated.
    pub authority: Authority<S>,
    /// Whitelist gate wired into every bid proxy this factory configures.
    pub whitelist: ContractAddress,
    /// Blank bid proxy instances awaiting configuration.
    pub spare_bid_proxies: StateSet<ContractAddress, S>,
    /// Blank allowance registry instances awaiting configuration.
    pub spare_registries: StateSet<ContractAddress, S>,
}

impl<S: HasStateApi> State<S> {
    pub fn new(
        state_builder: &mut StateBuilder<S>,
        whitelist: ContractAddress,
        origin: AccountAddress,
    ) -> Self {
        State {
            authority: Authority::new(state_builder, Address::Account(origin)),
            whitelist,
            spare_bid_proxies: state_builder.new_set(),
            spare_registries: state_builder.new_set(),
        }
    }

    /// Take one blank registry out of the spare pool.
    pub fn take_spare_registry(&mut self) -> Result<ContractAddress, CustomContractError> {
        take_spare(&mut self.spare_registries)
    }

    /// Take one blank bid proxy out of the spare pool.
    pub fn take_spare_bid_proxy(&mut self) -> Result<ContractAddress, CustomContractError> {
        take_spare(&mut self.spare_bid_proxies)
    }
}

fn take_spare<S: HasStateApi>(
    pool: &mut StateSet<ContractAddress, S>,
) -> Result<ContractAddress, CustomContractError> {
    let instance = pool.iter().next().map(|a| *a);
    match instance {
        Some(instance) => {
            pool.remove(&instance);
            Ok(instance)
        }
        None => Err(CustomContractError::InsufficientInstances),
    }
}
