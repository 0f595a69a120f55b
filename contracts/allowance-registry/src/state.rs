use commons::{AllowanceRoot, Authority, CustomContractError};
use concordium_std::*;

/// The contract state.
#[derive(Serial, DeserialWithState, StateClone)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Authority module for administrative rights management.
    pub authority: Authority<S>,
    /// Factory this clone was deployed for. Only the factory may configure.
    pub factory: ContractAddress,
    /// Committed allowance table digest. `None` on a blank clone, immutable
    /// once set.
    pub root: Option<AllowanceRoot>,
}

impl<S: HasStateApi> State<S> {
    /// Create a blank, unconfigured registry.
    pub fn new(
        state_builder: &mut StateBuilder<S>,
        factory: ContractAddress,
        origin: AccountAddress,
    ) -> Self {
        State {
            authority: Authority::new(state_builder, Address::Account(origin)),
            factory,
            root: None,
        }
    }

    /// Commit the root. A registry is configured exactly once.
    pub fn configure(&mut self, root: AllowanceRoot) -> Result<(), CustomContractError> {
        ensure!(self.root.is_none(), CustomContractError::AlreadyInitialized);
        self.root = Some(root);
        Ok(())
    }
}
