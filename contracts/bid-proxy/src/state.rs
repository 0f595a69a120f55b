use commons::{AgentConfig, Authority, CustomContractError};
use concordium_std::*;

/// The contract state.
#[derive(Serial, DeserialWithState, StateClone)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Authority module: the admin tier releases won assets and rotates
    /// ownership, the maintainer tier reconfigures, claims and recovers.
    pub authority: Authority<S>,
    /// Factory this clone was deployed for. Only the factory may configure.
    pub factory: ContractAddress,
    /// Collaborator wiring and auction binding. `None` on a blank clone.
    pub config: Option<AgentConfig>,
    /// Set once the agent has placed a bid under the current configuration.
    /// Never resets: a settled agent is drained and retired, a new auction
    /// gets a fresh clone.
    pub engaged: bool,
}

impl<S: HasStateApi> State<S> {
    /// Create a blank, unconfigured agent.
    pub fn new(state_builder: &mut StateBuilder<S>, factory: ContractAddress) -> Self {
        State {
            authority: Authority::empty(state_builder),
            factory,
            config: None,
            engaged: false,
        }
    }

    /// Wire the clone: configuration plus the two role principals. Called
    /// exactly once, by the factory.
    pub fn configure(
        &mut self,
        config: AgentConfig,
        admin: Address,
        maintainer: Address,
    ) -> Result<(), CustomContractError> {
        ensure!(self.config.is_none(), CustomContractError::AlreadyInitialized);
        self.authority.grant_admin(admin);
        self.authority.grant_maintainer(maintainer);
        self.config = Some(config);
        Ok(())
    }

    /// Current configuration, owned so the borrow does not block host
    /// invocations.
    pub fn config(&self) -> Result<AgentConfig, CustomContractError> {
        self.config
            .clone()
            .ok_or(CustomContractError::NotInitialized)
    }
}
