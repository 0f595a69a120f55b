use super::*;

/// Two-tier privilege management shared by the contracts of the suite.
///
/// Admins release won assets and may rotate both tiers, including handing
/// the contract to a new admin. Maintainers reconfigure, claim and recover,
/// and may edit the maintainer tier only. Admin rights imply maintainer
/// rights; the converse never holds.
#[derive(Debug, Serial, DeserialWithState, StateClone)]
#[concordium(state_parameter = "S")]
pub struct Authority<S: HasStateApi> {
    admins: StateSet<Address, S>,
    maintainers: StateSet<Address, S>,
}

impl<S: HasStateApi> Authority<S> {
    pub fn new(state_builder: &mut StateBuilder<S>, admin: Address) -> Self {
        let mut admins = state_builder.new_set();
        admins.insert(admin);
        Self {
            admins,
            maintainers: state_builder.new_set(),
        }
    }

    /// An authority with no principals, for blank clones awaiting factory
    /// configuration.
    pub fn empty(state_builder: &mut StateBuilder<S>) -> Self {
        Self {
            admins: state_builder.new_set(),
            maintainers: state_builder.new_set(),
        }
    }

    /// Install an admin principal while wiring a clone. Regular updates go
    /// through [`Authority::handle_update`].
    pub fn grant_admin(&mut self, address: Address) {
        self.admins.insert(address);
    }

    /// Install a maintainer principal while wiring a clone.
    pub fn grant_maintainer(&mut self, address: Address) {
        self.maintainers.insert(address);
    }

    pub fn has_admin_rights(&self, address: &Address) -> bool {
        self.admins.contains(address)
    }

    pub fn has_maintainer_rights(&self, address: &Address) -> bool {
        self.maintainers.contains(address) || self.has_admin_rights(address)
    }

    pub fn handle_update(
        &mut self,
        sender: Address,
        update: AuthorityUpdateParams,
    ) -> Result<(), Reject> {
        let address_list = match update.field {
            AuthorityField::Maintainer => {
                ensure!(
                    self.has_maintainer_rights(&sender),
                    CustomContractError::Unauthorized.into()
                );
                &mut self.maintainers
            }
            AuthorityField::Admin => {
                ensure!(
                    self.has_admin_rights(&sender),
                    CustomContractError::Unauthorized.into()
                );
                &mut self.admins
            }
        };

        match update.kind {
            AuthorityUpdateKind::Remove => {
                address_list.remove(&update.address);
            }
            AuthorityUpdateKind::Add => {
                address_list.insert(update.address);
            }
        }

        Ok(())
    }

    pub fn handle_view(&self, view: AuthorityViewParams) -> Vec<Address> {
        let address_list = match view.field {
            AuthorityField::Maintainer => &self.maintainers,
            AuthorityField::Admin => &self.admins,
        };

        address_list
            .iter()
            .skip(view.skip as usize)
            .take(view.show as usize)
            .map(|a| *a)
            .collect()
    }
}

#[derive(Debug, SchemaType, Serialize)]
pub enum AuthorityField {
    Maintainer,
    Admin,
}

#[derive(Debug, SchemaType, Serialize)]
pub enum AuthorityUpdateKind {
    Remove,
    Add,
}

#[derive(Debug, SchemaType, Serialize)]
pub struct AuthorityUpdateParams {
    pub field: AuthorityField,
    pub kind: AuthorityUpdateKind,
    pub address: Address,
}

#[derive(Debug, SchemaType, Serialize)]
pub struct AuthorityViewParams {
    pub field: AuthorityField,
    pub skip: u32,
    pub show: u32,
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_std::test_infrastructure::*;

    const ADMIN: AccountAddress = AccountAddress([1; 32]);
    const MAINTAINER: AccountAddress = AccountAddress([2; 32]);
    const USER: AccountAddress = AccountAddress([16; 32]);

    fn default_authority() -> Authority<TestStateApi> {
        let mut state_builder = TestStateBuilder::new();
        let mut authority = Authority::new(&mut state_builder, Address::Account(ADMIN));
        authority.grant_maintainer(Address::Account(MAINTAINER));
        authority
    }

    #[concordium_test]
    fn test_admin_implies_maintainer() {
        let authority = default_authority();

        claim!(authority.has_admin_rights(&Address::Account(ADMIN)));
        claim!(authority.has_maintainer_rights(&Address::Account(ADMIN)));
        claim!(!authority.has_admin_rights(&Address::Account(MAINTAINER)));
        claim!(authority.has_maintainer_rights(&Address::Account(MAINTAINER)));
        claim!(!authority.has_maintainer_rights(&Address::Account(USER)));
    }

    #[concordium_test]
    fn test_admin_rotation() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(ADMIN),
            AuthorityUpdateParams {
                field: AuthorityField::Admin,
                kind: AuthorityUpdateKind::Add,
                address: Address::Account(USER),
            },
        );
        claim_eq!(result, Ok(()));
        claim!(authority.has_admin_rights(&Address::Account(USER)));

        let result = authority.handle_update(
            Address::Account(USER),
            AuthorityUpdateParams {
                field: AuthorityField::Admin,
                kind: AuthorityUpdateKind::Remove,
                address: Address::Account(ADMIN),
            },
        );
        claim_eq!(result, Ok(()));
        claim!(!authority.has_admin_rights(&Address::Account(ADMIN)));
        claim!(!authority.has_maintainer_rights(&Address::Account(ADMIN)));
    }

    #[concordium_test]
    fn test_maintainer_cannot_touch_admins() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(MAINTAINER),
            AuthorityUpdateParams {
                field: AuthorityField::Admin,
                kind: AuthorityUpdateKind::Add,
                address: Address::Account(USER),
            },
        );
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));
        claim!(!authority.has_admin_rights(&Address::Account(USER)));
    }

    #[concordium_test]
    fn test_maintainer_manages_maintainers() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(MAINTAINER),
            AuthorityUpdateParams {
                field: AuthorityField::Maintainer,
                kind: AuthorityUpdateKind::Add,
                address: Address::Account(USER),
            },
        );
        claim_eq!(result, Ok(()));
        claim!(authority.has_maintainer_rights(&Address::Account(USER)));

        let result = authority.handle_update(
            Address::Account(USER),
            AuthorityUpdateParams {
                field: AuthorityField::Maintainer,
                kind: AuthorityUpdateKind::Remove,
                address: Address::Account(MAINTAINER),
            },
        );
        claim_eq!(result, Ok(()));
        claim!(!authority.has_maintainer_rights(&Address::Account(MAINTAINER)));
    }

    #[concordium_test]
    fn test_unprivileged_update_rejected() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(USER),
            AuthorityUpdateParams {
                field: AuthorityField::Maintainer,
                kind: AuthorityUpdateKind::Add,
                address: Address::Account(USER),
            },
        );
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));
        claim!(!authority.has_maintainer_rights(&Address::Account(USER)));
    }

    #[concordium_test]
    fn test_view_lists_tier_members() {
        let mut authority = default_authority();
        authority.grant_maintainer(Address::Account(USER));

        let admins = authority.handle_view(AuthorityViewParams {
            field: AuthorityField::Admin,
            skip: 0,
            show: 10,
        });
        claim_eq!(admins, vec![Address::Account(ADMIN)]);

        let maintainers = authority.handle_view(AuthorityViewParams {
            field: AuthorityField::Maintainer,
            skip: 0,
            show: 10,
        });
        claim_eq!(maintainers.len(), 2);
        claim!(maintainers.contains(&Address::Account(MAINTAINER)));
        claim!(maintainers.contains(&Address::Account(USER)));
    }
}
