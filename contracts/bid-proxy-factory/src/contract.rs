use commons::{
    AgentConfig, AllowanceRoot, AuthorityUpdateParams, AuthorityViewParams, ConfigureParams,
    CustomContractError,
};
use concordium_std::*;

use crate::events::FactoryEvent;
use crate::external::*;
use crate::state::State;

/// Initialize the factory. The deployer becomes the owning admin.
#[init(contract = "BidProxyFactory", parameter = "InitParams")]
fn contract_init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params = InitParams::deserial(&mut ctx.parameter_cursor())?;
    Ok(State::new(
        state_builder,
        params.whitelist,
        ctx.init_origin(),
    ))
}

/// Add blank clone instances to a spare pool.
///
/// Instances must be deployed from the matching reference module with this
/// factory as their bound factory; the factory trusts its maintainers on
/// that.
///
/// It rejects if:
/// - Fails to parse `RegisterInstancesParams`.
/// - Sender lacks maintainer rights.
#[receive(
    mutable,
    contract = "BidProxyFactory",
    name = "registerInstances",
    parameter = "RegisterInstancesParams"
)]
fn register_instances<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<()> {
    let params = RegisterInstancesParams::deserial(&mut ctx.parameter_cursor())?;
    let state = host.state_mut();

    ensure!(
        state.authority.has_maintainer_rights(&ctx.sender()),
        CustomContractError::Unauthorized.into()
    );

    let pool = match params.kind {
        InstanceKind::BidProxy => &mut state.spare_bid_proxies,
        InstanceKind::Registry => &mut state.spare_registries,
    };
    for instance in params.instances {
        pool.insert(instance);
    }

    Ok(())
}

/// Produce a configured allowance registry clone and announce its address.
/// Allowance limits are raised by committing a fresh table here and
/// rebinding agents to the result; committed roots never change in place.
///
/// It rejects if:
/// - Sender lacks maintainer rights.
/// - The registry spare pool is empty.
#[receive(
    mutable,
    contract = "BidProxyFactory",
    name = "newAllowanceRegistryClone",
    parameter = "NewRegistryParams",
    enable_logger
)]
fn new_allowance_registry_clone<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let params = NewRegistryParams::deserial(&mut ctx.parameter_cursor())?;

    ensure!(
        host.state().authority.has_maintainer_rights(&ctx.sender()),
        CustomContractError::Unauthorized.into()
    );

    let registry = host.state_mut().take_spare_registry()?;
    configure_registry(host, &registry, &params.root)?;

    logger.log(&FactoryEvent::new_allowance_registry(&registry, &params.root))?;

    Ok(())
}

/// Produce a fully wired bid proxy clone together with the registry it
/// trusts. The emitted announcements are the only discovery mechanism for
/// the new addresses.
///
/// It rejects if:
/// - Sender lacks maintainer rights.
/// - Either spare pool is empty.
#[receive(
    mutable,
    contract = "BidProxyFactory",
    name = "newBidProxyClone",
    parameter = "NewBidProxyParams",
    enable_logger
)]
fn new_bid_proxy_clone<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let params = NewBidProxyParams::deserial(&mut ctx.parameter_cursor())?;

    ensure!(
        host.state().authority.has_maintainer_rights(&ctx.sender()),
        CustomContractError::Unauthorized.into()
    );

    // Both instances leave the pools before any external call is made
    let registry = host.state_mut().take_spare_registry()?;
    let bid_proxy = host.state_mut().take_spare_bid_proxy()?;

    configure_registry(host, &registry, &params.root)?;

    let config = AgentConfig {
        registry,
        whitelist: host.state().whitelist,
        funding_asset: params.funding_asset,
        auction: params.auction,
        auction_key: params.auction_key,
    };
    host.invoke_contract(
        &bid_proxy,
        &ConfigureParams {
            config,
            admin: params.admin,
            maintainer: params.maintainer,
        },
        EntrypointName::new_unchecked("configure"),
        Amount::zero(),
    )
    .map_err(CustomContractError::from)?;

    logger.log(&FactoryEvent::new_allowance_registry(&registry, &params.root))?;
    logger.log(&FactoryEvent::new_bid_proxy(&bid_proxy))?;

    Ok(())
}

/// View the wired whitelist and the spare pool sizes.
#[receive(
    contract = "BidProxyFactory",
    name = "view",
    return_value = "ViewResult"
)]
fn view<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<ViewResult> {
    let state = host.state();
    Ok(ViewResult {
        whitelist: state.whitelist,
        spare_bid_proxies: state.spare_bid_proxies.iter().count() as u32,
        spare_registries: state.spare_registries.iter().count() as u32,
    })
}

/// Function to manage addresses that are allowed to maintain and modify the
/// state of the contract.
///
///  It rejects if:
///  - Fails to parse `AuthorityUpdateParams` parameters.
///  - If sender is neither one of the admins nor one of the maintainers.
#[receive(
    mutable,
    contract = "BidProxyFactory",
    name = "updateAuthority",
    parameter = "AuthorityUpdateParams"
)]
fn update_authority<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<()> {
    let state = host.state_mut();
    let params = AuthorityUpdateParams::deserial(&mut ctx.parameter_cursor())?;
    let sender = ctx.sender();
    state.authority.handle_update(sender, params)
}

/// Function to view addresses that are allowed to maintain and modify the
/// state of the contract.
#[receive(
    contract = "BidProxyFactory",
    name = "viewAuthority",
    parameter = "AuthorityViewParams",
    return_value = "Vec<Address>"
)]
fn view_authority<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Vec<Address>> {
    let params = AuthorityViewParams::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().authority.handle_view(params))
}

fn configure_registry<S: HasStateApi>(
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    registry: &ContractAddress,
    root: &AllowanceRoot,
) -> Result<(), CustomContractError> {
    host.invoke_contract(
        registry,
        root,
        EntrypointName::new_unchecked("configure"),
        Amount::zero(),
    )?;
    Ok(())
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use commons::test::parse_and_check_mock;
    use commons::{
        AuctionKey, ContractTokenId, TokenAsset, NEW_ALLOWANCE_REGISTRY_TAG, NEW_BID_PROXY_TAG,
    };
    use concordium_std::test_infrastructure::*;

    const WHITELIST: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const AUCTION: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };
    const COLLECTION: ContractAddress = ContractAddress {
        index: 3,
        subindex: 0,
    };
    const SPARE_REGISTRY: ContractAddress = ContractAddress {
        index: 20,
        subindex: 0,
    };
    const SPARE_PROXY: ContractAddress = ContractAddress {
        index: 30,
        subindex: 0,
    };

    const OWNER: AccountAddress = AccountAddress([1; 32]);
    const ADMIN: AccountAddress = AccountAddress([2; 32]);
    const MAINTAINER: AccountAddress = AccountAddress([3; 32]);
    const OUTSIDER: AccountAddress = AccountAddress([4; 32]);

    const ROOT: [u8; 32] = [17; 32];

    type FactoryHost = TestHost<State<TestStateApi>>;

    fn factory_host() -> FactoryHost {
        let mut ctx = TestInitContext::empty();
        let params = to_bytes(&InitParams {
            whitelist: WHITELIST,
        });
        ctx.set_init_origin(OWNER).set_parameter(&params);
        let mut state_builder = TestStateBuilder::new();

        let state = contract_init(&ctx, &mut state_builder)
            .expect_report("Failed during init_BidProxyFactory");
        TestHost::new(state, state_builder)
    }

    fn register(
        host: &mut FactoryHost,
        sender: AccountAddress,
        kind: InstanceKind,
        instances: Vec<ContractAddress>,
    ) -> ReceiveResult<()> {
        let params = to_bytes(&RegisterInstancesParams { kind, instances });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(sender)).set_parameter(&params);
        register_instances(&ctx, host)
    }

    fn stocked_host() -> FactoryHost {
        let mut host = factory_host();
        register(&mut host, OWNER, InstanceKind::Registry, vec![SPARE_REGISTRY])
            .expect_report("register registries failed");
        register(&mut host, OWNER, InstanceKind::BidProxy, vec![SPARE_PROXY])
            .expect_report("register proxies failed");
        host
    }

    fn new_bid_proxy_params() -> NewBidProxyParams {
        NewBidProxyParams {
            root: ROOT,
            funding_asset: Some(TokenAsset {
                contract: ContractAddress {
                    index: 9,
                    subindex: 0,
                },
                id: ContractTokenId(vec![0]),
            }),
            auction: AUCTION,
            auction_key: AuctionKey {
                collection: COLLECTION,
                item_id: ContractTokenId(vec![7]),
                start: Timestamp::from_timestamp_millis(1000),
            },
            admin: Address::Account(ADMIN),
            maintainer: Address::Account(MAINTAINER),
        }
    }

    #[concordium_test]
    fn test_register_instances_is_maintainer_only() {
        let mut host = factory_host();

        let result = register(
            &mut host,
            OUTSIDER,
            InstanceKind::Registry,
            vec![SPARE_REGISTRY],
        );
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));
        claim_eq!(host.state().spare_registries.iter().count(), 0);

        let result = register(
            &mut host,
            OWNER,
            InstanceKind::Registry,
            vec![SPARE_REGISTRY],
        );
        claim_eq!(result, Ok(()));
        claim_eq!(host.state().spare_registries.iter().count(), 1);
    }

    #[concordium_test]
    fn test_new_registry_clone() {
        let mut host = stocked_host();
        host.setup_mock_entrypoint(
            SPARE_REGISTRY,
            OwnedEntrypointName::new_unchecked("configure".into()),
            parse_and_check_mock::<[u8; 32], _>(|root| *root == ROOT, ()),
        );

        let params = to_bytes(&NewRegistryParams { root: ROOT });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(OWNER)).set_parameter(&params);
        let mut logger = TestLogger::init();
        claim_eq!(
            new_allowance_registry_clone(&ctx, &mut host, &mut logger),
            Ok(())
        );

        // The pool entry is consumed and the new address announced
        claim_eq!(host.state().spare_registries.iter().count(), 0);
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(logger.logs[0][0], NEW_ALLOWANCE_REGISTRY_TAG);
        claim!(logger
            .logs
            .contains(&to_bytes(&FactoryEvent::new_allowance_registry(
                &SPARE_REGISTRY,
                &ROOT
            ))));
    }

    #[concordium_test]
    fn test_new_bid_proxy_clone() {
        let mut host = stocked_host();
        host.setup_mock_entrypoint(
            SPARE_REGISTRY,
            OwnedEntrypointName::new_unchecked("configure".into()),
            parse_and_check_mock::<[u8; 32], _>(|root| *root == ROOT, ()),
        );
        // The agent must be wired to the popped registry and the factory's
        // whitelist, with the requested role principals
        host.setup_mock_entrypoint(
            SPARE_PROXY,
            OwnedEntrypointName::new_unchecked("configure".into()),
            parse_and_check_mock::<ConfigureParams, _>(
                |params| {
                    params.config.registry == SPARE_REGISTRY
                        && params.config.whitelist == WHITELIST
                        && params.config.auction == AUCTION
                        && params.admin == Address::Account(ADMIN)
                        && params.maintainer == Address::Account(MAINTAINER)
                },
                (),
            ),
        );

        let params = to_bytes(&new_bid_proxy_params());
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(OWNER)).set_parameter(&params);
        let mut logger = TestLogger::init();
        claim_eq!(new_bid_proxy_clone(&ctx, &mut host, &mut logger), Ok(()));

        claim_eq!(host.state().spare_registries.iter().count(), 0);
        claim_eq!(host.state().spare_bid_proxies.iter().count(), 0);
        claim_eq!(logger.logs.len(), 2);
        claim_eq!(logger.logs[0][0], NEW_ALLOWANCE_REGISTRY_TAG);
        claim_eq!(logger.logs[1][0], NEW_BID_PROXY_TAG);
        claim!(logger
            .logs
            .contains(&to_bytes(&FactoryEvent::new_bid_proxy(&SPARE_PROXY))));
    }

    #[concordium_test]
    fn test_creation_is_maintainer_only() {
        let mut host = stocked_host();

        let params = to_bytes(&new_bid_proxy_params());
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(OUTSIDER))
            .set_parameter(&params);
        let mut logger = TestLogger::init();
        let result = new_bid_proxy_clone(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));
        claim_eq!(host.state().spare_registries.iter().count(), 1);
        claim_eq!(host.state().spare_bid_proxies.iter().count(), 1);
    }

    #[concordium_test]
    fn test_empty_pool_rejects() {
        let mut host = factory_host();

        let params = to_bytes(&NewRegistryParams { root: ROOT });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(OWNER)).set_parameter(&params);
        let mut logger = TestLogger::init();
        let result = new_allowance_registry_clone(&ctx, &mut host, &mut logger);
        claim_eq!(
            result,
            Err(CustomContractError::InsufficientInstances.into())
        );

        // A stray registry alone is not enough for a full agent
        register(&mut host, OWNER, InstanceKind::Registry, vec![SPARE_REGISTRY])
            .expect_report("register failed");
        let params = to_bytes(&new_bid_proxy_params());
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(OWNER)).set_parameter(&params);
        let mut logger = TestLogger::init();
        let result = new_bid_proxy_clone(&ctx, &mut host, &mut logger);
        claim_eq!(
            result,
            Err(CustomContractError::InsufficientInstances.into())
        );
    }

    #[concordium_test]
    fn test_view() {
        let host = stocked_host();
        let ctx = TestReceiveContext::empty();

        let result = view(&ctx, &host).expect_report("view failed");
        claim_eq!(result.whitelist, WHITELIST);
        claim_eq!(result.spare_bid_proxies, 1);
        claim_eq!(result.spare_registries, 1);
    }
}
