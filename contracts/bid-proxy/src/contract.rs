use commons::{
    AgentConfig, AuthorityUpdateParams, AuthorityViewParams, ConfigureParams,
    ContractTokenAmount, ContractTokenId, CustomContractError, TokenAsset,
};
use concordium_cis2::{AdditionalData, OnReceivingCis2Params, Receiver};
use concordium_std::*;

use crate::auction;
use crate::events::ProxyEvent;
use crate::external::*;
use crate::registry;
use crate::state::State;
use crate::token;
use crate::whitelist;

/// Deploy a blank agent clone bound to its factory. The factory wires the
/// configuration and the role principals through `configure`.
#[init(contract = "AuctionBidProxy", parameter = "InitParams")]
fn contract_init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params = InitParams::deserial(&mut ctx.parameter_cursor())?;
    Ok(State::new(state_builder, params.factory))
}

/// Wire a blank clone: auction binding, collaborators and role principals.
///
/// It rejects if:
/// - Sender is not the factory this clone was deployed for.
/// - The clone was already configured.
#[receive(
    mutable,
    contract = "AuctionBidProxy",
    name = "configure",
    parameter = "ConfigureParams"
)]
fn contract_configure<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<()> {
    let params = ConfigureParams::deserial(&mut ctx.parameter_cursor())?;
    let state = host.state_mut();

    ensure!(
        ctx.sender().matches_contract(&state.factory),
        CustomContractError::FactoryOnly.into()
    );
    state.configure(params.config, params.admin, params.maintainer)?;

    Ok(())
}

/// Raise this agent's bid in the bound auction on behalf of an authorized
/// bidder.
///
/// The caller supplies an inclusion proof for `(account, allowance)` under
/// the registry bound at call time; approvals observed before a registry
/// rebind are worthless. The requested amount is the agent's new total:
/// the agent reads its live bid from the auction and moves only the
/// difference, so competing raises ordered in between are observed, never
/// overwritten.
///
/// It rejects if:
/// - The clone is not configured.
/// - `account` fails the whitelist gate.
/// - The proof does not verify under the bound registry.
/// - The requested total exceeds the proven allowance
///   (insufficient loan allowance).
/// - The requested total does not exceed the agent's current bid.
/// - The increment is not covered by the agent's liquid funding balance.
/// - The auction refuses the raise (window, minimum, monotonicity).
#[receive(
    mutable,
    contract = "AuctionBidProxy",
    name = "proxyBid",
    parameter = "ProxyBidParams",
    enable_logger
)]
fn contract_proxy_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let params = ProxyBidParams::deserial(&mut ctx.parameter_cursor())?;
    let config = host.state().config()?;

    ensure!(
        whitelist::is_whitelisted(host, &config.whitelist, &Address::Account(params.account))?,
        CustomContractError::NotWhitelisted.into()
    );
    ensure!(
        registry::verify(
            host,
            &config.registry,
            params.account,
            params.allowance,
            params.proof,
        )?,
        CustomContractError::InvalidAllowanceProof.into()
    );
    ensure!(
        params.bid <= params.allowance,
        CustomContractError::InsufficientLoanAllowance.into()
    );

    let this = Address::Contract(ctx.self_address());
    let current = auction::get_bid(host, &config.auction, &config.auction_key, this)?;
    ensure!(params.bid > current, CustomContractError::BidTooLow.into());
    let increment = params.bid - current;

    match &config.funding_asset {
        None => {
            ensure!(
                increment <= host.self_balance().micro_ccd,
                CustomContractError::InsufficientFunds.into()
            );
            host.state_mut().engaged = true;
            auction::bid_ccd(
                host,
                &config.auction,
                &config.auction_key,
                Amount::from_micro_ccd(increment),
            )?;
            logger.log(&ProxyEvent::proxy_bid_ccd(&params.account, params.bid))?;
        }
        Some(funding_token) => {
            let balance = token::balance_of(host, funding_token, this)?;
            ensure!(
                increment <= balance.0,
                CustomContractError::InsufficientFunds.into()
            );
            host.state_mut().engaged = true;
            token::transfer(
                host,
                funding_token,
                this,
                Receiver::Contract(
                    config.auction,
                    OwnedEntrypointName::new_unchecked("bidToken".into()),
                ),
                ContractTokenAmount(increment),
                AdditionalData::from(to_bytes(&config.auction_key)),
            )?;
            logger.log(&ProxyEvent::proxy_bid_token(&params.account, params.bid))?;
        }
    }

    Ok(())
}

/// Rebind the agent to a different allowance registry. Allowed at any time,
/// including while a bid is live: this is how an authorized bidder's limit
/// is raised mid-auction without touching the auction binding.
///
/// It rejects if:
/// - Sender lacks maintainer rights.
/// - The clone is not configured.
#[receive(
    mutable,
    contract = "AuctionBidProxy",
    name = "updateAllowanceRegistry",
    parameter = "ContractAddress",
    enable_logger
)]
fn update_allowance_registry<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let new_registry = ContractAddress::deserial(&mut ctx.parameter_cursor())?;
    let state = host.state_mut();

    ensure!(
        state.authority.has_maintainer_rights(&ctx.sender()),
        CustomContractError::Unauthorized.into()
    );
    match state.config.as_mut() {
        Some(config) => config.registry = new_registry,
        None => bail!(CustomContractError::NotInitialized.into()),
    }

    logger.log(&ProxyEvent::registry_updated(&new_registry))?;

    Ok(())
}

/// Replace the whole configuration: registry, gate, funding asset and
/// auction binding.
///
/// It rejects if:
/// - Sender lacks maintainer rights.
/// - The clone is not configured.
/// - The agent already bid under the current configuration (already in
///   progress): re-targeting with funds escrowed in the old auction would
///   leave the two inconsistent.
#[receive(
    mutable,
    contract = "AuctionBidProxy",
    name = "updateFullConfig",
    parameter = "AgentConfig",
    enable_logger
)]
fn update_full_config<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let new_config = AgentConfig::deserial(&mut ctx.parameter_cursor())?;

    let state = host.state();
    ensure!(
        state.authority.has_maintainer_rights(&ctx.sender()),
        CustomContractError::Unauthorized.into()
    );
    ensure!(
        state.config.is_some(),
        CustomContractError::NotInitialized.into()
    );
    ensure!(!state.engaged, CustomContractError::AlreadyInProgress.into());

    logger.log(&ProxyEvent::config_updated(&new_config))?;
    host.state_mut().config = Some(new_config);

    Ok(())
}

/// Pull this agent's escrowed bid back from the auction after losing a
/// finalized auction.
///
/// The claimable amount is read live from the auction, so repeated calls
/// never double credit: once withdrawn, or when the agent won and holds the
/// asset instead of a refund, the auction reports zero and the call rejects
/// cleanly.
///
/// It rejects if:
/// - Sender lacks maintainer rights.
/// - The clone is not configured.
/// - The auction holds no claimable bid for this agent.
/// - The auction refuses the withdrawal.
#[receive(
    mutable,
    contract = "AuctionBidProxy",
    name = "claimAndWithdrawBidFromAuction",
    enable_logger
)]
fn claim_and_withdraw_bid_from_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let state = host.state();
    ensure!(
        state.authority.has_maintainer_rights(&ctx.sender()),
        CustomContractError::Unauthorized.into()
    );
    let config = state.config()?;

    let this = Address::Contract(ctx.self_address());
    let claimable = auction::get_bid(host, &config.auction, &config.auction_key, this)?;
    ensure!(claimable > 0, CustomContractError::NothingToClaim.into());

    auction::withdraw(host, &config.auction, &config.auction_key)?;

    match config.funding_asset {
        None => logger.log(&ProxyEvent::ccd_bid_claimed(claimable))?,
        Some(_) => logger.log(&ProxyEvent::token_bid_claimed(claimable))?,
    }

    Ok(())
}

/// Hand the won NFT over to the designated recipient.
///
/// It rejects if:
/// - Sender lacks admin rights.
/// - The clone is not configured.
/// - The agent does not currently hold the auctioned NFT; the collection
///   contract refuses the transfer.
#[receive(
    mutable,
    contract = "AuctionBidProxy",
    name = "forwardNftToWinner",
    parameter = "AccountAddress",
    enable_logger
)]
fn forward_nft_to_winner<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let recipient = AccountAddress::deserial(&mut ctx.parameter_cursor())?;
    let state = host.state();

    ensure!(
        state.authority.has_admin_rights(&ctx.sender()),
        CustomContractError::Unauthorized.into()
    );
    let config = state.config()?;

    let nft = TokenAsset {
        contract: config.auction_key.collection,
        id: config.auction_key.item_id,
    };
    token::transfer(
        host,
        &nft,
        Address::Contract(ctx.self_address()),
        Receiver::Account(recipient),
        ContractTokenAmount(1),
        AdditionalData::empty(),
    )?;

    logger.log(&ProxyEvent::nft_forwarded(&nft.contract, &nft.id, &recipient))?;

    Ok(())
}

/// Sweep stray CCD out of the agent, typically after settlement or to
/// correct over-funding. No auction-state precondition.
///
/// It rejects if:
/// - Sender lacks maintainer rights.
/// - The agent balance does not cover the requested amount.
#[receive(
    mutable,
    contract = "AuctionBidProxy",
    name = "recoverCcd",
    parameter = "RecoverCcdParams",
    enable_logger
)]
fn recover_ccd<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let params = RecoverCcdParams::deserial(&mut ctx.parameter_cursor())?;

    ensure!(
        host.state().authority.has_maintainer_rights(&ctx.sender()),
        CustomContractError::Unauthorized.into()
    );

    logger.log(&ProxyEvent::ccd_recovered(&params.recipient, params.amount))?;
    host.invoke_transfer(&params.recipient, params.amount)
        .map_err(CustomContractError::from)?;

    Ok(())
}

/// Sweep stray CIS-2 tokens out of the agent. No auction-state
/// precondition.
///
/// It rejects if:
/// - Sender lacks maintainer rights.
/// - The token contract refuses the transfer.
#[receive(
    mutable,
    contract = "AuctionBidProxy",
    name = "recoverTokens",
    parameter = "RecoverTokensParams",
    enable_logger
)]
fn recover_tokens<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let params = RecoverTokensParams::deserial(&mut ctx.parameter_cursor())?;

    ensure!(
        host.state().authority.has_maintainer_rights(&ctx.sender()),
        CustomContractError::Unauthorized.into()
    );

    logger.log(&ProxyEvent::tokens_recovered(
        &params.token,
        &params.recipient,
        params.amount,
    ))?;
    token::transfer(
        host,
        &params.token,
        Address::Contract(ctx.self_address()),
        Receiver::Account(params.recipient),
        params.amount,
        AdditionalData::empty(),
    )?;

    Ok(())
}

/// Accept CCD funding for future bids. Anyone may top the agent up.
#[receive(mutable, payable, contract = "AuctionBidProxy", name = "deposit")]
fn deposit<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    _host: &mut impl HasHost<State<S>, StateApiType = S>,
    _amount: Amount,
) -> ReceiveResult<()> {
    Ok(())
}

/// CIS-2 receive hook: accepts token top ups and auction refunds.
#[receive(
    mutable,
    contract = "AuctionBidProxy",
    name = "onReceivingCis2",
    parameter = "OnReceivingCis2Params<ContractTokenId, ContractTokenAmount>"
)]
fn on_receiving_cis2<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    _host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<()> {
    // CIS-2 transfers are always delivered by the token contract
    if let Address::Contract(_) = ctx.sender() {
        let _params = OnReceivingCis2Params::<ContractTokenId, ContractTokenAmount>::deserial(
            &mut ctx.parameter_cursor(),
        )?;
        Ok(())
    } else {
        bail!(CustomContractError::ContractOnly.into())
    }
}

/// View the agent configuration and engagement flag.
#[receive(contract = "AuctionBidProxy", name = "view", return_value = "ViewResult")]
fn view<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<ViewResult> {
    let state = host.state();
    Ok(ViewResult {
        config: state.config.clone(),
        engaged: state.engaged,
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
    contract = "AuctionBidProxy",
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
    contract = "AuctionBidProxy",
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

#[concordium_cfg_test]
mod tests {
    use super::*;
    use commons::test::{parse_and_check_mock, parse_and_ok_mock};
    use commons::{
        AllowanceProof, AssetAmount, AuctionKey, GetBidParams, CCD_BID_CLAIMED_TAG,
        PROXY_BID_CCD_TAG, PROXY_BID_TOKEN_TAG,
    };
    use concordium_cis2::TransferParams;
    use concordium_std::test_infrastructure::*;

    const FACTORY: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const REGISTRY: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };
    const REGISTRY_2: ContractAddress = ContractAddress {
        index: 3,
        subindex: 0,
    };
    const WHITELIST: ContractAddress = ContractAddress {
        index: 4,
        subindex: 0,
    };
    const AUCTION: ContractAddress = ContractAddress {
        index: 5,
        subindex: 0,
    };
    const COLLECTION: ContractAddress = ContractAddress {
        index: 6,
        subindex: 0,
    };
    const FUNDING_TOKEN: ContractAddress = ContractAddress {
        index: 7,
        subindex: 0,
    };
    const SELF_ADDRESS: ContractAddress = ContractAddress {
        index: 10,
        subindex: 0,
    };

    const ADMIN: AccountAddress = AccountAddress([1; 32]);
    const MAINTAINER: AccountAddress = AccountAddress([2; 32]);
    const BIDDER: AccountAddress = AccountAddress([3; 32]);
    const OUTSIDER: AccountAddress = AccountAddress([4; 32]);
    const RECIPIENT: AccountAddress = AccountAddress([5; 32]);

    type ProxyHost = TestHost<State<TestStateApi>>;

    fn funding_token() -> TokenAsset {
        TokenAsset {
            contract: FUNDING_TOKEN,
            id: ContractTokenId(vec![0]),
        }
    }

    fn agent_config(funding_asset: Option<TokenAsset>) -> AgentConfig {
        AgentConfig {
            registry: REGISTRY,
            whitelist: WHITELIST,
            funding_asset,
            auction: AUCTION,
            auction_key: AuctionKey {
                collection: COLLECTION,
                item_id: ContractTokenId(vec![7]),
                start: Timestamp::from_timestamp_millis(1000),
            },
        }
    }

    fn blank_host() -> ProxyHost {
        let mut ctx = TestInitContext::empty();
        let params = to_bytes(&InitParams { factory: FACTORY });
        ctx.set_init_origin(ADMIN).set_parameter(&params);
        let mut state_builder = TestStateBuilder::new();

        let state =
            contract_init(&ctx, &mut state_builder).expect_report("Failed during init");
        TestHost::new(state, state_builder)
    }

    fn configured_host(funding_asset: Option<TokenAsset>) -> ProxyHost {
        let mut host = blank_host();
        let params = to_bytes(&ConfigureParams {
            config: agent_config(funding_asset),
            admin: Address::Account(ADMIN),
            maintainer: Address::Account(MAINTAINER),
        });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Contract(FACTORY))
            .set_parameter(&params);
        contract_configure(&ctx, &mut host).expect_report("Failed during configure");
        host
    }

    fn mock_gate(host: &mut ProxyHost, allowed: bool) {
        host.setup_mock_entrypoint(
            WHITELIST,
            OwnedEntrypointName::new_unchecked("isWhitelisted".into()),
            parse_and_ok_mock::<Address, _>(allowed),
        );
    }

    fn mock_registry(host: &mut ProxyHost, registry: ContractAddress, verdict: bool) {
        host.setup_mock_entrypoint(
            registry,
            OwnedEntrypointName::new_unchecked("verify".into()),
            parse_and_ok_mock::<commons::VerifyParams, _>(verdict),
        );
    }

    fn mock_current_bid(host: &mut ProxyHost, amount: AssetAmount) {
        host.setup_mock_entrypoint(
            AUCTION,
            OwnedEntrypointName::new_unchecked("getBid".into()),
            parse_and_ok_mock::<GetBidParams, _>(amount),
        );
    }

    fn mock_auction_accepts_raise(host: &mut ProxyHost) {
        host.setup_mock_entrypoint(
            AUCTION,
            OwnedEntrypointName::new_unchecked("bid".into()),
            parse_and_ok_mock::<AuctionKey, _>(()),
        );
    }

    fn proxy_bid(
        host: &mut ProxyHost,
        account: AccountAddress,
        allowance: AssetAmount,
        bid: AssetAmount,
    ) -> (ReceiveResult<()>, TestLogger) {
        let params = to_bytes(&ProxyBidParams {
            proof: AllowanceProof { steps: Vec::new() },
            account,
            allowance,
            bid,
        });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(account))
            .set_self_address(SELF_ADDRESS)
            .set_parameter(&params);
        let mut logger = TestLogger::init();
        let result = contract_proxy_bid(&ctx, host, &mut logger);
        (result, logger)
    }

    #[concordium_test]
    fn test_configure_is_factory_only_and_one_shot() {
        let mut host = blank_host();
        let params = to_bytes(&ConfigureParams {
            config: agent_config(None),
            admin: Address::Account(ADMIN),
            maintainer: Address::Account(MAINTAINER),
        });

        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(OUTSIDER))
            .set_parameter(&params);
        let result = contract_configure(&ctx, &mut host);
        claim_eq!(result, Err(CustomContractError::FactoryOnly.into()));

        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Contract(FACTORY))
            .set_parameter(&params);
        claim_eq!(contract_configure(&ctx, &mut host), Ok(()));
        claim!(!host.state().engaged);
        claim!(host
            .state()
            .authority
            .has_admin_rights(&Address::Account(ADMIN)));
        claim!(host
            .state()
            .authority
            .has_maintainer_rights(&Address::Account(MAINTAINER)));
        claim!(!host
            .state()
            .authority
            .has_admin_rights(&Address::Account(MAINTAINER)));

        let result = contract_configure(&ctx, &mut host);
        claim_eq!(result, Err(CustomContractError::AlreadyInitialized.into()));
    }

    #[concordium_test]
    fn test_proxy_bid_ccd() {
        let mut host = configured_host(None);
        mock_gate(&mut host, true);
        mock_registry(&mut host, REGISTRY, true);
        mock_current_bid(&mut host, 0);
        mock_auction_accepts_raise(&mut host);
        host.set_self_balance(Amount::from_micro_ccd(100));

        let (result, logger) = proxy_bid(&mut host, BIDDER, 100, 5);
        claim_eq!(result, Ok(()));
        claim!(host.state().engaged);
        claim_eq!(logger.logs.len(), 1);
        claim!(logger
            .logs
            .contains(&to_bytes(&ProxyEvent::proxy_bid_ccd(&BIDDER, 5))));
        claim_eq!(logger.logs[0][0], PROXY_BID_CCD_TAG);
    }

    #[concordium_test]
    fn test_proxy_bid_requires_whitelisting() {
        let mut host = configured_host(None);
        mock_gate(&mut host, false);
        mock_registry(&mut host, REGISTRY, true);
        mock_current_bid(&mut host, 0);
        host.set_self_balance(Amount::from_micro_ccd(100));

        let (result, _) = proxy_bid(&mut host, BIDDER, 100, 5);
        claim_eq!(result, Err(CustomContractError::NotWhitelisted.into()));
        claim!(!host.state().engaged);
    }

    #[concordium_test]
    fn test_proxy_bid_requires_valid_proof() {
        let mut host = configured_host(None);
        mock_gate(&mut host, true);
        mock_registry(&mut host, REGISTRY, false);
        mock_current_bid(&mut host, 0);
        host.set_self_balance(Amount::from_micro_ccd(100));

        let (result, _) = proxy_bid(&mut host, BIDDER, 100, 5);
        claim_eq!(
            result,
            Err(CustomContractError::InvalidAllowanceProof.into())
        );
        claim!(!host.state().engaged);
    }

    #[concordium_test]
    fn test_proxy_bid_caps_at_proven_allowance() {
        let mut host = configured_host(None);
        mock_gate(&mut host, true);
        mock_registry(&mut host, REGISTRY, true);
        mock_current_bid(&mut host, 0);
        host.set_self_balance(Amount::from_micro_ccd(1_000_000));

        let (result, _) = proxy_bid(&mut host, BIDDER, 100, 101);
        claim_eq!(
            result,
            Err(CustomContractError::InsufficientLoanAllowance.into())
        );
        claim!(!host.state().engaged);
    }

    #[concordium_test]
    fn test_proxy_bid_caps_at_own_balance() {
        let mut host = configured_host(None);
        mock_gate(&mut host, true);
        mock_registry(&mut host, REGISTRY, true);
        mock_current_bid(&mut host, 0);
        host.set_self_balance(Amount::from_micro_ccd(3));

        let (result, _) = proxy_bid(&mut host, BIDDER, 100, 5);
        claim_eq!(result, Err(CustomContractError::InsufficientFunds.into()));
        claim!(!host.state().engaged);
    }

    #[concordium_test]
    fn test_proxy_bid_moves_only_the_increment() {
        let mut host = configured_host(None);
        mock_gate(&mut host, true);
        mock_registry(&mut host, REGISTRY, true);
        mock_current_bid(&mut host, 10);
        mock_auction_accepts_raise(&mut host);
        // Enough for the 2 unit raise, far below the 12 unit total
        host.set_self_balance(Amount::from_micro_ccd(2));

        let (result, _) = proxy_bid(&mut host, BIDDER, 100, 12);
        claim_eq!(result, Ok(()));
        claim!(host.state().engaged);
    }

    #[concordium_test]
    fn test_proxy_bid_must_exceed_current_bid() {
        let mut host = configured_host(None);
        mock_gate(&mut host, true);
        mock_registry(&mut host, REGISTRY, true);
        mock_current_bid(&mut host, 10);
        host.set_self_balance(Amount::from_micro_ccd(100));

        let (result, _) = proxy_bid(&mut host, BIDDER, 100, 10);
        claim_eq!(result, Err(CustomContractError::BidTooLow.into()));
        claim!(!host.state().engaged);
    }

    #[concordium_test]
    fn test_proxy_bid_token() {
        let mut host = configured_host(Some(funding_token()));
        mock_gate(&mut host, true);
        mock_registry(&mut host, REGISTRY, true);
        mock_current_bid(&mut host, 5);
        host.setup_mock_entrypoint(
            FUNDING_TOKEN,
            OwnedEntrypointName::new_unchecked("balanceOf".into()),
            parse_and_ok_mock::<concordium_cis2::BalanceOfQueryParams<ContractTokenId>, _>(
                concordium_cis2::BalanceOfQueryResponse(vec![ContractTokenAmount(50)]),
            ),
        );
        // The transfer must move the 5 unit increment to the auction's
        // bidToken hook
        host.setup_mock_entrypoint(
            FUNDING_TOKEN,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            parse_and_check_mock::<TransferParams<ContractTokenId, ContractTokenAmount>, _>(
                |params| {
                    params.0.len() == 1
                        && params.0[0].amount == ContractTokenAmount(5)
                        && params.0[0].from == Address::Contract(SELF_ADDRESS)
                },
                (),
            ),
        );

        let (result, logger) = proxy_bid(&mut host, BIDDER, 100, 10);
        claim_eq!(result, Ok(()));
        claim!(host.state().engaged);
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(logger.logs[0][0], PROXY_BID_TOKEN_TAG);
    }

    #[concordium_test]
    fn test_registry_rebind_mid_auction() {
        let mut host = configured_host(None);
        mock_gate(&mut host, true);
        mock_registry(&mut host, REGISTRY, true);
        mock_current_bid(&mut host, 0);
        mock_auction_accepts_raise(&mut host);
        host.set_self_balance(Amount::from_micro_ccd(1000));

        let (result, _) = proxy_bid(&mut host, BIDDER, 100, 5);
        claim_eq!(result, Ok(()));

        // Rebinding the registry is allowed while engaged
        let params = to_bytes(&REGISTRY_2);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(MAINTAINER))
            .set_parameter(&params);
        let mut logger = TestLogger::init();
        claim_eq!(
            update_allowance_registry(&ctx, &mut host, &mut logger),
            Ok(())
        );
        claim_eq!(logger.logs.len(), 1);

        // Later raises verify against the new registry, not the old one
        mock_current_bid(&mut host, 5);
        mock_registry(&mut host, REGISTRY_2, false);
        let (result, _) = proxy_bid(&mut host, BIDDER, 500, 100);
        claim_eq!(
            result,
            Err(CustomContractError::InvalidAllowanceProof.into())
        );

        mock_registry(&mut host, REGISTRY_2, true);
        let (result, _) = proxy_bid(&mut host, BIDDER, 500, 100);
        claim_eq!(result, Ok(()));

        // The auction binding itself stays locked while a bid is live
        let params = to_bytes(&agent_config(None));
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(MAINTAINER))
            .set_parameter(&params);
        let mut logger = TestLogger::init();
        let result = update_full_config(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::AlreadyInProgress.into()));
    }

    #[concordium_test]
    fn test_update_registry_is_maintainer_only() {
        let mut host = configured_host(None);

        let params = to_bytes(&REGISTRY_2);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(OUTSIDER))
            .set_parameter(&params);
        let mut logger = TestLogger::init();
        let result = update_allowance_registry(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));
        claim_eq!(host.state().config().unwrap().registry, REGISTRY);
    }

    #[concordium_test]
    fn test_update_full_config_before_first_bid() {
        let mut host = configured_host(None);

        let mut new_config = agent_config(Some(funding_token()));
        new_config.registry = REGISTRY_2;
        let params = to_bytes(&new_config);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(MAINTAINER))
            .set_parameter(&params);
        let mut logger = TestLogger::init();
        claim_eq!(update_full_config(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(host.state().config().unwrap(), new_config);
        claim_eq!(logger.logs.len(), 1);

        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(OUTSIDER))
            .set_parameter(&params);
        let mut logger = TestLogger::init();
        let result = update_full_config(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));
    }

    #[concordium_test]
    fn test_claim_and_withdraw_after_losing() {
        let mut host = configured_host(None);
        mock_current_bid(&mut host, 7);
        host.setup_mock_entrypoint(
            AUCTION,
            OwnedEntrypointName::new_unchecked("withdraw".into()),
            parse_and_ok_mock::<AuctionKey, _>(()),
        );

        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(MAINTAINER))
            .set_self_address(SELF_ADDRESS);
        let mut logger = TestLogger::init();
        claim_eq!(
            claim_and_withdraw_bid_from_auction(&ctx, &mut host, &mut logger),
            Ok(())
        );
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(logger.logs[0][0], CCD_BID_CLAIMED_TAG);
        claim!(logger
            .logs
            .contains(&to_bytes(&ProxyEvent::ccd_bid_claimed(7))));

        // Once withdrawn the auction reports zero; a repeat claim cannot
        // double credit
        mock_current_bid(&mut host, 0);
        let mut logger = TestLogger::init();
        let result = claim_and_withdraw_bid_from_auction(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::NothingToClaim.into()));
        claim_eq!(logger.logs.len(), 0);
    }

    #[concordium_test]
    fn test_claim_rejects_for_winner_and_strangers() {
        let mut host = configured_host(None);
        // The winner's bid is consumed by finalization; nothing is claimable
        mock_current_bid(&mut host, 0);

        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(MAINTAINER))
            .set_self_address(SELF_ADDRESS);
        let mut logger = TestLogger::init();
        let result = claim_and_withdraw_bid_from_auction(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::NothingToClaim.into()));

        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(OUTSIDER))
            .set_self_address(SELF_ADDRESS);
        let mut logger = TestLogger::init();
        let result = claim_and_withdraw_bid_from_auction(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));
    }

    #[concordium_test]
    fn test_engaged_never_resets() {
        let mut host = configured_host(None);
        mock_gate(&mut host, true);
        mock_registry(&mut host, REGISTRY, true);
        mock_current_bid(&mut host, 0);
        mock_auction_accepts_raise(&mut host);
        host.set_self_balance(Amount::from_micro_ccd(100));

        let (result, _) = proxy_bid(&mut host, BIDDER, 100, 5);
        claim_eq!(result, Ok(()));

        // Lose, settle, drain
        mock_current_bid(&mut host, 5);
        host.setup_mock_entrypoint(
            AUCTION,
            OwnedEntrypointName::new_unchecked("withdraw".into()),
            parse_and_ok_mock::<AuctionKey, _>(()),
        );
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(MAINTAINER))
            .set_self_address(SELF_ADDRESS);
        let mut logger = TestLogger::init();
        claim_eq!(
            claim_and_withdraw_bid_from_auction(&ctx, &mut host, &mut logger),
            Ok(())
        );

        // A settled agent still refuses re-targeting; a new auction gets a
        // fresh clone
        claim!(host.state().engaged);
        let params = to_bytes(&agent_config(None));
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(MAINTAINER))
            .set_parameter(&params);
        let mut logger = TestLogger::init();
        let result = update_full_config(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::AlreadyInProgress.into()));
    }

    #[concordium_test]
    fn test_forward_nft_to_winner() {
        let mut host = configured_host(None);
        host.setup_mock_entrypoint(
            COLLECTION,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            parse_and_check_mock::<TransferParams<ContractTokenId, ContractTokenAmount>, _>(
                |params| {
                    params.0.len() == 1
                        && params.0[0].amount == ContractTokenAmount(1)
                        && params.0[0].from == Address::Contract(SELF_ADDRESS)
                },
                (),
            ),
        );

        // Releasing the won asset is for the admin tier only
        let params = to_bytes(&RECIPIENT);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(MAINTAINER))
            .set_self_address(SELF_ADDRESS)
            .set_parameter(&params);
        let mut logger = TestLogger::init();
        let result = forward_nft_to_winner(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));

        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(ADMIN))
            .set_self_address(SELF_ADDRESS)
            .set_parameter(&params);
        let mut logger = TestLogger::init();
        claim_eq!(forward_nft_to_winner(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(logger.logs.len(), 1);
    }

    #[concordium_test]
    fn test_forward_nft_fails_when_not_holding() {
        let mut host = configured_host(None);
        // The collection refuses the transfer when the agent is not the
        // holder; a second forward after a successful one lands here too
        host.setup_mock_entrypoint(
            COLLECTION,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            parse_and_check_mock::<TransferParams<ContractTokenId, ContractTokenAmount>, _>(
                |_| false,
                (),
            ),
        );

        let params = to_bytes(&RECIPIENT);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(ADMIN))
            .set_self_address(SELF_ADDRESS)
            .set_parameter(&params);
        let mut logger = TestLogger::init();
        let result = forward_nft_to_winner(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::InvokeContractError.into()));
        claim_eq!(logger.logs.len(), 0);
    }

    #[concordium_test]
    fn test_recover_ccd() {
        let mut host = configured_host(None);
        host.set_self_balance(Amount::from_micro_ccd(40));

        let params = to_bytes(&RecoverCcdParams {
            recipient: RECIPIENT,
            amount: Amount::from_micro_ccd(25),
        });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(OUTSIDER))
            .set_parameter(&params);
        let mut logger = TestLogger::init();
        let result = recover_ccd(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));

        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(MAINTAINER))
            .set_parameter(&params);
        let mut logger = TestLogger::init();
        claim_eq!(recover_ccd(&ctx, &mut host, &mut logger), Ok(()));
        claim!(host
            .get_transfers()
            .contains(&(RECIPIENT, Amount::from_micro_ccd(25))));

        // Sweeping more than the balance reverts instead of
        // under-transferring
        let params = to_bytes(&RecoverCcdParams {
            recipient: RECIPIENT,
            amount: Amount::from_micro_ccd(1_000),
        });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(MAINTAINER))
            .set_parameter(&params);
        let mut logger = TestLogger::init();
        let result = recover_ccd(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::InvokeTransferError.into()));
    }

    #[concordium_test]
    fn test_recover_tokens() {
        let mut host = configured_host(Some(funding_token()));
        host.setup_mock_entrypoint(
            FUNDING_TOKEN,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            parse_and_ok_mock::<TransferParams<ContractTokenId, ContractTokenAmount>, _>(()),
        );

        let params = to_bytes(&RecoverTokensParams {
            token: funding_token(),
            recipient: RECIPIENT,
            amount: ContractTokenAmount(30),
        });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(MAINTAINER))
            .set_self_address(SELF_ADDRESS)
            .set_parameter(&params);
        let mut logger = TestLogger::init();
        claim_eq!(recover_tokens(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(logger.logs.len(), 1);

        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(OUTSIDER))
            .set_self_address(SELF_ADDRESS)
            .set_parameter(&params);
        let mut logger = TestLogger::init();
        let result = recover_tokens(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));
    }

    #[concordium_test]
    fn test_view() {
        let mut host = configured_host(None);

        let ctx = TestReceiveContext::empty();
        let result = view(&ctx, &host).expect_report("view failed");
        claim_eq!(result.config, Some(agent_config(None)));
        claim!(!result.engaged);

        mock_gate(&mut host, true);
        mock_registry(&mut host, REGISTRY, true);
        mock_current_bid(&mut host, 0);
        mock_auction_accepts_raise(&mut host);
        host.set_self_balance(Amount::from_micro_ccd(100));
        let (result, _) = proxy_bid(&mut host, BIDDER, 100, 5);
        claim_eq!(result, Ok(()));

        let ctx = TestReceiveContext::empty();
        let result = view(&ctx, &host).expect_report("view failed");
        claim!(result.engaged);
    }

    #[concordium_test]
    fn test_unconfigured_clone_is_inert() {
        let mut host = blank_host();
        mock_gate(&mut host, true);

        let (result, _) = proxy_bid(&mut host, BIDDER, 100, 5);
        claim_eq!(result, Err(CustomContractError::NotInitialized.into()));

        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(MAINTAINER))
            .set_self_address(SELF_ADDRESS);
        let mut logger = TestLogger::init();
        let result = claim_and_withdraw_bid_from_auction(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));
    }
}
