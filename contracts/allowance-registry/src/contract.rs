use commons::{
    verify_allowance, AllowanceRoot, AuthorityUpdateParams, AuthorityViewParams,
    CustomContractError, VerifyParams,
};
use concordium_std::*;

use crate::state::State;

#[derive(Debug, Serialize, SchemaType)]
pub struct InitParams {
    /// Factory allowed to configure this clone.
    pub factory: ContractAddress,
}

/// Deploy a blank registry clone bound to its factory.
#[init(contract = "AllowanceRegistry", parameter = "InitParams")]
fn contract_init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params = InitParams::deserial(&mut ctx.parameter_cursor())?;
    Ok(State::new(state_builder, params.factory, ctx.init_origin()))
}

/// Commit the allowance root on a blank clone.
///
/// It rejects if:
/// - Sender is not the factory this clone was deployed for.
/// - A root was already committed.
#[receive(
    mutable,
    contract = "AllowanceRegistry",
    name = "configure",
    parameter = "AllowanceRoot"
)]
fn contract_configure<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<()> {
    let root = AllowanceRoot::deserial(&mut ctx.parameter_cursor())?;
    let state = host.state_mut();

    ensure!(
        ctx.sender().matches_contract(&state.factory),
        CustomContractError::FactoryOnly.into()
    );
    state.configure(root)?;

    Ok(())
}

/// Decide whether the claimed `(account, allowance)` pair is committed
/// under the bound root. Read only; verification never mutates the
/// registry.
///
/// It rejects if:
/// - Fails to parse `VerifyParams`.
/// - No root has been committed yet.
#[receive(
    contract = "AllowanceRegistry",
    name = "verify",
    parameter = "VerifyParams",
    return_value = "bool"
)]
fn contract_verify<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<bool> {
    let params = VerifyParams::deserial(&mut ctx.parameter_cursor())?;
    let root = host
        .state()
        .root
        .ok_or(CustomContractError::NotInitialized)?;

    Ok(verify_allowance(
        &root,
        &params.account,
        params.allowance,
        &params.proof,
    ))
}

/// View the committed root, if any.
#[receive(
    contract = "AllowanceRegistry",
    name = "viewRoot",
    return_value = "Option<AllowanceRoot>"
)]
fn view_root<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Option<AllowanceRoot>> {
    Ok(host.state().root)
}

/// Function to manage addresses that are allowed to maintain and modify the
/// state of the contract. The committed root is not reachable from here.
#[receive(
    mutable,
    contract = "AllowanceRegistry",
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
    contract = "AllowanceRegistry",
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
    use commons::test::build_allowance_tree;
    use commons::AllowanceProof;
    use concordium_std::test_infrastructure::*;

    const FACTORY: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const INTRUDER: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };

    const DEPLOYER: AccountAddress = AccountAddress([1; 32]);
    const ALICE: AccountAddress = AccountAddress([2; 32]);
    const BOB: AccountAddress = AccountAddress([3; 32]);

    fn blank_host() -> TestHost<State<TestStateApi>> {
        let mut ctx = TestInitContext::empty();
        let params = to_bytes(&InitParams { factory: FACTORY });
        ctx.set_init_origin(DEPLOYER).set_parameter(&params);
        let mut state_builder = TestStateBuilder::new();

        let state = contract_init(&ctx, &mut state_builder)
            .expect_report("Failed during init_AllowanceRegistry");
        TestHost::new(state, state_builder)
    }

    fn configure(host: &mut TestHost<State<TestStateApi>>, sender: ContractAddress, root: [u8; 32]) -> ReceiveResult<()> {
        let params = to_bytes(&root);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Contract(sender)).set_parameter(&params);
        contract_configure(&ctx, host)
    }

    fn verify(
        host: &TestHost<State<TestStateApi>>,
        account: AccountAddress,
        allowance: u64,
        proof: AllowanceProof,
    ) -> ReceiveResult<bool> {
        let params = to_bytes(&VerifyParams {
            account,
            allowance,
            proof,
        });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&params);
        contract_verify(&ctx, host)
    }

    #[concordium_test]
    fn test_init_is_blank() {
        let host = blank_host();

        claim_eq!(host.state().root, None);
        claim_eq!(host.state().factory, FACTORY);
        claim!(host
            .state()
            .authority
            .has_admin_rights(&Address::Account(DEPLOYER)));
    }

    #[concordium_test]
    fn test_configure_is_factory_only_and_one_shot() {
        let mut host = blank_host();
        let (root, _) = build_allowance_tree(&[(ALICE, 100)]);

        let result = configure(&mut host, INTRUDER, root);
        claim_eq!(result, Err(CustomContractError::FactoryOnly.into()));
        claim_eq!(host.state().root, None);

        let result = configure(&mut host, FACTORY, root);
        claim_eq!(result, Ok(()));
        claim_eq!(host.state().root, Some(root));

        // The root is immutable; a second commit must not overwrite it
        let (other_root, _) = build_allowance_tree(&[(ALICE, 5)]);
        let result = configure(&mut host, FACTORY, other_root);
        claim_eq!(result, Err(CustomContractError::AlreadyInitialized.into()));
        claim_eq!(host.state().root, Some(root));
    }

    #[concordium_test]
    fn test_verify_requires_configuration() {
        let host = blank_host();
        let (_, proofs) = build_allowance_tree(&[(ALICE, 100)]);

        let result = verify(&host, ALICE, 100, proofs[0].clone());
        claim_eq!(result, Err(CustomContractError::NotInitialized.into()));
    }

    #[concordium_test]
    fn test_verify_decides_membership() {
        let mut host = blank_host();
        let (root, proofs) = build_allowance_tree(&[(ALICE, 100), (BOB, 50)]);
        configure(&mut host, FACTORY, root).expect_report("configure failed");

        claim_eq!(verify(&host, ALICE, 100, proofs[0].clone()), Ok(true));
        claim_eq!(verify(&host, BOB, 50, proofs[1].clone()), Ok(true));

        // Forged limit, foreign account, foreign proof
        claim_eq!(verify(&host, ALICE, 1000, proofs[0].clone()), Ok(false));
        claim_eq!(verify(&host, BOB, 100, proofs[0].clone()), Ok(false));
        claim_eq!(verify(&host, ALICE, 100, proofs[1].clone()), Ok(false));
    }

    #[concordium_test]
    fn test_view_root() {
        let mut host = blank_host();
        let ctx = TestReceiveContext::empty();
        claim_eq!(view_root(&ctx, &host), Ok(None));

        let (root, _) = build_allowance_tree(&[(ALICE, 100)]);
        configure(&mut host, FACTORY, root).expect_report("configure failed");
        claim_eq!(view_root(&ctx, &host), Ok(Some(root)));
    }
}
