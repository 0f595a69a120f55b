use commons::{AllowanceProof, AssetAmount, CustomContractError, VerifyParams};
use concordium_std::*;

/// Check an allowance claim against a registry. Proofs are always taken to
/// the registry bound at call time; nothing accepted earlier survives a
/// rebind.
pub fn verify<T>(
    host: &impl HasHost<T>,
    registry: &ContractAddress,
    account: AccountAddress,
    allowance: AssetAmount,
    proof: AllowanceProof,
) -> Result<bool, CustomContractError> {
    let mut response = host
        .invoke_contract_read_only(
            registry,
            &VerifyParams {
                account,
                allowance,
                proof,
            },
            EntrypointName::new_unchecked("verify"),
            Amount::zero(),
        )
        .map_err(handle_call_error)?
        .ok_or(CustomContractError::Incompatible)?;

    bool::deserial(&mut response).map_err(|_| CustomContractError::Incompatible)
}

fn handle_call_error<R>(error: CallContractError<R>) -> CustomContractError {
    match error {
        CallContractError::MissingEntrypoint | CallContractError::MessageFailed => {
            CustomContractError::Incompatible
        }
        e => e.into(),
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use commons::test::parse_and_ok_mock;
    use concordium_std::test_infrastructure::*;

    const REGISTRY: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const ACCOUNT: AccountAddress = AccountAddress([7; 32]);

    #[concordium_test]
    fn test_verify_forwards_verdict() {
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new((), state_builder);

        host.setup_mock_entrypoint(
            REGISTRY,
            OwnedEntrypointName::new_unchecked("verify".into()),
            parse_and_ok_mock::<VerifyParams, _>(false),
        );

        let response = verify(
            &host,
            &REGISTRY,
            ACCOUNT,
            100,
            AllowanceProof { steps: Vec::new() },
        );
        claim_eq!(response, Ok(false));
    }
}
