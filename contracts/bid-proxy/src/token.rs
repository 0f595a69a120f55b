//! CIS-2 plumbing for the funding token and the auctioned NFT.

use commons::{ContractTokenAmount, ContractTokenId, CustomContractError, TokenAsset};
use concordium_cis2::{
    AdditionalData, BalanceOfQuery, BalanceOfQueryParams, BalanceOfQueryResponse, Receiver,
    Transfer, TransferParams,
};
use concordium_std::*;

/// Move `amount` of a CIS-2 token out of this agent.
pub fn transfer<T>(
    host: &mut impl HasHost<T>,
    token: &TokenAsset,
    from: Address,
    to: Receiver,
    amount: ContractTokenAmount,
    data: AdditionalData,
) -> Result<(), CustomContractError> {
    host.invoke_contract(
        &token.contract,
        &TransferParams::from(vec![Transfer {
            token_id: token.id.clone(),
            amount,
            from,
            to,
            data,
        }]),
        EntrypointName::new_unchecked("transfer"),
        Amount::zero(),
    )
    .map_err(handle_call_error)?;

    Ok(())
}

/// Query `owner`'s balance of a CIS-2 token.
pub fn balance_of<T>(
    host: &impl HasHost<T>,
    token: &TokenAsset,
    owner: Address,
) -> Result<ContractTokenAmount, CustomContractError> {
    let mut response = host
        .invoke_contract_read_only(
            &token.contract,
            &BalanceOfQueryParams {
                queries: vec![BalanceOfQuery {
                    token_id: token.id.clone(),
                    address: owner,
                }],
            },
            EntrypointName::new_unchecked("balanceOf"),
            Amount::zero(),
        )
        .map_err(handle_call_error)?
        .ok_or(CustomContractError::Incompatible)?;

    let amounts = BalanceOfQueryResponse::<ContractTokenAmount>::deserial(&mut response)
        .map_err(|_| CustomContractError::Incompatible)?;
    amounts
        .0
        .first()
        .copied()
        .ok_or(CustomContractError::Incompatible)
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
    use commons::test::{parse_and_check_mock, parse_and_ok_mock};
    use concordium_std::test_infrastructure::*;

    const TOKEN_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const AGENT: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };
    const USER: AccountAddress = AccountAddress([1; 32]);

    fn token() -> TokenAsset {
        TokenAsset {
            contract: TOKEN_CONTRACT,
            id: ContractTokenId(vec![4]),
        }
    }

    #[concordium_test]
    fn test_transfer() {
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new((), state_builder);

        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            parse_and_check_mock::<TransferParams<ContractTokenId, ContractTokenAmount>, _>(
                |params| {
                    params.0.len() == 1
                        && params.0[0].amount == ContractTokenAmount(3)
                        && params.0[0].from == Address::Contract(AGENT)
                },
                (),
            ),
        );

        let response = transfer(
            &mut host,
            &token(),
            Address::Contract(AGENT),
            Receiver::Account(USER),
            ContractTokenAmount(3),
            AdditionalData::empty(),
        );
        claim_eq!(response, Ok(()));
    }

    #[concordium_test]
    fn test_balance_of() {
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new((), state_builder);

        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            OwnedEntrypointName::new_unchecked("balanceOf".into()),
            parse_and_ok_mock::<BalanceOfQueryParams<ContractTokenId>, _>(
                BalanceOfQueryResponse(vec![ContractTokenAmount(42)]),
            ),
        );

        let response = balance_of(&host, &token(), Address::Contract(AGENT));
        claim_eq!(response, Ok(ContractTokenAmount(42)));
    }
}
