//! The slice of the auction contract interface the agent consumes: bid
//! raises, live bid queries and post-finalize withdrawal. Settlement stays
//! on the auction side.

use commons::{AssetAmount, AuctionKey, CustomContractError, GetBidParams};
use concordium_std::*;

/// Query a bidder's live total in the bound auction.
pub fn get_bid<T>(
    host: &impl HasHost<T>,
    auction: &ContractAddress,
    key: &AuctionKey,
    bidder: Address,
) -> Result<AssetAmount, CustomContractError> {
    let mut response = host
        .invoke_contract_read_only(
            auction,
            &GetBidParams {
                key: key.clone(),
                bidder,
            },
            EntrypointName::new_unchecked("getBid"),
            Amount::zero(),
        )
        .map_err(handle_call_error)?
        .ok_or(CustomContractError::Incompatible)?;

    AssetAmount::deserial(&mut response).map_err(|_| CustomContractError::Incompatible)
}

/// Raise this agent's bid by the attached amount.
pub fn bid_ccd<T>(
    host: &mut impl HasHost<T>,
    auction: &ContractAddress,
    key: &AuctionKey,
    increment: Amount,
) -> Result<(), CustomContractError> {
    host.invoke_contract(
        auction,
        key,
        EntrypointName::new_unchecked("bid"),
        increment,
    )
    .map_err(handle_call_error)?;

    Ok(())
}

/// Withdraw this agent's escrowed bid after losing a finalized auction.
pub fn withdraw<T>(
    host: &mut impl HasHost<T>,
    auction: &ContractAddress,
    key: &AuctionKey,
) -> Result<(), CustomContractError> {
    host.invoke_contract(
        auction,
        key,
        EntrypointName::new_unchecked("withdraw"),
        Amount::zero(),
    )
    .map_err(handle_call_error)?;

    Ok(())
}

// Auction side rejections (window, minimum, monotonicity) keep their own
// error class instead of collapsing into a generic invoke failure.
fn handle_call_error<R>(error: CallContractError<R>) -> CustomContractError {
    match error {
        CallContractError::MissingEntrypoint | CallContractError::MessageFailed => {
            CustomContractError::Incompatible
        }
        CallContractError::LogicReject { .. } => CustomContractError::AuctionReject,
        e => e.into(),
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use commons::test::parse_and_ok_mock;
    use commons::ContractTokenId;
    use concordium_std::test_infrastructure::*;

    const AUCTION: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const AGENT: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };

    fn key() -> AuctionKey {
        AuctionKey {
            collection: ContractAddress {
                index: 9,
                subindex: 0,
            },
            item_id: ContractTokenId(vec![1]),
            start: Timestamp::from_timestamp_millis(0),
        }
    }

    #[concordium_test]
    fn test_get_bid() {
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new((), state_builder);

        host.setup_mock_entrypoint(
            AUCTION,
            OwnedEntrypointName::new_unchecked("getBid".into()),
            parse_and_ok_mock::<GetBidParams, _>(25u64),
        );

        let response = get_bid(&host, &AUCTION, &key(), Address::Contract(AGENT));
        claim_eq!(response, Ok(25));
    }

    #[concordium_test]
    fn test_auction_rejection_is_distinct() {
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new((), state_builder);

        host.setup_mock_entrypoint(
            AUCTION,
            OwnedEntrypointName::new_unchecked("bid".into()),
            MockFn::new(|_parameter, _amount, _balance, _state| -> CallContractResult<()> {
                Err(CallContractError::LogicReject {
                    reason: -5,
                    return_value: (),
                })
            }),
        );

        let response = bid_ccd(&mut host, &AUCTION, &key(), Amount::from_micro_ccd(10));
        claim_eq!(response, Err(CustomContractError::AuctionReject));
    }
}
