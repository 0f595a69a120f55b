use commons::CustomContractError;
use concordium_std::*;

/// Ask the gate contract whether `address` may move funds through the
/// agent.
pub fn is_whitelisted<T>(
    host: &impl HasHost<T>,
    whitelist: &ContractAddress,
    address: &Address,
) -> Result<bool, CustomContractError> {
    let mut response = host
        .invoke_contract_read_only(
            whitelist,
            address,
            EntrypointName::new_unchecked("isWhitelisted"),
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
