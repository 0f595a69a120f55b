use super::*;

/// The custom errors the contracts can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Sender lacks the privilege tier required for this operation
    /// (Error code: -4).
    Unauthorized,
    /// This function must only be called by a contract (Error code: -5).
    ContractOnly,
    /// Only the factory that produced this clone may configure it
    /// (Error code: -6).
    FactoryOnly,
    /// Attempt to use a clone that has not been configured yet
    /// (Error code: -7).
    NotInitialized,
    /// Clone was already configured (Error code: -8).
    AlreadyInitialized,
    /// Factory has no spare instances left in the requested pool
    /// (Error code: -9).
    InsufficientInstances,
    /// Address failed the whitelist gate (Error code: -10).
    NotWhitelisted,
    /// Allowance inclusion proof does not match the bound root
    /// (Error code: -11).
    InvalidAllowanceProof,
    /// Requested bid exceeds the proven loan allowance (Error code: -12).
    InsufficientLoanAllowance,
    /// Agent balance of the funding asset does not cover the raise
    /// (Error code: -13).
    InsufficientFunds,
    /// Requested bid does not exceed the agent's current bid
    /// (Error code: -14).
    BidTooLow,
    /// Bid or withdrawal rejected by the auction contract (Error code: -15).
    AuctionReject,
    /// Auction holds no claimable bid for this agent (Error code: -16).
    NothingToClaim,
    /// Full reconfiguration attempted while a bid is live under the current
    /// configuration (Error code: -17).
    AlreadyInProgress,
    /// Failed to invoke a contract (Error code: -18).
    InvokeContractError,
    /// Failed to invoke a transfer (Error code: -19).
    InvokeTransferError,
    /// Incompatible collaborator contract (Error code: -20).
    Incompatible,
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping errors related to contract invocations to CustomContractError.
impl<T> From<CallContractError<T>> for CustomContractError {
    fn from(_cce: CallContractError<T>) -> Self {
        Self::InvokeContractError
    }
}

/// Mapping errors related to CCD transfers to CustomContractError.
impl From<TransferError> for CustomContractError {
    fn from(_te: TransferError) -> Self {
        Self::InvokeTransferError
    }
}
