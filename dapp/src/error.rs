use staking_dapp_model::{api::RpcError, reward::RewardError, Address, ParseAmountError};
use thiserror::Error;

/// Every way a read or a transaction flow can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DappError {
    /// A required address is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("no wallet or provider reachable: {0}")]
    Connectivity(String),

    /// Nothing is deployed at a configured address on the connected network.
    #[error("no contract found at {address}; check that it is deployed and that the wallet is on the right network")]
    ContractNotFound { address: Address },

    /// A read or a write was reverted or rejected by the remote endpoint.
    #[error("contract call failed: {}", .reason.as_deref().unwrap_or("the transaction was rejected"))]
    ContractCall { reason: Option<String> },

    /// Caller input failed a local precondition. Raised before any remote call.
    #[error("{0}")]
    Validation(String),

    /// Gas estimation shows the call would revert.
    #[error("transaction would fail: {}", .reason.as_deref().unwrap_or("execution reverted"))]
    Estimation { reason: Option<String> },

    #[error("unexpected error: {0}")]
    Unknown(String),
}

pub type DappResult<T> = Result<T, DappError>;

impl DappError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DappError::Configuration(_) => "configuration",
            DappError::Connectivity(_) => "connectivity",
            DappError::ContractNotFound { .. } => "contract_not_found",
            DappError::ContractCall { .. } => "contract_call",
            DappError::Validation(_) => "validation",
            DappError::Estimation { .. } => "estimation",
            DappError::Unknown(_) => "unknown",
        }
    }

    /// Text shown to the user. Unclassified failures get a generic message, their detail goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            DappError::Unknown(_) => "Something went wrong, please try again".to_string(),
            other => other.to_string(),
        }
    }

    /// Classifies a failure of the gas estimation step.
    pub(crate) fn from_estimation(error: RpcError) -> Self {
        match error {
            RpcError::Reverted { reason } => DappError::Estimation { reason },
            RpcError::Rejected(reason) => DappError::Estimation { reason: Some(reason) },
            other => other.into(),
        }
    }
}

impl From<RpcError> for DappError {
    fn from(error: RpcError) -> Self {
        match error {
            RpcError::Unavailable(message) => DappError::Connectivity(message),
            RpcError::Reverted { reason } => DappError::ContractCall { reason },
            RpcError::Rejected(reason) => DappError::ContractCall { reason: Some(reason) },
            RpcError::Decode(message) => DappError::Unknown(format!("malformed response: {message}")),
            RpcError::Other(message) => DappError::Unknown(message),
        }
    }
}

impl From<ParseAmountError> for DappError {
    fn from(error: ParseAmountError) -> Self {
        DappError::Validation(error.to_string())
    }
}

impl From<RewardError> for DappError {
    fn from(error: RewardError) -> Self {
        DappError::Unknown(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use staking_dapp_model::{api::RpcError, ParseAmountError};

    use crate::error::DappError;

    #[test]
    fn classify_rpc_errors() {
        assert_eq!(
            DappError::Connectivity("gone".into()),
            RpcError::Unavailable("gone".into()).into()
        );
        assert_eq!(
            DappError::ContractCall {
                reason: Some("Lock is active".into())
            },
            RpcError::reverted("Lock is active").into()
        );
        assert_eq!(
            DappError::ContractCall {
                reason: Some("user denied".into())
            },
            RpcError::Rejected("user denied".into()).into()
        );
        assert_eq!("unknown", DappError::from(RpcError::Decode("bad".into())).kind());
    }

    #[test]
    fn estimation_failures() {
        assert_eq!(
            DappError::Estimation {
                reason: Some("Lock is active".into())
            },
            DappError::from_estimation(RpcError::reverted("Lock is active"))
        );
        assert_eq!(
            DappError::Connectivity("gone".into()),
            DappError::from_estimation(RpcError::Unavailable("gone".into()))
        );
    }

    #[test]
    fn messages() {
        assert_eq!(
            "contract call failed: the transaction was rejected",
            DappError::ContractCall { reason: None }.to_string()
        );
        assert_eq!(
            "transaction would fail: Lock is active",
            DappError::Estimation {
                reason: Some("Lock is active".into())
            }
            .to_string()
        );
        assert_eq!(
            "Something went wrong, please try again",
            DappError::Unknown("panic in decoder".into()).user_message()
        );
        assert_eq!("amount is empty", DappError::from(ParseAmountError::Empty).user_message());
    }
}
