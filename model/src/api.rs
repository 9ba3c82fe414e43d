use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::{
    transaction::{Receipt, Transaction, TxHash},
    Address, Gas, Timestamp, TokenAmount,
};

/// Failure reported by the remote endpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error("no wallet or provider available: {0}")]
    Unavailable(String),

    #[error("execution reverted{}", .reason.as_ref().map(|reason| format!(": {reason}")).unwrap_or_default())]
    Reverted { reason: Option<String> },

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

impl RpcError {
    pub fn reverted(reason: impl Into<String>) -> Self {
        Self::Reverted {
            reason: Some(reason.into()),
        }
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

pub type RpcResult<T> = Result<T, RpcError>;

/// The `Provider` trait is the remote endpoint together with the signing identity.
///
/// Every method is a single round trip. Contract methods are addressed by name with
/// positional JSON arguments; their results come back as JSON.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Account that signs transactions.
    ///
    /// # Errors
    ///
    /// `RpcError::Unavailable` if no wallet is connected.
    async fn signer(&self) -> RpcResult<Address>;

    /// Executable code deployed at `address`. Empty when there is none.
    async fn code_at(&self, address: &Address) -> RpcResult<Vec<u8>>;

    /// Whether the contract at `address` exposes `method` in its interface.
    async fn has_method(&self, address: &Address, method: &str) -> RpcResult<bool>;

    /// Invokes a read-only contract method.
    async fn view(&self, address: &Address, method: &str, args: Value) -> RpcResult<Value>;

    /// Timestamp of the latest block.
    async fn timestamp(&self) -> RpcResult<Timestamp>;

    /// Balance of the chain's native currency.
    async fn native_balance(&self, address: &Address) -> RpcResult<TokenAmount>;

    /// Simulates `transaction` against current state.
    ///
    /// # Errors
    ///
    /// `RpcError::Reverted` if the transaction would revert.
    async fn estimate_gas(&self, transaction: &Transaction) -> RpcResult<Gas>;

    /// Signs and broadcasts `transaction` with the given execution budget.
    async fn send_transaction(&self, transaction: Transaction, gas_limit: Gas) -> RpcResult<TxHash>;

    /// Waits until the transaction is included in a block.
    async fn wait_for_receipt(&self, hash: &TxHash) -> RpcResult<Receipt>;
}
