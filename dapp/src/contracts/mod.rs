mod ico;
mod staking;
mod token;

use std::sync::Arc;

pub use ico::IcoContract;
use serde::de::DeserializeOwned;
use serde_json::Value;
pub use staking::{Capabilities, StakingContract};
use staking_dapp_model::{
    api::{Provider, RpcError},
    transaction::Transaction,
    Address,
};
pub use token::TokenContract;
use tracing::debug;

use crate::error::DappResult;

/// Untyped handle to a deployed contract that has passed the connector's checks.
#[derive(Clone)]
pub(crate) struct Contract {
    provider: Arc<dyn Provider>,
    address: Address,
}

impl Contract {
    pub(crate) fn new(provider: Arc<dyn Provider>, address: Address) -> Self {
        Self { provider, address }
    }

    pub(crate) fn address(&self) -> Address {
        self.address
    }

    pub(crate) async fn view<T: DeserializeOwned>(&self, method: &str, args: Value) -> DappResult<T> {
        debug!(contract = %self.address, method, %args, "view");

        let value = self.provider.view(&self.address, method, args).await?;
        let result = serde_json::from_value(value).map_err(RpcError::from)?;

        Ok(result)
    }

    pub(crate) fn transaction(&self, method: &str, args: Value) -> Transaction {
        Transaction::new(self.address, method, args)
    }
}
