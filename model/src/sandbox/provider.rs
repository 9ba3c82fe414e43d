use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use super::chain::Chain;
use crate::{
    api::{Provider, RpcError, RpcResult},
    transaction::{Receipt, Transaction, TxHash},
    Address, Gas, Timestamp, TokenAmount,
};

/// `Provider` backed by the sandbox chain, signing as a fixed account.
#[derive(Clone)]
pub struct SandboxProvider {
    chain: Arc<Mutex<Chain>>,
    signer: Option<Address>,
}

impl SandboxProvider {
    pub(super) fn new(chain: Arc<Mutex<Chain>>, signer: Option<Address>) -> Self {
        Self { chain, signer }
    }

    fn connected(&self) -> RpcResult<(Address, MutexGuard<Chain>)> {
        let signer = self
            .signer
            .ok_or_else(|| RpcError::Unavailable("wallet is not connected".to_string()))?;
        let chain = self
            .chain
            .lock()
            .map_err(|_| RpcError::Other("sandbox chain is poisoned".to_string()))?;
        Ok((signer, chain))
    }
}

#[async_trait]
impl Provider for SandboxProvider {
    async fn signer(&self) -> RpcResult<Address> {
        self.connected().map(|(signer, _)| signer)
    }

    async fn code_at(&self, address: &Address) -> RpcResult<Vec<u8>> {
        let (_, chain) = self.connected()?;
        Ok(chain.code_at(address))
    }

    async fn has_method(&self, address: &Address, method: &str) -> RpcResult<bool> {
        let (_, chain) = self.connected()?;
        Ok(chain.has_method(address, method))
    }

    async fn view(&self, address: &Address, method: &str, args: Value) -> RpcResult<Value> {
        let (_, chain) = self.connected()?;
        chain.view(address, method, &args)
    }

    async fn timestamp(&self) -> RpcResult<Timestamp> {
        let (_, chain) = self.connected()?;
        Ok(chain.now)
    }

    async fn native_balance(&self, address: &Address) -> RpcResult<TokenAmount> {
        let (_, chain) = self.connected()?;
        Ok(chain.native.get(address).copied().unwrap_or_default())
    }

    async fn estimate_gas(&self, transaction: &Transaction) -> RpcResult<Gas> {
        let (signer, chain) = self.connected()?;
        let mut dry_run = chain.clone();
        dry_run.execute(signer, transaction)?;
        Ok(Chain::gas_cost(&transaction.method))
    }

    async fn send_transaction(&self, transaction: Transaction, gas_limit: Gas) -> RpcResult<TxHash> {
        let (signer, mut chain) = self.connected()?;
        Ok(chain.mine(signer, transaction, gas_limit))
    }

    async fn wait_for_receipt(&self, hash: &TxHash) -> RpcResult<Receipt> {
        let (_, chain) = self.connected()?;
        chain
            .receipts
            .get(hash)
            .cloned()
            .ok_or_else(|| RpcError::Other(format!("unknown transaction {hash}")))
    }
}
