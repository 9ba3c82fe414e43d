use serde_json::json;
use staking_dapp_model::{
    notification::Notification,
    pool::{PoolDescriptor, UserPosition},
    transaction::Transaction,
    Address, PoolId, TokenAmount, U128,
};

use super::Contract;
use crate::error::DappResult;

/// Optional parts of the staking contract interface, probed once per session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// The contract exposes `pendingReward(pool, user)`.
    pub direct_reward_query: bool,
}

/// Typed handle to the staking contract.
#[derive(Clone)]
pub struct StakingContract {
    contract: Contract,
    capabilities: Capabilities,
}

impl StakingContract {
    pub(crate) fn new(contract: Contract, capabilities: Capabilities) -> Self {
        Self { contract, capabilities }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub async fn owner(&self) -> DappResult<Address> {
        self.contract.view("owner", json!([])).await
    }

    pub async fn pool_count(&self) -> DappResult<PoolId> {
        self.contract.view("poolCount", json!([])).await
    }

    pub async fn pool_info(&self, pool_id: PoolId) -> DappResult<PoolDescriptor> {
        self.contract.view("poolInfo", json!([pool_id])).await
    }

    pub async fn user_info(&self, pool_id: PoolId, user: Address) -> DappResult<UserPosition> {
        self.contract.view("userInfo", json!([pool_id, user])).await
    }

    /// Only meaningful when `capabilities().direct_reward_query` is set.
    pub async fn pending_reward(&self, pool_id: PoolId, user: Address) -> DappResult<TokenAmount> {
        self.contract
            .view::<U128>("pendingReward", json!([pool_id, user]))
            .await
            .map(Into::into)
    }

    pub async fn notifications(&self) -> DappResult<Vec<Notification>> {
        self.contract.view("getNotifications", json!([])).await
    }

    pub fn deposit(&self, pool_id: PoolId, amount: TokenAmount) -> Transaction {
        self.contract.transaction("deposit", json!([pool_id, U128(amount)]))
    }

    pub fn withdraw(&self, pool_id: PoolId, amount: TokenAmount) -> Transaction {
        self.contract.transaction("withdraw", json!([pool_id, U128(amount)]))
    }

    pub fn claim_reward(&self, pool_id: PoolId) -> Transaction {
        self.contract.transaction("claimReward", json!([pool_id]))
    }

    pub fn add_pool(&self, deposit_token: Address, reward_token: Address, apy: u64, lock_days: u64) -> Transaction {
        self.contract
            .transaction("addPool", json!([deposit_token, reward_token, apy, lock_days]))
    }

    pub fn modify_pool(&self, pool_id: PoolId, apy: u64) -> Transaction {
        self.contract.transaction("modifyPool", json!([pool_id, apy]))
    }

    pub fn sweep(&self, token: Address, amount: TokenAmount) -> Transaction {
        self.contract.transaction("sweep", json!([token, U128(amount)]))
    }
}
