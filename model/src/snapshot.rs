use serde::Serialize;

use crate::{notification::NotificationView, pool::PoolEntry, token::TokenMetadata, Address, PoolId, UDecimal};

/// Everything the presentation layer needs about the staking contract and the caller's positions,
/// assembled in a single aggregation pass.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeSnapshot {
    pub contract_owner: Address,
    pub contract_address: Address,

    /// Most recent first.
    pub notifications: Vec<NotificationView>,

    pub deposit_token: TokenMetadata,
    pub reward_token: TokenMetadata,

    /// One entry per pool, ordered by pool id.
    pub pools: Vec<PoolEntry>,

    /// Sum of the caller's deposits across all pools.
    pub total_deposited: UDecimal,

    /// Staking contract's balance of the project deposit token net of `total_deposited`.
    pub available_supply: UDecimal,
}

impl StakeSnapshot {
    pub fn pool(&self, pool_id: PoolId) -> Option<&PoolEntry> {
        self.pools.iter().find(|pool| pool.pool_id == pool_id)
    }
}
