use serde::{Deserialize, Serialize};

use crate::{token::TokenMetadata, Address, PoolId, Timestamp, TokenAmount, UDecimal, U128};

/// The `PoolDescriptor` struct describes the terms of a staking pool as stored by the staking contract.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDescriptor {
    /// Token users stake into the pool.
    pub deposit_token: Address,

    /// Token the pool pays rewards in.
    pub reward_token: Address,

    /// Annual yield rate in percentage points.
    pub apy: u64,

    /// Lock duration in the contract's time units. Rewards stop accruing once it elapses.
    pub lock_days: u64,

    /// Total raw amount deposited into the pool by all users.
    pub deposited_amount: U128,
}

/// A user's stake in a single pool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPosition {
    /// Raw staked amount of the pool's deposit token.
    pub amount: U128,

    /// Last time rewards were settled for this position.
    pub last_reward_at: Timestamp,

    /// Time until which the stake can't be withdrawn. Older contracts don't report it.
    #[serde(default)]
    pub lock_until: Option<Timestamp>,
}

impl UserPosition {
    pub fn staked(&self) -> TokenAmount {
        self.amount.0
    }
}

/// Where a pending reward value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardSource {
    /// Returned by the contract's `pendingReward` view.
    Contract,
    /// Calculated locally because the contract has no `pendingReward` view.
    Local,
}

/// A pool combined with the caller's position in it, ready for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolEntry {
    pub pool_id: PoolId,
    pub descriptor: PoolDescriptor,
    pub position: UserPosition,
    pub deposit_token: TokenMetadata,
    pub reward_token: TokenMetadata,

    /// Caller's staked amount scaled by the deposit token's decimals.
    pub deposited_amount: UDecimal,

    /// Raw pending reward in the reward token.
    pub pending_reward_raw: U128,

    /// Pending reward scaled by the reward token's decimals.
    pub pending_reward: UDecimal,

    pub reward_source: RewardSource,
}

impl PoolEntry {
    pub fn apy(&self) -> u64 {
        self.descriptor.apy
    }

    pub fn lock_days(&self) -> u64 {
        self.descriptor.lock_days
    }
}
