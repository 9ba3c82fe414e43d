use std::collections::HashMap;

use serde_json::{json, Value};

use super::chain::{arg, require, Chain};
use crate::{
    api::{RpcError, RpcResult},
    notification::{Notification, NotificationKind},
    pool::{PoolDescriptor, UserPosition},
    Address, PoolId, Timestamp, TokenAmount, SECONDS_IN_MINUTE, U128,
};

const UNITS_IN_YEAR: u128 = 360;

#[derive(Clone)]
struct PoolState {
    deposit_token: Address,
    reward_token: Address,
    apy: u64,
    lock_days: u64,
    deposited: TokenAmount,
}

#[derive(Clone, Default)]
struct UserState {
    amount: TokenAmount,
    last_reward_at: Timestamp,
    lock_until: Timestamp,
}

/// Multi-pool staking contract. Lock and accrual periods are counted in minutes.
#[derive(Clone)]
pub(crate) struct StakingState {
    owner: Address,
    pools: Vec<PoolState>,
    users: HashMap<(PoolId, Address), UserState>,
    notifications: Vec<Notification>,
}

impl StakingState {
    pub const INTERFACE: &'static [&'static str] = &[
        "owner",
        "poolCount",
        "poolInfo",
        "userInfo",
        "pendingReward",
        "getNotifications",
        "deposit",
        "withdraw",
        "claimReward",
        "addPool",
        "modifyPool",
        "sweep",
    ];

    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            pools: Vec::new(),
            users: HashMap::new(),
            notifications: Vec::new(),
        }
    }

    fn pool(&self, pool_id: PoolId) -> RpcResult<&PoolState> {
        usize::try_from(pool_id)
            .ok()
            .and_then(|index| self.pools.get(index))
            .ok_or_else(|| RpcError::reverted("Invalid pool"))
    }

    fn pool_mut(&mut self, pool_id: PoolId) -> RpcResult<&mut PoolState> {
        usize::try_from(pool_id)
            .ok()
            .and_then(|index| self.pools.get_mut(index))
            .ok_or_else(|| RpcError::reverted("Invalid pool"))
    }

    fn user(&self, pool_id: PoolId, user: &Address) -> UserState {
        self.users.get(&(pool_id, *user)).cloned().unwrap_or_default()
    }

    fn only_owner(&self, caller: &Address) -> RpcResult<()> {
        require(*caller == self.owner, "Ownable: caller is not the owner")
    }

    fn pending_reward(&self, pool_id: PoolId, user: &Address, now: Timestamp) -> RpcResult<TokenAmount> {
        let pool = self.pool(pool_id)?;
        let user = self.user(pool_id, user);

        let mut days_passed = now.saturating_sub(user.last_reward_at) / SECONDS_IN_MINUTE;
        if days_passed > pool.lock_days {
            days_passed = pool.lock_days;
        }

        user.amount
            .checked_mul(days_passed.into())
            .and_then(|value| value.checked_mul(pool.apy.into()))
            .map(|value| value / UNITS_IN_YEAR / 100)
            .ok_or_else(|| RpcError::reverted("arithmetic overflow"))
    }

    fn notify(&mut self, pool_id: PoolId, amount: TokenAmount, user: Address, kind: NotificationKind, now: Timestamp) {
        self.notifications.push(Notification {
            pool_id,
            amount: U128(amount),
            user,
            kind,
            timestamp: now,
        });
    }
}

impl Chain {
    pub(super) fn staking_view(&self, address: &Address, method: &str, args: &Value) -> RpcResult<Value> {
        let staking = self.staking(address)?;

        let result = match method {
            "owner" => json!(staking.owner),
            "poolCount" => json!(staking.pools.len()),
            "poolInfo" => {
                let pool = staking.pool(arg(args, 0)?)?;
                json!(PoolDescriptor {
                    deposit_token: pool.deposit_token,
                    reward_token: pool.reward_token,
                    apy: pool.apy,
                    lock_days: pool.lock_days,
                    deposited_amount: U128(pool.deposited),
                })
            }
            "userInfo" => {
                let pool_id: PoolId = arg(args, 0)?;
                staking.pool(pool_id)?;
                let user = staking.user(pool_id, &arg(args, 1)?);
                json!(UserPosition {
                    amount: U128(user.amount),
                    last_reward_at: user.last_reward_at,
                    lock_until: Some(user.lock_until),
                })
            }
            "pendingReward" => json!(U128(staking.pending_reward(arg(args, 0)?, &arg(args, 1)?, self.now)?)),
            "getNotifications" => json!(staking.notifications),
            _ => return Err(RpcError::Reverted { reason: None }),
        };

        Ok(result)
    }

    pub(super) fn staking_execute(&mut self, address: &Address, from: Address, method: &str, args: &Value) -> RpcResult<()> {
        let contract = *address;
        let now = self.now;
        let mut staking = self.staking(address)?.clone();

        match method {
            "deposit" => {
                let pool_id: PoolId = arg(args, 0)?;
                let amount: U128 = arg(args, 1)?;
                require(amount.0 > 0, "Amount should be greater than 0")?;

                let pool = staking.pool(pool_id)?.clone();
                let mut user = staking.user(pool_id, &from);

                if user.amount > 0 {
                    let pending = staking.pending_reward(pool_id, &from, now)?;
                    self.token_mut(&pool.reward_token)?.transfer(contract, from, pending)?;
                }

                self.token_mut(&pool.deposit_token)?
                    .transfer_from(contract, from, contract, amount.0)?;

                user.amount += amount.0;
                user.last_reward_at = now;
                user.lock_until = now + pool.lock_days * SECONDS_IN_MINUTE;
                staking.users.insert((pool_id, from), user);
                staking.pool_mut(pool_id)?.deposited += amount.0;
                staking.notify(pool_id, amount.0, from, NotificationKind::Deposit, now);
            }
            "withdraw" => {
                let pool_id: PoolId = arg(args, 0)?;
                let amount: U128 = arg(args, 1)?;

                let pool = staking.pool(pool_id)?.clone();
                let mut user = staking.user(pool_id, &from);
                require(user.amount >= amount.0, "Withdraw amount exceed the balance")?;
                require(user.lock_until <= now, "Lock is active")?;

                let pending = staking.pending_reward(pool_id, &from, now)?;
                if pending > 0 {
                    self.token_mut(&pool.reward_token)?.transfer(contract, from, pending)?;
                }

                self.token_mut(&pool.deposit_token)?.transfer(contract, from, amount.0)?;

                user.amount -= amount.0;
                user.last_reward_at = now;
                staking.users.insert((pool_id, from), user);
                staking.pool_mut(pool_id)?.deposited -= amount.0;
                staking.notify(pool_id, amount.0, from, NotificationKind::Withdraw, now);
            }
            "claimReward" => {
                let pool_id: PoolId = arg(args, 0)?;
                let pool = staking.pool(pool_id)?.clone();

                let pending = staking.pending_reward(pool_id, &from, now)?;
                require(pending > 0, "No reward to claim")?;

                self.token_mut(&pool.reward_token)?.transfer(contract, from, pending)?;

                let mut user = staking.user(pool_id, &from);
                user.last_reward_at = now;
                staking.users.insert((pool_id, from), user);
                staking.notify(pool_id, pending, from, NotificationKind::Claim, now);
            }
            "addPool" => {
                staking.only_owner(&from)?;
                let pool = PoolState {
                    deposit_token: arg(args, 0)?,
                    reward_token: arg(args, 1)?,
                    apy: arg(args, 2)?,
                    lock_days: arg(args, 3)?,
                    deposited: 0,
                };
                self.token(&pool.deposit_token)?;
                self.token(&pool.reward_token)?;
                staking.pools.push(pool);
            }
            "modifyPool" => {
                staking.only_owner(&from)?;
                let pool_id: PoolId = arg(args, 0)?;
                staking.pool_mut(pool_id)?.apy = arg(args, 1)?;
            }
            "sweep" => {
                staking.only_owner(&from)?;
                let token: Address = arg(args, 0)?;
                let amount: U128 = arg(args, 1)?;
                self.token_mut(&token)?.transfer(contract, staking.owner, amount.0)?;
            }
            _ => return Err(RpcError::Reverted { reason: None }),
        }

        *self.staking_mut(address)? = staking;
        Ok(())
    }
}
