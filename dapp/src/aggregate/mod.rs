mod tests;

use std::sync::Arc;

use futures::{future::try_join_all, try_join};
use staking_dapp_model::{
    ico::IcoSnapshot,
    notification::{Notification, NotificationView},
    pool::{PoolEntry, RewardSource},
    readable_timestamp,
    snapshot::StakeSnapshot,
    Address, PoolId, Timestamp, UDecimal, DEFAULT_DECIMALS, NATIVE_DECIMALS,
};
use tracing::{debug, instrument};

use crate::{
    connector::Connector,
    contracts::StakingContract,
    error::{DappError, DappResult},
    notify::{report, Notifier},
    resolver::TokenResolver,
};

/// Assembles snapshots of the staking contract and of the token sale.
///
/// Every pass reads everything anew. Any failed step aborts the pass, only descriptive token
/// fields may degrade as the resolver's policy allows.
pub struct Aggregator {
    connector: Arc<Connector>,
    resolver: Arc<TokenResolver>,
    notifier: Arc<dyn Notifier>,
}

impl Aggregator {
    pub fn new(connector: Arc<Connector>, resolver: Arc<TokenResolver>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            connector,
            resolver,
            notifier,
        }
    }

    /// Snapshot of every pool and of the position of `user` in it.
    pub async fn aggregate(&self, user: &str) -> DappResult<StakeSnapshot> {
        let result = match parse_user(user) {
            Ok(user) => self.snapshot(user).await,
            Err(error) => Err(error),
        };

        result.map_err(|error| {
            report(self.notifier.as_ref(), "aggregate", &error);
            error
        })
    }

    /// Token sale state for `user`, `None` when the sale has no token configured.
    pub async fn load_ico(&self, user: &str) -> DappResult<Option<IcoSnapshot>> {
        let result = match parse_user(user) {
            Ok(user) => self.ico_snapshot(user).await,
            Err(error) => Err(error),
        };

        result.map_err(|error| {
            report(self.notifier.as_ref(), "load ICO", &error);
            error
        })
    }

    #[instrument(skip(self))]
    async fn snapshot(&self, user: Address) -> DappResult<StakeSnapshot> {
        let staking = self.connector.staking().await?;

        let (contract_owner, pool_count, notifications) =
            try_join!(staking.owner(), staking.pool_count(), staking.notifications())?;

        let now = if staking.capabilities().direct_reward_query {
            None
        } else {
            Some(self.connector.now().await?)
        };

        debug!(pool_count, local_rewards = now.is_some(), "aggregating pools");

        let config = self.connector.config();
        let (pools, deposit_token, reward_token) = try_join!(
            try_join_all((0..pool_count).map(|pool_id| self.pool_entry(&staking, pool_id, user, now))),
            self.resolver.resolve(config.deposit_token, user),
            self.resolver.resolve(config.reward_token, user),
        )?;

        let total_deposited: UDecimal = pools.iter().map(|pool| pool.deposited_amount).sum();
        let available_supply = deposit_token.contract_balance.saturating_sub(total_deposited);

        Ok(StakeSnapshot {
            contract_owner,
            contract_address: staking.address(),
            notifications: notification_views(notifications, &pools),
            deposit_token,
            reward_token,
            pools,
            total_deposited,
            available_supply,
        })
    }

    async fn pool_entry(
        &self,
        staking: &StakingContract,
        pool_id: PoolId,
        user: Address,
        now: Option<Timestamp>,
    ) -> DappResult<PoolEntry> {
        let (descriptor, position) = try_join!(staking.pool_info(pool_id), staking.user_info(pool_id, user))?;

        let (deposit_token, reward_token) = try_join!(
            self.resolver.resolve(descriptor.deposit_token, user),
            self.resolver.resolve(descriptor.reward_token, user),
        )?;

        let (pending_reward, reward_source) = match now {
            None => (staking.pending_reward(pool_id, user).await?, RewardSource::Contract),
            Some(now) => {
                let reward = self.connector.config().reward_schedule.pending_reward(
                    position.staked(),
                    position.last_reward_at,
                    now,
                    descriptor.lock_days,
                    descriptor.apy,
                )?;
                (reward, RewardSource::Local)
            }
        };

        Ok(PoolEntry {
            pool_id,
            deposited_amount: UDecimal::from_raw(position.staked(), deposit_token.decimals),
            pending_reward_raw: pending_reward.into(),
            pending_reward: UDecimal::from_raw(pending_reward, reward_token.decimals),
            reward_source,
            descriptor,
            position,
            deposit_token,
            reward_token,
        })
    }

    async fn ico_snapshot(&self, user: Address) -> DappResult<Option<IcoSnapshot>> {
        let ico = self.connector.ico().await?;

        let token_address = ico.token_address().await?;
        if token_address.is_zero() {
            debug!(ico = %ico.address(), "token sale has no token");
            return Ok(None);
        }

        let (details, owner, sold_tokens) = try_join!(ico.token_details(), ico.owner(), ico.sold_tokens())?;
        let (token, native_balance) = try_join!(
            self.resolver.resolve(details.token_addr, user),
            self.connector.native_balance(user),
        )?;

        Ok(Some(IcoSnapshot {
            token_address,
            name: details.name,
            symbol: details.symbol,
            available: UDecimal::from_raw(details.balance.0, token.decimals),
            supply: UDecimal::from_raw(details.supply.0, token.decimals),
            token_price: UDecimal::from_raw(details.token_price.0, NATIVE_DECIMALS),
            owner,
            sold_tokens,
            token,
            native_balance: UDecimal::from_raw(native_balance, NATIVE_DECIMALS),
        }))
    }
}

fn parse_user(user: &str) -> DappResult<Address> {
    let user = user.trim();
    if user.is_empty() {
        return Err(DappError::validation("User address is required"));
    }

    user.parse::<Address>()
        .map_err(|error| DappError::validation(format!("Invalid user address: {error}")))
}

/// Most recent first, amounts in the decimals of the pool's deposit token.
fn notification_views(notifications: Vec<Notification>, pools: &[PoolEntry]) -> Vec<NotificationView> {
    notifications
        .into_iter()
        .rev()
        .map(|notification| {
            // Activity of a pool missing from the snapshot is shown with the common ERC-20 precision
            let decimals = pools
                .iter()
                .find(|pool| pool.pool_id == notification.pool_id)
                .map_or(DEFAULT_DECIMALS, |pool| pool.deposit_token.decimals);

            NotificationView {
                pool_id: notification.pool_id,
                amount: UDecimal::from_raw(notification.amount.0, decimals),
                user: notification.user,
                kind: notification.kind,
                date: readable_timestamp(notification.timestamp),
                timestamp: notification.timestamp,
            }
        })
        .collect()
}
