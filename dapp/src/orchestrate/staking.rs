use staking_dapp_model::{parse_units, transaction::Receipt, PoolId, TokenAmount};
use tracing::debug;

use super::{address, amount_text, whole_number, Flow, FlowState, OperationKind, Orchestrator};
use crate::{contracts::TokenContract, error::DappResult};

/// Terms of a new pool as entered by the administrator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolTerms {
    pub deposit_token: String,
    pub reward_token: String,

    /// Annual yield rate in whole percentage points.
    pub apy: String,

    /// Lock duration in the contract's time units.
    pub lock_days: String,
}

impl Orchestrator {
    /// Stakes `amount` of the pool's deposit token, approving the staking contract first when
    /// the current allowance doesn't cover it.
    pub async fn stake(&self, pool_id: PoolId, amount: &str) -> DappResult<Receipt> {
        let mut flow = self.flow(OperationKind::Stake);
        let result = self.stake_flow(&mut flow, pool_id, amount).await;
        flow.finish(result, "Token staked successfully")
    }

    async fn stake_flow(&self, flow: &mut Flow<'_>, pool_id: PoolId, amount: &str) -> DappResult<Receipt> {
        flow.validating()?;
        let amount = amount_text(amount)?;

        let staking = self.connector.staking().await?;
        let pool = staking.pool_info(pool_id).await?;
        let token = self.connector.token(pool.deposit_token).await?;
        let amount = token_amount(&token, amount).await?;

        let signer = self.connector.signer().await?;
        let allowance = token.allowance(signer, staking.address()).await?;
        debug!(pool_id, allowance, amount, "allowance checked");

        if allowance < amount {
            flow.enter(FlowState::Approving);
            flow.progress("Approving token...");
            self.prerequisite(flow, token.approve(staking.address(), amount)).await?;
        }

        flow.progress("Staking token call...");
        self.execute(flow, staking.deposit(pool_id, amount)).await
    }

    pub async fn unstake(&self, pool_id: PoolId, amount: &str) -> DappResult<Receipt> {
        let mut flow = self.flow(OperationKind::Unstake);
        let result = self.unstake_flow(&mut flow, pool_id, amount).await;
        flow.finish(result, "Transaction successfully completed")
    }

    async fn unstake_flow(&self, flow: &mut Flow<'_>, pool_id: PoolId, amount: &str) -> DappResult<Receipt> {
        flow.validating()?;
        let amount = amount_text(amount)?;

        let staking = self.connector.staking().await?;
        let pool = staking.pool_info(pool_id).await?;
        let token = self.connector.token(pool.deposit_token).await?;
        let amount = token_amount(&token, amount).await?;

        flow.progress("Calling contract...");
        self.execute(flow, staking.withdraw(pool_id, amount)).await
    }

    pub async fn claim(&self, pool_id: PoolId) -> DappResult<Receipt> {
        let mut flow = self.flow(OperationKind::Claim);
        let result = self.claim_flow(&mut flow, pool_id).await;
        flow.finish(result, "Transaction successfully completed")
    }

    async fn claim_flow(&self, flow: &mut Flow<'_>, pool_id: PoolId) -> DappResult<Receipt> {
        flow.validating()?;

        let staking = self.connector.staking().await?;

        flow.progress("Calling contract...");
        self.execute(flow, staking.claim_reward(pool_id)).await
    }

    /// Sends `amount` of the project deposit token to `to`.
    pub async fn transfer(&self, to: &str, amount: &str) -> DappResult<Receipt> {
        let mut flow = self.flow(OperationKind::Transfer);
        let result = self.transfer_flow(&mut flow, to, amount).await;
        flow.finish(result, "Token transferred successfully")
    }

    async fn transfer_flow(&self, flow: &mut Flow<'_>, to: &str, amount: &str) -> DappResult<Receipt> {
        flow.validating()?;
        let to = address(to)?;
        let amount = amount_text(amount)?;

        let token = self.connector.token(self.connector.config().deposit_token).await?;
        let amount = token_amount(&token, amount).await?;

        flow.progress("Calling token transfer...");
        self.execute(flow, token.transfer(to, amount)).await
    }

    pub async fn add_pool(&self, terms: &PoolTerms) -> DappResult<Receipt> {
        let mut flow = self.flow(OperationKind::AddPool);
        let result = self.add_pool_flow(&mut flow, terms).await;
        flow.finish(result, "Pool created successfully")
    }

    async fn add_pool_flow(&self, flow: &mut Flow<'_>, terms: &PoolTerms) -> DappResult<Receipt> {
        flow.validating()?;
        let deposit_token = address(&terms.deposit_token)?;
        let reward_token = address(&terms.reward_token)?;
        let apy = whole_number("APY", &terms.apy)?;
        let lock_days = whole_number("Lock duration", &terms.lock_days)?;

        let staking = self.connector.staking().await?;

        flow.progress("Calling contract...");
        self.execute(flow, staking.add_pool(deposit_token, reward_token, apy, lock_days))
            .await
    }

    /// Sets a new annual yield rate for the pool.
    pub async fn modify_pool(&self, pool_id: PoolId, apy: &str) -> DappResult<Receipt> {
        let mut flow = self.flow(OperationKind::ModifyPool);
        let result = self.modify_pool_flow(&mut flow, pool_id, apy).await;
        flow.finish(result, "Pool modified successfully")
    }

    async fn modify_pool_flow(&self, flow: &mut Flow<'_>, pool_id: PoolId, apy: &str) -> DappResult<Receipt> {
        flow.validating()?;
        let apy = whole_number("APY", apy)?;

        let staking = self.connector.staking().await?;

        flow.progress("Calling contract...");
        self.execute(flow, staking.modify_pool(pool_id, apy)).await
    }

    /// Moves `amount` of `token` held by the staking contract to its owner.
    pub async fn sweep(&self, token: &str, amount: &str) -> DappResult<Receipt> {
        let mut flow = self.flow(OperationKind::Sweep);
        let result = self.sweep_flow(&mut flow, token, amount).await;
        flow.finish(result, "Transaction successfully completed")
    }

    async fn sweep_flow(&self, flow: &mut Flow<'_>, token: &str, amount: &str) -> DappResult<Receipt> {
        flow.validating()?;
        let token = address(token)?;
        let amount = amount_text(amount)?;

        let staking = self.connector.staking().await?;
        let token = self.connector.token(token).await?;
        let amount = token_amount(&token, amount).await?;

        flow.progress("Calling contract...");
        self.execute(flow, staking.sweep(token.address(), amount)).await
    }
}

/// Converts a human-entered amount with the decimals `token` reports.
async fn token_amount(token: &TokenContract, amount: &str) -> DappResult<TokenAmount> {
    let decimals = token.decimals().await?;
    Ok(parse_units(amount, decimals)?)
}
