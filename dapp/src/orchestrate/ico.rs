use staking_dapp_model::{ico::IcoTokenDetails, parse_units, transaction::Receipt, NATIVE_DECIMALS};
use tracing::debug;

use super::{address, required, whole_number, Flow, OperationKind, Orchestrator};
use crate::{
    contracts::IcoContract,
    error::{DappError, DappResult},
};

const NOTHING_FOR_SALE: &str = "Insufficient tokens available for purchase/withdrawal";

impl Orchestrator {
    /// Buys `amount` whole tokens, paying the sale price for each in the native currency.
    pub async fn buy(&self, amount: &str) -> DappResult<Receipt> {
        let mut flow = self.flow(OperationKind::Buy);
        let result = self.buy_flow(&mut flow, amount).await;
        flow.finish(result, "Token purchased successfully")
    }

    async fn buy_flow(&self, flow: &mut Flow<'_>, amount: &str) -> DappResult<Receipt> {
        flow.validating()?;
        let amount = whole_number("Amount", amount)?;
        if amount == 0 {
            return Err(DappError::validation("Amount should be greater than 0"));
        }

        let ico = self.connector.ico().await?;
        let details = ensure_tokens_left(&ico).await?;

        let cost = details
            .token_price
            .0
            .checked_mul(amount.into())
            .ok_or_else(|| DappError::validation("Purchase amount is too large"))?;
        debug!(amount, cost, "token purchase priced");

        flow.progress("Calling ICO contract...");
        self.execute(flow, ico.buy_token(amount, cost)).await
    }

    /// Returns every unsold token to the sale owner.
    pub async fn withdraw_all(&self) -> DappResult<Receipt> {
        let mut flow = self.flow(OperationKind::WithdrawAll);
        let result = self.withdraw_all_flow(&mut flow).await;
        flow.finish(result, "Transaction completed successfully")
    }

    async fn withdraw_all_flow(&self, flow: &mut Flow<'_>) -> DappResult<Receipt> {
        flow.validating()?;

        let ico = self.connector.ico().await?;
        ensure_tokens_left(&ico).await?;

        flow.progress("Calling ICO contract...");
        self.execute(flow, ico.withdraw_all_tokens()).await
    }

    pub async fn update_token_address(&self, token: &str) -> DappResult<Receipt> {
        let mut flow = self.flow(OperationKind::UpdateTokenAddress);
        let result = self.update_token_address_flow(&mut flow, token).await;
        flow.finish(result, "Transaction completed successfully")
    }

    async fn update_token_address_flow(&self, flow: &mut Flow<'_>, token: &str) -> DappResult<Receipt> {
        flow.validating()?;
        let token = address(token)?;

        let ico = self.connector.ico().await?;

        flow.progress("Calling ICO contract...");
        self.execute(flow, ico.update_token(token)).await
    }

    /// Sets the price of one whole token, `price` is in the native currency.
    pub async fn update_token_price(&self, price: &str) -> DappResult<Receipt> {
        let mut flow = self.flow(OperationKind::UpdateTokenPrice);
        let result = self.update_token_price_flow(&mut flow, price).await;
        flow.finish(result, "Transaction completed successfully")
    }

    async fn update_token_price_flow(&self, flow: &mut Flow<'_>, price: &str) -> DappResult<Receipt> {
        flow.validating()?;
        let price = parse_units(required(price)?, NATIVE_DECIMALS)?;

        let ico = self.connector.ico().await?;

        flow.progress("Calling ICO contract...");
        self.execute(flow, ico.update_token_sale_price(price)).await
    }
}

async fn ensure_tokens_left(ico: &IcoContract) -> DappResult<IcoTokenDetails> {
    let details = ico.token_details().await?;
    if details.balance.0 == 0 {
        return Err(DappError::validation(NOTHING_FOR_SALE));
    }
    Ok(details)
}
