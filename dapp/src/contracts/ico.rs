use serde_json::json;
use staking_dapp_model::{ico::IcoTokenDetails, transaction::Transaction, Address, TokenAmount, U128};

use super::Contract;
use crate::error::DappResult;

/// Typed handle to the token sale contract.
#[derive(Clone)]
pub struct IcoContract {
    contract: Contract,
}

impl IcoContract {
    pub(crate) fn new(contract: Contract) -> Self {
        Self { contract }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub async fn owner(&self) -> DappResult<Address> {
        self.contract.view("owner", json!([])).await
    }

    pub async fn token_address(&self) -> DappResult<Address> {
        self.contract.view("tokenAddress", json!([])).await
    }

    pub async fn sold_tokens(&self) -> DappResult<u64> {
        self.contract.view("soldTokens", json!([])).await
    }

    pub async fn token_details(&self) -> DappResult<IcoTokenDetails> {
        self.contract.view("getTokenDetails", json!([])).await
    }

    /// Buys `amount` whole tokens paying `cost` in the native currency.
    pub fn buy_token(&self, amount: u64, cost: TokenAmount) -> Transaction {
        self.contract
            .transaction("buyToken", json!([amount]))
            .with_value(cost)
    }

    pub fn withdraw_all_tokens(&self) -> Transaction {
        self.contract.transaction("withdrawAllTokens", json!([]))
    }

    pub fn update_token(&self, token: Address) -> Transaction {
        self.contract.transaction("updateToken", json!([token]))
    }

    pub fn update_token_sale_price(&self, price: TokenAmount) -> Transaction {
        self.contract.transaction("updateTokenSalePrice", json!([U128(price)]))
    }
}
