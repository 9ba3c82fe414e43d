use serde_json::json;
use staking_dapp_model::{transaction::Transaction, Address, TokenAmount, U128};

use super::Contract;
use crate::error::DappResult;

/// Typed handle to a fungible token contract.
#[derive(Clone)]
pub struct TokenContract {
    contract: Contract,
}

impl TokenContract {
    pub(crate) fn new(contract: Contract) -> Self {
        Self { contract }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub async fn name(&self) -> DappResult<String> {
        self.contract.view("name", json!([])).await
    }

    pub async fn symbol(&self) -> DappResult<String> {
        self.contract.view("symbol", json!([])).await
    }

    pub async fn decimals(&self) -> DappResult<u8> {
        self.contract.view("decimals", json!([])).await
    }

    pub async fn total_supply(&self) -> DappResult<TokenAmount> {
        self.contract.view::<U128>("totalSupply", json!([])).await.map(Into::into)
    }

    pub async fn balance_of(&self, owner: Address) -> DappResult<TokenAmount> {
        self.contract
            .view::<U128>("balanceOf", json!([owner]))
            .await
            .map(Into::into)
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> DappResult<TokenAmount> {
        self.contract
            .view::<U128>("allowance", json!([owner, spender]))
            .await
            .map(Into::into)
    }

    pub fn approve(&self, spender: Address, amount: TokenAmount) -> Transaction {
        self.contract.transaction("approve", json!([spender, U128(amount)]))
    }

    pub fn transfer(&self, to: Address, amount: TokenAmount) -> Transaction {
        self.contract.transaction("transfer", json!([to, U128(amount)]))
    }
}
