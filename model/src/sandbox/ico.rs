use serde_json::{json, Value};

use super::chain::{arg, require, Chain};
use crate::{
    api::{RpcError, RpcResult},
    ico::IcoTokenDetails,
    Address, TokenAmount, U128,
};

/// Fixed-price token sale paid in the native currency.
#[derive(Clone)]
pub(crate) struct IcoState {
    owner: Address,
    token: Address,
    price: TokenAmount,
    sold: u64,
}

impl IcoState {
    pub const INTERFACE: &'static [&'static str] = &[
        "owner",
        "tokenAddress",
        "soldTokens",
        "getTokenDetails",
        "buyToken",
        "withdrawAllTokens",
        "updateToken",
        "updateTokenSalePrice",
    ];

    pub fn new(owner: Address, token: Address, price: TokenAmount) -> Self {
        Self {
            owner,
            token,
            price,
            sold: 0,
        }
    }
}

impl Chain {
    pub(super) fn ico_view(&self, address: &Address, method: &str, _args: &Value) -> RpcResult<Value> {
        let ico = self.ico(address)?;

        let result = match method {
            "owner" => json!(ico.owner),
            "tokenAddress" => json!(ico.token),
            "soldTokens" => json!(ico.sold),
            "getTokenDetails" => {
                let token = self.token(&ico.token)?;
                json!(IcoTokenDetails {
                    name: token.name().to_string(),
                    symbol: token.symbol().to_string(),
                    balance: U128(token.balance_of(address)),
                    supply: U128(token.total_supply()),
                    token_price: U128(ico.price),
                    token_addr: ico.token,
                })
            }
            _ => return Err(RpcError::Reverted { reason: None }),
        };

        Ok(result)
    }

    pub(super) fn ico_execute(
        &mut self,
        address: &Address,
        from: Address,
        method: &str,
        args: &Value,
        value: TokenAmount,
    ) -> RpcResult<()> {
        let contract = *address;
        let mut ico = self.ico(address)?.clone();

        if method != "buyToken" {
            require(value == 0, "non-payable method")?;
        }

        match method {
            "buyToken" => {
                let amount: u64 = arg(args, 0)?;
                let cost = ico
                    .price
                    .checked_mul(amount.into())
                    .ok_or_else(|| RpcError::reverted("arithmetic overflow"))?;
                require(value == cost, "Insufficient Ether provided for the token purchase")?;

                let token = self.token_mut(&ico.token)?;
                let units = 10u128
                    .checked_pow(token.decimals.into())
                    .and_then(|scale| scale.checked_mul(amount.into()))
                    .ok_or_else(|| RpcError::reverted("arithmetic overflow"))?;
                require(token.balance_of(&contract) >= units, "Not enough tokens left for sale")?;
                token.transfer(contract, from, units)?;

                ico.sold += amount;
            }
            "withdrawAllTokens" => {
                require(from == ico.owner, "Only owner can perform this action")?;
                let token = self.token_mut(&ico.token)?;
                let balance = token.balance_of(&contract);
                require(balance > 0, "No tokens to withdraw")?;
                token.transfer(contract, ico.owner, balance)?;
            }
            "updateToken" => {
                require(from == ico.owner, "Only owner can perform this action")?;
                ico.token = arg(args, 0)?;
            }
            "updateTokenSalePrice" => {
                require(from == ico.owner, "Only owner can perform this action")?;
                let price: U128 = arg(args, 0)?;
                ico.price = price.0;
            }
            _ => return Err(RpcError::Reverted { reason: None }),
        }

        *self.ico_mut(address)? = ico;
        Ok(())
    }
}
