use std::collections::HashMap;

use serde_json::{json, Value};

use super::chain::{arg, require};
use crate::{
    api::{RpcError, RpcResult},
    Address, TokenAmount, U128,
};

/// Fungible token with the standard ERC-20 surface.
#[derive(Clone)]
pub(crate) struct TokenState {
    name: String,
    symbol: String,
    pub decimals: u8,
    total_supply: TokenAmount,
    balances: HashMap<Address, TokenAmount>,
    allowances: HashMap<(Address, Address), TokenAmount>,
}

impl TokenState {
    pub const INTERFACE: &'static [&'static str] = &[
        "name",
        "symbol",
        "decimals",
        "totalSupply",
        "balanceOf",
        "allowance",
        "approve",
        "transfer",
    ];

    pub fn new(name: &str, symbol: &str, decimals: u8, supply: TokenAmount, holder: Address) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            total_supply: supply,
            balances: HashMap::from([(holder, supply)]),
            allowances: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn total_supply(&self) -> TokenAmount {
        self.total_supply
    }

    pub fn balance_of(&self, owner: &Address) -> TokenAmount {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> TokenAmount {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or_default()
    }

    pub fn transfer(&mut self, from: Address, to: Address, amount: TokenAmount) -> RpcResult<()> {
        let balance = self.balance_of(&from);
        require(balance >= amount, "ERC20: transfer amount exceeds balance")?;

        self.balances.insert(from, balance - amount);
        *self.balances.entry(to).or_default() += amount;

        Ok(())
    }

    pub fn transfer_from(&mut self, spender: Address, from: Address, to: Address, amount: TokenAmount) -> RpcResult<()> {
        let allowance = self.allowance(&from, &spender);
        require(allowance >= amount, "ERC20: insufficient allowance")?;

        self.transfer(from, to, amount)?;
        self.allowances.insert((from, spender), allowance - amount);

        Ok(())
    }

    pub fn view(&self, method: &str, args: &Value) -> RpcResult<Value> {
        let result = match method {
            "name" => json!(self.name),
            "symbol" => json!(self.symbol),
            "decimals" => json!(self.decimals),
            "totalSupply" => json!(U128(self.total_supply)),
            "balanceOf" => json!(U128(self.balance_of(&arg(args, 0)?))),
            "allowance" => json!(U128(self.allowance(&arg(args, 0)?, &arg(args, 1)?))),
            _ => return Err(RpcError::Reverted { reason: None }),
        };

        Ok(result)
    }

    pub fn execute(&mut self, from: Address, method: &str, args: &Value) -> RpcResult<()> {
        match method {
            "approve" => {
                let spender: Address = arg(args, 0)?;
                let amount: U128 = arg(args, 1)?;
                self.allowances.insert((from, spender), amount.0);
                Ok(())
            }
            "transfer" => {
                let to: Address = arg(args, 0)?;
                let amount: U128 = arg(args, 1)?;
                require(!to.is_zero(), "ERC20: transfer to the zero address")?;
                self.transfer(from, to, amount.0)
            }
            _ => Err(RpcError::Reverted { reason: None }),
        }
    }
}
