use serde::{Deserialize, Serialize};

use crate::{token::TokenMetadata, Address, UDecimal, U128};

/// Sale details as returned by the ICO contract's `getTokenDetails` view. Amounts are raw.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IcoTokenDetails {
    pub name: String,
    pub symbol: String,

    /// Tokens held by the ICO contract and available for sale.
    pub balance: U128,

    pub supply: U128,

    /// Price of one whole token in the native currency's smallest unit.
    pub token_price: U128,

    pub token_addr: Address,
}

/// State of the token sale prepared for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IcoSnapshot {
    pub token_address: Address,
    pub name: String,
    pub symbol: String,
    pub available: UDecimal,
    pub supply: UDecimal,
    pub token_price: UDecimal,
    pub owner: Address,
    pub sold_tokens: u64,

    /// Caller's view of the sold token.
    pub token: TokenMetadata,

    /// Caller's balance of the native currency.
    pub native_balance: UDecimal,
}
