use serde::Serialize;

use crate::{Address, UDecimal};

/// Token metadata resolved for a particular owner. Derived fresh on every aggregation pass.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,

    /// Owner's balance of the token.
    pub balance: UDecimal,

    pub total_supply: UDecimal,

    /// Balance of the token held by the staking contract.
    pub contract_balance: UDecimal,
}

/// Parameters a wallet needs to start tracking a token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WatchAsset {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    pub image: String,
}
