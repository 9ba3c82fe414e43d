use std::{fmt::Display, sync::Arc};

use futures::join;
use staking_dapp_model::{
    token::{TokenMetadata, WatchAsset},
    Address, UDecimal, DEFAULT_DECIMALS,
};
use tracing::warn;

use crate::{connector::Connector, error::DappResult};

/// Symbol offered to wallets when the token doesn't report one.
const FALLBACK_SYMBOL: &str = "TOKEN";

/// What happens when a descriptive field of a token can't be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Substitute a display default and log a warning.
    #[default]
    Degrade,
    /// Fail the whole resolution.
    Abort,
}

/// Failure handling for the fields of a token resolution.
///
/// Name, symbol, decimals and total supply follow `descriptive`. Balances always abort:
/// downstream totals would be silently wrong with a substituted value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolvePolicy {
    pub descriptive: FieldPolicy,
}

impl ResolvePolicy {
    pub fn strict() -> Self {
        Self {
            descriptive: FieldPolicy::Abort,
        }
    }
}

pub struct TokenResolver {
    connector: Arc<Connector>,
    policy: ResolvePolicy,
}

impl TokenResolver {
    pub fn new(connector: Arc<Connector>, policy: ResolvePolicy) -> Self {
        Self { connector, policy }
    }

    /// Reads every field of `token` concurrently, balances are taken for `owner` and for the staking contract.
    pub async fn resolve(&self, token: Address, owner: Address) -> DappResult<TokenMetadata> {
        let contract = self.connector.token(token).await?;
        let staking = self.connector.config().staking_contract;

        let (name, symbol, decimals, total_supply, balance, contract_balance) = join!(
            contract.name(),
            contract.symbol(),
            contract.decimals(),
            contract.total_supply(),
            contract.balance_of(owner),
            contract.balance_of(staking),
        );

        let balance = balance?;
        let contract_balance = contract_balance?;

        // Most ERC-20 tokens use 18 decimals, the usual display assumption when the token doesn't say
        let decimals = self.field(token, "decimals", decimals, DEFAULT_DECIMALS)?;

        Ok(TokenMetadata {
            address: token,
            name: self.field(token, "name", name, String::new())?,
            symbol: self.field(token, "symbol", symbol, String::new())?,
            decimals,
            balance: UDecimal::from_raw(balance, decimals),
            total_supply: UDecimal::from_raw(self.field(token, "total supply", total_supply, 0)?, decimals),
            contract_balance: UDecimal::from_raw(contract_balance, decimals),
        })
    }

    /// Parameters for listing `token` in the user's wallet. Never fails on missing metadata.
    pub async fn watch_asset(&self, token: Address) -> DappResult<WatchAsset> {
        let contract = self.connector.token(token).await?;

        let (symbol, decimals) = join!(contract.symbol(), contract.decimals());

        let symbol = symbol
            .ok()
            .filter(|symbol| !symbol.is_empty())
            .unwrap_or_else(|| FALLBACK_SYMBOL.to_string());

        // Wallets need some value, and 18 is what most ERC-20 tokens use
        let decimals = decimals.unwrap_or(DEFAULT_DECIMALS);

        Ok(WatchAsset {
            address: token,
            symbol,
            decimals,
            image: self.connector.config().token_logo.clone().unwrap_or_default(),
        })
    }

    fn field<T: Display>(&self, token: Address, field: &str, value: DappResult<T>, default: T) -> DappResult<T> {
        match (value, self.policy.descriptive) {
            (Ok(value), _) => Ok(value),
            (Err(error), FieldPolicy::Degrade) => {
                warn!(%token, field, %error, %default, "token field degraded to default");
                Ok(default)
            }
            (Err(error), FieldPolicy::Abort) => Err(error),
        }
    }
}
