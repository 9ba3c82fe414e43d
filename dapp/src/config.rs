use serde::Deserialize;
use staking_dapp_model::{reward::RewardSchedule, Address};

use crate::error::{DappError, DappResult};

pub const STAKING_CONTRACT_KEY: &str = "STAKING_DAPP_ADDRESS";
pub const DEPOSIT_TOKEN_KEY: &str = "DEPOSIT_TOKEN_ADDRESS";
pub const REWARD_TOKEN_KEY: &str = "REWARD_TOKEN_ADDRESS";
pub const ICO_CONTRACT_KEY: &str = "TOKEN_ICO_ADDRESS";
pub const TOKEN_LOGO_KEY: &str = "TOKEN_LOGO_URI";

/// Session configuration. Built once and shared by the connector and the resolvers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub staking_contract: Address,

    /// Project token users stake and transfer.
    pub deposit_token: Address,

    /// Project token rewards are paid in.
    pub reward_token: Address,

    pub ico_contract: Option<Address>,

    /// Image shown by wallets for the project token.
    pub token_logo: Option<String>,

    pub reward_schedule: RewardSchedule,
}

/// Unvalidated configuration values as they come from the environment or a file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RawConfig {
    pub staking_contract: Option<String>,
    pub deposit_token: Option<String>,
    pub reward_token: Option<String>,
    pub ico_contract: Option<String>,
    pub token_logo: Option<String>,
    #[serde(default)]
    pub reward_schedule: Option<RewardSchedule>,
}

impl Config {
    pub fn from_env() -> DappResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DappResult<Self> {
        RawConfig {
            staking_contract: lookup(STAKING_CONTRACT_KEY),
            deposit_token: lookup(DEPOSIT_TOKEN_KEY),
            reward_token: lookup(REWARD_TOKEN_KEY),
            ico_contract: lookup(ICO_CONTRACT_KEY),
            token_logo: lookup(TOKEN_LOGO_KEY),
            reward_schedule: None,
        }
        .validate()
    }

    pub fn from_json(json: &str) -> DappResult<Self> {
        serde_json::from_str::<RawConfig>(json)
            .map_err(|error| DappError::Configuration(error.to_string()))?
            .validate()
    }
}

impl RawConfig {
    pub fn validate(self) -> DappResult<Config> {
        let staking_contract = required(STAKING_CONTRACT_KEY, self.staking_contract)?;
        if staking_contract.is_zero() {
            return Err(DappError::Configuration(format!(
                "{STAKING_CONTRACT_KEY} must not be the zero address"
            )));
        }

        let reward_schedule = self.reward_schedule.unwrap_or_default();
        if !reward_schedule.is_valid() {
            return Err(DappError::Configuration(
                "reward schedule must have non-zero seconds per unit and units per year".to_string(),
            ));
        }

        Ok(Config {
            staking_contract,
            deposit_token: required(DEPOSIT_TOKEN_KEY, self.deposit_token)?,
            reward_token: required(REWARD_TOKEN_KEY, self.reward_token)?,
            ico_contract: optional(ICO_CONTRACT_KEY, self.ico_contract)?,
            token_logo: self.token_logo.filter(|logo| !logo.trim().is_empty()),
            reward_schedule,
        })
    }
}

fn optional(key: &str, value: Option<String>) -> DappResult<Option<Address>> {
    match value.filter(|value| !value.trim().is_empty()) {
        Some(value) => value
            .parse::<Address>()
            .map(Some)
            .map_err(|error| DappError::Configuration(format!("{key}: {error}"))),
        None => Ok(None),
    }
}

fn required(key: &str, value: Option<String>) -> DappResult<Address> {
    optional(key, value)?.ok_or_else(|| DappError::Configuration(format!("{key} is not set")))
}
