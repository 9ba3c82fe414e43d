use std::sync::Arc;

use staking_dapp_model::{api::Provider, Address, Timestamp, TokenAmount};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::{
    config::{Config, ICO_CONTRACT_KEY},
    contracts::{Capabilities, Contract, IcoContract, StakingContract, TokenContract},
    error::{DappError, DappResult},
};

/// Opens typed contract handles after checking that they can actually be used.
///
/// Every handle is checked in the same order: a wallet is connected, the address is set,
/// and code is deployed at it. Staking contract capabilities are probed once and reused
/// for the rest of the session.
pub struct Connector {
    config: Arc<Config>,
    provider: Arc<dyn Provider>,
    capabilities: OnceCell<Capabilities>,
}

impl Connector {
    pub fn new(config: Arc<Config>, provider: Arc<dyn Provider>) -> Self {
        Self {
            config,
            provider,
            capabilities: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Account of the connected wallet.
    pub async fn signer(&self) -> DappResult<Address> {
        Ok(self.provider.signer().await?)
    }

    /// Current chain time.
    pub async fn now(&self) -> DappResult<Timestamp> {
        Ok(self.provider.timestamp().await?)
    }

    pub async fn native_balance(&self, address: Address) -> DappResult<TokenAmount> {
        Ok(self.provider.native_balance(&address).await?)
    }

    pub async fn staking(&self) -> DappResult<StakingContract> {
        let contract = self.open(self.config.staking_contract).await?;

        let capabilities = self
            .capabilities
            .get_or_try_init(|| self.probe(contract.address()))
            .await?;

        Ok(StakingContract::new(contract, *capabilities))
    }

    pub async fn token(&self, address: Address) -> DappResult<TokenContract> {
        self.open(address).await.map(TokenContract::new)
    }

    pub async fn ico(&self) -> DappResult<IcoContract> {
        let address = self
            .config
            .ico_contract
            .ok_or_else(|| DappError::Configuration(format!("{ICO_CONTRACT_KEY} is not set")))?;

        self.open(address).await.map(IcoContract::new)
    }

    async fn open(&self, address: Address) -> DappResult<Contract> {
        self.signer().await?;

        if address.is_zero() {
            return Err(DappError::Configuration(
                "contract address must not be the zero address".to_string(),
            ));
        }

        let code = self.provider.code_at(&address).await?;
        if code.is_empty() {
            return Err(DappError::ContractNotFound { address });
        }

        debug!(%address, "contract handle opened");

        Ok(Contract::new(self.provider.clone(), address))
    }

    async fn probe(&self, staking: Address) -> DappResult<Capabilities> {
        let capabilities = Capabilities {
            direct_reward_query: self.provider.has_method(&staking, "pendingReward").await?,
        };

        info!(
            %staking,
            direct_reward_query = capabilities.direct_reward_query,
            "staking contract capabilities"
        );

        Ok(capabilities)
    }
}
