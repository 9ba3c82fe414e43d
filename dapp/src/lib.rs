//! Client core of the staking dapp.
//!
//! Reads the staking contract into display-ready snapshots and runs user and administrator
//! transactions against it. Transport and signing are provided by a [`Provider`], messages for
//! the user go to a [`Notifier`].

use std::sync::Arc;

use staking_dapp_model::{
    api::Provider,
    ico::IcoSnapshot,
    snapshot::StakeSnapshot,
    token::WatchAsset,
};

pub mod aggregate;
mod common;
pub mod config;
pub mod connector;
pub mod contracts;
pub mod error;
pub mod notify;
pub mod orchestrate;
pub mod resolver;

pub use aggregate::Aggregator;
pub use config::Config;
pub use connector::Connector;
pub use error::{DappError, DappResult};
pub use notify::{LogNotifier, Notifier};
pub use orchestrate::{FlowState, OperationKind, Orchestrator, PoolTerms};
pub use resolver::{FieldPolicy, ResolvePolicy, TokenResolver};

pub const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Session of the dapp: one configuration, one provider, one notifier.
pub struct StakingDapp {
    connector: Arc<Connector>,
    resolver: Arc<TokenResolver>,
    aggregator: Aggregator,
    orchestrator: Orchestrator,
    notifier: Arc<dyn Notifier>,
}

impl StakingDapp {
    pub fn new(config: Config, provider: Arc<dyn Provider>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_policy(config, provider, notifier, ResolvePolicy::default())
    }

    pub fn with_policy(
        config: Config,
        provider: Arc<dyn Provider>,
        notifier: Arc<dyn Notifier>,
        policy: ResolvePolicy,
    ) -> Self {
        let connector = Arc::new(Connector::new(Arc::new(config), provider));
        let resolver = Arc::new(TokenResolver::new(connector.clone(), policy));

        Self {
            aggregator: Aggregator::new(connector.clone(), resolver.clone(), notifier.clone()),
            orchestrator: Orchestrator::new(connector.clone(), notifier.clone()),
            connector,
            resolver,
            notifier,
        }
    }

    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    pub async fn aggregate(&self, user: &str) -> DappResult<StakeSnapshot> {
        self.aggregator.aggregate(user).await
    }

    pub async fn load_ico(&self, user: &str) -> DappResult<Option<IcoSnapshot>> {
        self.aggregator.load_ico(user).await
    }

    /// Listing parameters of the project deposit token for the user's wallet.
    pub async fn watch_asset(&self) -> DappResult<WatchAsset> {
        self.resolver
            .watch_asset(self.connector.config().deposit_token)
            .await
            .map_err(|error| {
                notify::report(self.notifier.as_ref(), "watch asset", &error);
                error
            })
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }
}
