use std::sync::{Arc, Once};

use anyhow::{bail, Result};
use serde_json::json;
use staking_dapp::{notify::RecordingNotifier, Config, PoolTerms, StakingDapp};
use staking_dapp_model::{
    reward::RewardSchedule, sandbox::Sandbox, transaction::Transaction, Address, TokenAmount, SECONDS_IN_MINUTE, U128,
};
use tracing_subscriber::EnvFilter;

pub const ONE_TOKEN: TokenAmount = 1_000_000_000_000_000_000;

pub trait TokenUtils {
    fn to_wei(self) -> TokenAmount;
}

impl TokenUtils for u128 {
    fn to_wei(self) -> TokenAmount {
        self * ONE_TOKEN
    }
}

pub fn init_logging() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .try_init();
    });
}

/// Deployed project: deposit and reward tokens, a staking contract with two pools
/// created by the owner through the dapp, and funded accounts.
///
/// Pool 0 pays 10% with a 30 minute lock, pool 1 pays 25% with a 60 minute lock.
pub struct Context {
    pub sandbox: Sandbox,
    pub owner: Address,
    pub alice: Address,
    pub bob: Address,
    pub deposit_token: Address,
    pub reward_token: Address,
    pub staking: Address,
    pub config: Config,
}

impl Context {
    pub async fn new() -> Result<Self> {
        init_logging();

        let sandbox = Sandbox::new();
        let owner = sandbox.account();
        let alice = sandbox.account();
        let bob = sandbox.account();

        let deposit_token = sandbox.deploy_token("Staking Token", "STK", 18, 1_000_000u128.to_wei(), owner);
        let reward_token = sandbox.deploy_token("Reward Token", "RWD", 18, 1_000_000u128.to_wei(), owner);
        let staking = sandbox.deploy_staking(owner);

        let context = Self {
            config: Config {
                staking_contract: staking,
                deposit_token,
                reward_token,
                ico_contract: None,
                token_logo: Some("https://example.org/stk.png".to_string()),
                reward_schedule: RewardSchedule::default(),
            },
            sandbox,
            owner,
            alice,
            bob,
            deposit_token,
            reward_token,
            staking,
        };

        let (admin, _) = context.dapp(owner);
        for (apy, lock_days) in [(10, 30), (25, 60)] {
            admin
                .orchestrator()
                .add_pool(&PoolTerms {
                    deposit_token: deposit_token.to_string(),
                    reward_token: reward_token.to_string(),
                    apy: apy.to_string(),
                    lock_days: lock_days.to_string(),
                })
                .await?;
        }

        context.setup(
            owner,
            Transaction::new(deposit_token, "transfer", json!([alice, U128(1_000u128.to_wei())])),
        )?;
        context.setup(
            owner,
            Transaction::new(reward_token, "transfer", json!([staking, U128(100_000u128.to_wei())])),
        )?;

        context.sandbox.fund(owner, 100u128.to_wei());
        context.sandbox.fund(alice, 100u128.to_wei());

        Ok(context)
    }

    /// Deploys a token sale holding 10 000 ICO tokens priced at `price` wei each.
    pub fn with_ico(mut self, price: TokenAmount) -> Result<Self> {
        let token = self
            .sandbox
            .deploy_token("Ico Token", "ICO", 18, 1_000_000u128.to_wei(), self.owner);
        let ico = self.sandbox.deploy_ico(self.owner, token, price);

        self.setup(
            self.owner,
            Transaction::new(token, "transfer", json!([ico, U128(10_000u128.to_wei())])),
        )?;
        self.config.ico_contract = Some(ico);

        Ok(self)
    }

    fn setup(&self, from: Address, transaction: Transaction) -> Result<()> {
        let method = transaction.method.clone();
        if let Err(error) = self.sandbox.apply(from, transaction) {
            bail!("Setup call `{method}` failed: {error}");
        }
        Ok(())
    }

    /// Dapp session signing as `signer`.
    pub fn dapp(&self, signer: Address) -> (StakingDapp, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let dapp = StakingDapp::new(
            self.config.clone(),
            Arc::new(self.sandbox.provider(signer)),
            notifier.clone(),
        );

        (dapp, notifier)
    }

    pub fn fast_forward_minutes(&self, minutes: u64) {
        self.sandbox.fast_forward(minutes * SECONDS_IN_MINUTE);
    }
}
