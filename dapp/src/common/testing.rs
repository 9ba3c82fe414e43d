#![cfg(test)]

use std::sync::{Arc, Once};

use serde_json::json;
use staking_dapp_model::{
    api::Provider, reward::RewardSchedule, sandbox::Sandbox, transaction::Transaction, Address, PoolId, TokenAmount,
    SECONDS_IN_MINUTE, U128,
};
use tracing_subscriber::EnvFilter;

use crate::{config::Config, connector::Connector, notify::RecordingNotifier, StakingDapp};

pub(crate) const ONE_TOKEN: TokenAmount = 1_000_000_000_000_000_000;

pub trait TokenUtils {
    fn to_wei(&self) -> TokenAmount;
}

impl TokenUtils for u128 {
    fn to_wei(&self) -> TokenAmount {
        self * ONE_TOKEN
    }
}

pub(crate) fn config(staking: Address, deposit_token: Address, reward_token: Address) -> Config {
    Config {
        staking_contract: staking,
        deposit_token,
        reward_token,
        ico_contract: None,
        token_logo: None,
        reward_schedule: RewardSchedule::default(),
    }
}

fn init_logging() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .with_test_writer()
            .try_init();
    });
}

/// Sandbox with two 18 decimals project tokens, a staking contract and two pools:
/// pool 0 pays 10% with a 30 minute lock, pool 1 pays 25% with a 60 minute lock.
///
/// Alice holds 1 000 STK, the staking contract holds 100 000 RWD to pay rewards.
pub(crate) struct Context {
    pub sandbox: Sandbox,
    pub owner: Address,
    pub alice: Address,
    pub bob: Address,
    pub deposit_token: Address,
    pub reward_token: Address,
    pub staking: Address,
    pub ico: Address,
    pub ico_token: Address,
    pub config: Config,
    signer: Address,
}

impl Context {
    pub(crate) fn new() -> Self {
        init_logging();

        let sandbox = Sandbox::new();
        let owner = sandbox.account();
        let alice = sandbox.account();
        let bob = sandbox.account();

        let deposit_token = sandbox.deploy_token("Staking Token", "STK", 18, 1_000_000u128.to_wei(), owner);
        let reward_token = sandbox.deploy_token("Reward Token", "RWD", 18, 1_000_000u128.to_wei(), owner);
        let staking = sandbox.deploy_staking(owner);

        let context = Self {
            config: config(staking, deposit_token, reward_token),
            sandbox,
            owner,
            alice,
            bob,
            deposit_token,
            reward_token,
            staking,
            ico: Address::ZERO,
            ico_token: Address::ZERO,
            signer: alice,
        };

        context.add_pool(deposit_token, reward_token, 10, 30);
        context.add_pool(deposit_token, reward_token, 25, 60);

        context.transfer(deposit_token, owner, alice, 1_000u128.to_wei());
        context.transfer(reward_token, owner, staking, 100_000u128.to_wei());

        context.sandbox.fund(owner, 100u128.to_wei());
        context.sandbox.fund(alice, 100u128.to_wei());

        context
    }

    /// Deploys a token sale holding 10 000 ICO tokens priced at `price` wei each.
    pub(crate) fn with_ico(mut self, price: TokenAmount) -> Self {
        self.ico_token = self.deploy_token("Ico Token", "ICO", 18, 1_000_000u128.to_wei());
        self.ico = self.sandbox.deploy_ico(self.owner, self.ico_token, price);
        self.transfer(self.ico_token, self.owner, self.ico, 10_000u128.to_wei());
        self.config.ico_contract = Some(self.ico);

        self
    }

    fn setup(&self, from: Address, transaction: Transaction) {
        self.sandbox
            .apply(from, transaction)
            .expect("Setup transaction failed");
    }

    /// Deploys a token with its whole raw `supply` held by the owner.
    pub(crate) fn deploy_token(&self, name: &str, symbol: &str, decimals: u8, supply: TokenAmount) -> Address {
        self.sandbox.deploy_token(name, symbol, decimals, supply, self.owner)
    }

    pub(crate) fn add_pool(&self, deposit_token: Address, reward_token: Address, apy: u64, lock_days: u64) {
        self.setup(
            self.owner,
            Transaction::new(
                self.staking,
                "addPool",
                json!([deposit_token, reward_token, apy, lock_days]),
            ),
        );
    }

    pub(crate) fn transfer(&self, token: Address, from: Address, to: Address, amount: TokenAmount) {
        self.setup(from, Transaction::new(token, "transfer", json!([to, U128(amount)])));
    }

    /// Stakes without going through the orchestrator.
    pub(crate) fn stake_directly(&self, user: Address, pool_id: PoolId, amount: TokenAmount) {
        self.setup(
            user,
            Transaction::new(self.deposit_token, "approve", json!([self.staking, U128(amount)])),
        );
        self.setup(
            user,
            Transaction::new(self.staking, "deposit", json!([pool_id, U128(amount)])),
        );
    }

    pub(crate) fn switch_account(&mut self, account: Address) {
        self.signer = account;
    }

    pub(crate) fn fast_forward_minutes(&self, minutes: u64) {
        self.sandbox.fast_forward(minutes * SECONDS_IN_MINUTE);
    }

    /// A fresh connector signing as the current account. Capabilities are probed anew.
    pub(crate) fn connector(&self) -> Connector {
        Connector::new(
            Arc::new(self.config.clone()),
            Arc::new(self.sandbox.provider(self.signer)),
        )
    }

    pub(crate) fn dapp(&self) -> (StakingDapp, Arc<RecordingNotifier>) {
        self.dapp_with(Arc::new(self.sandbox.provider(self.signer)))
    }

    /// A dapp whose provider has no wallet connected.
    pub(crate) fn disconnected_dapp(&self) -> (StakingDapp, Arc<RecordingNotifier>) {
        self.dapp_with(Arc::new(self.sandbox.disconnected()))
    }

    fn dapp_with(&self, provider: Arc<dyn Provider>) -> (StakingDapp, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let dapp = StakingDapp::new(self.config.clone(), provider, notifier.clone());

        (dapp, notifier)
    }
}
