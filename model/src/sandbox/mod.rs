//! In-memory chain used by the test suites.
//!
//! It hosts fungible token, staking and ICO contracts with the same method names and
//! argument shapes as the deployed ones, a manual clock, per-signer providers and
//! fault injection.

mod chain;
mod ico;
mod provider;
mod staking;
mod token;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

pub use chain::WriteRecord;
use chain::{Chain, Deployed};
use ico::IcoState;
pub use provider::SandboxProvider;
use staking::StakingState;
use token::TokenState;

use crate::{api::RpcResult, transaction::Transaction, Address, Timestamp, TokenAmount};

/// Block time the sandbox starts at.
pub const GENESIS_TIMESTAMP: Timestamp = 1_700_000_000;

#[derive(Clone)]
pub struct Sandbox {
    chain: Arc<Mutex<Chain>>,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            chain: Arc::new(Mutex::new(Chain::new(GENESIS_TIMESTAMP))),
        }
    }

    fn chain(&self) -> MutexGuard<Chain> {
        self.chain.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a fresh externally owned account.
    pub fn account(&self) -> Address {
        self.chain().next_address()
    }

    /// Provider signing with `signer`.
    pub fn provider(&self, signer: Address) -> SandboxProvider {
        SandboxProvider::new(self.chain.clone(), Some(signer))
    }

    /// Provider without a wallet: every request fails as unavailable.
    pub fn disconnected(&self) -> SandboxProvider {
        SandboxProvider::new(self.chain.clone(), None)
    }

    pub fn deploy_token(
        &self,
        name: &str,
        symbol: &str,
        decimals: u8,
        supply: TokenAmount,
        holder: Address,
    ) -> Address {
        let token = TokenState::new(name, symbol, decimals, supply, holder);
        self.chain().deploy(Deployed::Token(token))
    }

    pub fn deploy_staking(&self, owner: Address) -> Address {
        self.chain().deploy(Deployed::Staking(StakingState::new(owner)))
    }

    pub fn deploy_ico(&self, owner: Address, token: Address, price: TokenAmount) -> Address {
        self.chain().deploy(Deployed::Ico(IcoState::new(owner, token, price)))
    }

    /// Applies `transaction` from `from` immediately, outside of any block. Used for setup.
    pub fn apply(&self, from: Address, transaction: Transaction) -> RpcResult<()> {
        let mut chain = self.chain();
        let mut next = chain.clone();
        next.execute(from, &transaction)?;
        *chain = next;
        Ok(())
    }

    pub fn fund(&self, address: Address, amount: TokenAmount) {
        *self.chain().native.entry(address).or_default() += amount;
    }

    pub fn now(&self) -> Timestamp {
        self.chain().now
    }

    pub fn fast_forward(&self, seconds: u64) {
        self.chain().now += seconds;
    }

    /// Makes every call of `method` on `address` revert.
    pub fn fail_method(&self, address: Address, method: &str) {
        self.chain().faults.insert((address, method.to_string()));
    }

    /// Removes `method` from the interface of the contract at `address`.
    pub fn remove_method(&self, address: Address, method: &str) {
        self.chain().removed.insert((address, method.to_string()));
    }

    /// Makes calls of `method` on `address` revert when made with exactly `args`.
    pub fn fail_call(&self, address: Address, method: &str, args: Value) {
        self.chain().call_faults.push((address, method.to_string(), args));
    }

    pub fn clear_faults(&self) {
        let mut chain = self.chain();
        chain.faults.clear();
        chain.call_faults.clear();
    }

    /// Restores every method taken away with `remove_method`.
    pub fn clear_removed(&self) {
        self.chain().removed.clear();
    }

    /// Transactions mined so far, oldest first.
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.chain().writes.clone()
    }

    pub fn token_balance(&self, token: Address, owner: Address) -> TokenAmount {
        self.chain().token(&token).map_or(0, |token| token.balance_of(&owner))
    }

    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> TokenAmount {
        self.chain()
            .token(&token)
            .map_or(0, |token| token.allowance(&owner, &spender))
    }

    pub fn native_balance(&self, address: Address) -> TokenAmount {
        self.chain().native.get(&address).copied().unwrap_or_default()
    }

    pub fn block_number(&self) -> u64 {
        self.chain().block
    }
}
