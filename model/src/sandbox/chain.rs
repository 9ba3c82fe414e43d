use std::collections::{HashMap, HashSet};

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{ico::IcoState, staking::StakingState, token::TokenState};
use crate::{
    api::{RpcError, RpcResult},
    transaction::{Receipt, Transaction, TxHash},
    Address, Gas, Timestamp, TokenAmount,
};

const BASE_GAS: Gas = 21_000;

/// A mined transaction as seen by tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteRecord {
    pub from: Address,
    pub to: Address,
    pub method: String,
    pub status: bool,
}

#[derive(Clone)]
pub(super) enum Deployed {
    Token(TokenState),
    Staking(StakingState),
    Ico(IcoState),
}

impl Deployed {
    fn interface(&self) -> &'static [&'static str] {
        match self {
            Deployed::Token(_) => TokenState::INTERFACE,
            Deployed::Staking(_) => StakingState::INTERFACE,
            Deployed::Ico(_) => IcoState::INTERFACE,
        }
    }

    fn bytecode(&self) -> Vec<u8> {
        let marker = match self {
            Deployed::Token(_) => 0x01,
            Deployed::Staking(_) => 0x02,
            Deployed::Ico(_) => 0x03,
        };
        vec![0x60, 0x80, 0x60, 0x40, marker]
    }
}

#[derive(Clone)]
pub(super) struct Chain {
    pub now: Timestamp,
    pub block: u64,
    nonce: u64,
    next_account: u64,
    contracts: HashMap<Address, Deployed>,
    pub native: HashMap<Address, TokenAmount>,
    pub receipts: HashMap<TxHash, Receipt>,
    pub faults: HashSet<(Address, String)>,
    /// Calls that revert only with exactly these arguments.
    pub call_faults: Vec<(Address, String, Value)>,
    pub removed: HashSet<(Address, String)>,
    pub writes: Vec<WriteRecord>,
}

impl Chain {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now,
            block: 1,
            nonce: 0,
            next_account: 0x1000,
            contracts: HashMap::new(),
            native: HashMap::new(),
            receipts: HashMap::new(),
            faults: HashSet::new(),
            call_faults: Vec::new(),
            removed: HashSet::new(),
            writes: Vec::new(),
        }
    }

    pub fn next_address(&mut self) -> Address {
        self.next_account += 1;
        Address::from_low_u64(self.next_account)
    }

    pub fn deploy(&mut self, contract: Deployed) -> Address {
        let address = self.next_address();
        self.contracts.insert(address, contract);
        address
    }

    pub fn code_at(&self, address: &Address) -> Vec<u8> {
        self.contracts.get(address).map(Deployed::bytecode).unwrap_or_default()
    }

    pub fn has_method(&self, address: &Address, method: &str) -> bool {
        self.contracts
            .get(address)
            .is_some_and(|contract| contract.interface().contains(&method))
            && !self.removed.contains(&(*address, method.to_string()))
    }

    fn check_callable(&self, address: &Address, method: &str, args: &Value) -> RpcResult<()> {
        if !self.has_method(address, method) {
            return Err(RpcError::Reverted { reason: None });
        }

        let faulty_call = self
            .call_faults
            .iter()
            .any(|(fault_address, fault_method, fault_args)| {
                fault_address == address && fault_method == method && fault_args == args
            });

        if faulty_call || self.faults.contains(&(*address, method.to_string())) {
            return Err(RpcError::reverted(format!("{method} failed")));
        }
        Ok(())
    }

    pub fn token(&self, address: &Address) -> RpcResult<&TokenState> {
        match self.contracts.get(address) {
            Some(Deployed::Token(token)) => Ok(token),
            _ => Err(RpcError::Reverted { reason: None }),
        }
    }

    pub fn token_mut(&mut self, address: &Address) -> RpcResult<&mut TokenState> {
        match self.contracts.get_mut(address) {
            Some(Deployed::Token(token)) => Ok(token),
            _ => Err(RpcError::Reverted { reason: None }),
        }
    }

    pub fn staking(&self, address: &Address) -> RpcResult<&StakingState> {
        match self.contracts.get(address) {
            Some(Deployed::Staking(staking)) => Ok(staking),
            _ => Err(RpcError::Reverted { reason: None }),
        }
    }

    pub fn staking_mut(&mut self, address: &Address) -> RpcResult<&mut StakingState> {
        match self.contracts.get_mut(address) {
            Some(Deployed::Staking(staking)) => Ok(staking),
            _ => Err(RpcError::Reverted { reason: None }),
        }
    }

    pub fn ico(&self, address: &Address) -> RpcResult<&IcoState> {
        match self.contracts.get(address) {
            Some(Deployed::Ico(ico)) => Ok(ico),
            _ => Err(RpcError::Reverted { reason: None }),
        }
    }

    pub fn ico_mut(&mut self, address: &Address) -> RpcResult<&mut IcoState> {
        match self.contracts.get_mut(address) {
            Some(Deployed::Ico(ico)) => Ok(ico),
            _ => Err(RpcError::Reverted { reason: None }),
        }
    }

    pub fn view(&self, address: &Address, method: &str, args: &Value) -> RpcResult<Value> {
        self.check_callable(address, method, args)?;

        match self.contracts.get(address) {
            Some(Deployed::Token(token)) => token.view(method, args),
            Some(Deployed::Staking(_)) => self.staking_view(address, method, args),
            Some(Deployed::Ico(_)) => self.ico_view(address, method, args),
            None => Err(RpcError::Reverted { reason: None }),
        }
    }

    /// Runs `transaction` against this state. On error the state may be partially
    /// modified, so callers execute on a copy and keep it only on success.
    pub fn execute(&mut self, from: Address, transaction: &Transaction) -> RpcResult<()> {
        let Transaction { to, method, args, value } = transaction;
        self.check_callable(to, method, args)?;

        if *value > 0 {
            let balance = self.native.entry(from).or_default();
            if *balance < *value {
                return Err(RpcError::Rejected("insufficient funds for value".to_string()));
            }
            *balance -= value;
            *self.native.entry(*to).or_default() += value;
        }

        match self.contracts.get(to) {
            Some(Deployed::Token(_)) => {
                if *value > 0 {
                    return Err(RpcError::reverted("non-payable method"));
                }
                self.token_mut(to)?.execute(from, method, args)
            }
            Some(Deployed::Staking(_)) => {
                if *value > 0 {
                    return Err(RpcError::reverted("non-payable method"));
                }
                self.staking_execute(to, from, method, args)
            }
            Some(Deployed::Ico(_)) => self.ico_execute(to, from, method, args, *value),
            None => Err(RpcError::Reverted { reason: None }),
        }
    }

    pub fn gas_cost(method: &str) -> Gas {
        BASE_GAS
            + match method {
                "approve" => 25_000,
                "transfer" => 30_000,
                "deposit" | "withdraw" => 110_000,
                "claimReward" => 70_000,
                "addPool" => 90_000,
                "buyToken" => 80_000,
                _ => 40_000,
            }
    }

    /// Mines `transaction` into a new block. A reverting transaction is still mined, with a failed status.
    pub fn mine(&mut self, from: Address, transaction: Transaction, gas_limit: Gas) -> TxHash {
        self.nonce += 1;
        self.block += 1;

        let digest = sha256::digest(format!(
            "{}:{from}:{}:{}:{}:{}",
            self.nonce, transaction.to, transaction.method, transaction.args, transaction.value
        ));
        let hash = TxHash(format!("0x{digest}"));

        let cost = Self::gas_cost(&transaction.method);
        let status = if gas_limit < cost {
            false
        } else {
            let mut next = self.clone();
            match next.execute(from, &transaction) {
                Ok(()) => {
                    *self = next;
                    true
                }
                Err(_) => false,
            }
        };

        self.writes.push(WriteRecord {
            from,
            to: transaction.to,
            method: transaction.method.clone(),
            status,
        });

        self.receipts.insert(
            hash.clone(),
            Receipt {
                transaction_hash: hash.clone(),
                block_number: self.block,
                gas_used: cost.min(gas_limit),
                status,
            },
        );

        hash
    }
}

pub(super) fn arg<T: DeserializeOwned>(args: &Value, index: usize) -> RpcResult<T> {
    args.get(index)
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
        .ok_or_else(|| RpcError::reverted(format!("invalid argument #{index}")))
}

pub(super) fn require(condition: bool, message: &str) -> RpcResult<()> {
    if condition {
        Ok(())
    } else {
        Err(RpcError::reverted(message))
    }
}
