use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Address, Gas, TokenAmount};

/// Hash identifying a submitted transaction, `0x` followed by 64 hex digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A state-mutating contract invocation.
///
/// `args` are the positional arguments of `method` encoded as a JSON array, with raw
/// token amounts carried as decimal strings.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub to: Address,
    pub method: String,
    pub args: Value,

    /// Native currency attached to the call.
    pub value: TokenAmount,
}

impl Transaction {
    pub fn new(to: Address, method: impl Into<String>, args: Value) -> Self {
        Self {
            to,
            method: method.into(),
            args,
            value: 0,
        }
    }

    pub fn with_value(mut self, value: TokenAmount) -> Self {
        self.value = value;
        self
    }
}

/// Outcome of a mined transaction.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub gas_used: Gas,

    /// `false` when the transaction was included but its execution reverted.
    pub status: bool,
}
