use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Address, PoolId, Timestamp, UDecimal, U128};

/// Kind of activity the staking contract recorded.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Deposit,
    Withdraw,
    Claim,
    Other(String),
}

impl From<&str> for NotificationKind {
    fn from(value: &str) -> Self {
        match value {
            "Deposit" => Self::Deposit,
            "Withdraw" => Self::Withdraw,
            "Claim" => Self::Claim,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => f.write_str("Deposit"),
            Self::Withdraw => f.write_str("Withdraw"),
            Self::Claim => f.write_str("Claim"),
            Self::Other(kind) => f.write_str(kind),
        }
    }
}

impl Serialize for NotificationKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NotificationKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: String = Deserialize::deserialize(deserializer)?;
        Ok(value.as_str().into())
    }
}

/// Activity record as returned by the contract's `getNotifications` view.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Notification {
    #[serde(rename = "poolID")]
    pub pool_id: PoolId,
    pub amount: U128,
    pub user: Address,
    #[serde(rename = "typeOf")]
    pub kind: NotificationKind,
    pub timestamp: Timestamp,
}

/// Notification prepared for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub pool_id: PoolId,
    pub amount: UDecimal,
    pub user: Address,
    pub kind: NotificationKind,
    pub timestamp: Timestamp,
    pub date: String,
}
