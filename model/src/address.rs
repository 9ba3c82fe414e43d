use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const ADDRESS_LEN: usize = 20;

/// A 20-byte chain account or contract address.
///
/// Parsing accepts `0x` followed by exactly 40 hex digits in any case; the address
/// is always displayed in lowercase.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,
    #[error("address `{0}` must start with 0x")]
    MissingPrefix(String),
    #[error("address `{0}` must contain exactly 40 hex digits")]
    InvalidLength(String),
    #[error("address `{0}` contains a non-hex character")]
    InvalidCharacter(String),
}

impl Address {
    pub const ZERO: Address = Address([0; ADDRESS_LEN]);

    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds an address whose low bytes hold `value`. Handy for deterministic ids.
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 8..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// `0x1234...abcd` form for compact display.
    pub fn shortened(&self) -> String {
        let full = self.to_string();
        format!("{}...{}", &full[..6], &full[full.len() - 4..])
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AddressError::Empty);
        }

        let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) else {
            return Err(AddressError::MissingPrefix(value.to_string()));
        };

        if hex.len() != ADDRESS_LEN * 2 {
            return Err(AddressError::InvalidLength(value.to_string()));
        }

        let mut bytes = [0; ADDRESS_LEN];
        for (index, pair) in hex.as_bytes().chunks(2).enumerate() {
            let high = hex_value(pair[0]).ok_or_else(|| AddressError::InvalidCharacter(value.to_string()))?;
            let low = hex_value(pair[1]).ok_or_else(|| AddressError::InvalidCharacter(value.to_string()))?;
            bytes[index] = (high << 4) | low;
        }

        Ok(Self(bytes))
    }
}

fn hex_value(char: u8) -> Option<u8> {
    match char {
        b'0'..=b'9' => Some(char - b'0'),
        b'a'..=b'f' => Some(char - b'a' + 10),
        b'A'..=b'F' => Some(char - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: String = Deserialize::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}
