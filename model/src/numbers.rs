use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::TokenAmount;

/// Raw token amount carried as a decimal string on the wire, since JSON numbers
/// cannot hold 128-bit integers without loss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct U128(pub TokenAmount);

impl From<TokenAmount> for U128 {
    fn from(value: TokenAmount) -> Self {
        Self(value)
    }
}

impl From<U128> for TokenAmount {
    fn from(value: U128) -> Self {
        value.0
    }
}

impl Serialize for U128 {
    fn serialize<S>(&self, serializer: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for U128 {
    fn deserialize<D>(deserializer: D) -> Result<Self, <D as Deserializer<'de>>::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        Ok(Self(
            str::parse::<TokenAmount>(&s).map_err(|err| serde::de::Error::custom(err.to_string()))?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::U128;

    #[test]
    fn wire_format() {
        let value = U128(1_000_000_000_000_000_000_000_000);

        let json = serde_json::to_string(&value).unwrap();
        assert_eq!("\"1000000000000000000000000\"", json);
        assert_eq!(value, serde_json::from_str(&json).unwrap());
        assert!(serde_json::from_str::<U128>("\"-1\"").is_err());
    }
}
