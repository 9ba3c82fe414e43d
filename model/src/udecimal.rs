use std::{
    cmp::{max, Ordering},
    fmt,
    iter::Sum,
    ops::Add,
};

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::TokenAmount;

/// `UDecimal` is the human-readable form of a token amount.
///
/// The decimal number is represented in the form of `significand` divided by (10 raised to the power of `exponent`).
/// For a token amount the `significand` is the raw integer amount and the `exponent` is the token's `decimals`,
/// so the conversion between the two forms is lossless in both directions.
///
/// Equality and ordering compare values, so `1.0` with exponent 1 equals `1` with exponent 0.
#[derive(Copy, Clone, Default, Debug)]
pub struct UDecimal {
    pub significand: u128,
    pub exponent: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount `{0}` is not a non-negative decimal number")]
    Invalid(String),
    #[error("amount `{amount}` has more than {decimals} fractional digits")]
    TooManyDecimals { amount: String, decimals: u8 },
    #[error("amount `{0}` is too large")]
    Overflow(String),
}

impl UDecimal {
    pub const fn new(significand: u128, exponent: u32) -> Self {
        Self { significand, exponent }
    }

    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Human-readable view of `raw` for a token with `decimals` decimals.
    pub const fn from_raw(raw: TokenAmount, decimals: u8) -> Self {
        Self::new(raw, decimals as u32)
    }

    /// Parses a human-entered amount for a token with `decimals` decimals.
    pub fn parse(amount: &str, decimals: u8) -> Result<Self, ParseAmountError> {
        parse_units(amount, decimals).map(|raw| Self::from_raw(raw, decimals))
    }

    pub fn is_zero(&self) -> bool {
        self.significand == 0
    }

    /// Same value with trailing zeros of the significand removed.
    pub fn normalized(self) -> Self {
        let mut result = self;
        while result.exponent > 0 && result.significand % 10 == 0 {
            result.significand /= 10;
            result.exponent -= 1;
        }
        result
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        let max_exponent = max(self.exponent, other.exponent);

        let self_sig = scale_saturating(self.significand, max_exponent - self.exponent);
        let other_sig = scale_saturating(other.significand, max_exponent - other.exponent);

        UDecimal {
            significand: self_sig.saturating_sub(other_sig),
            exponent: max_exponent,
        }
    }
}

fn scale_saturating(mut significand: u128, times: u32) -> u128 {
    for _ in 0..times {
        significand = significand.saturating_mul(10);
    }
    significand
}

fn scale_checked(mut significand: u128, times: u32) -> Option<u128> {
    for _ in 0..times {
        significand = significand.checked_mul(10)?;
    }
    Some(significand)
}

impl Add for UDecimal {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        let max_exponent = max(self.exponent, other.exponent);

        let self_sig = scale_saturating(self.significand, max_exponent - self.exponent);
        let other_sig = scale_saturating(other.significand, max_exponent - other.exponent);

        UDecimal {
            significand: self_sig.saturating_add(other_sig),
            exponent: max_exponent,
        }
    }
}

impl Sum for UDecimal {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(UDecimal::zero(), Add::add)
    }
}

impl PartialEq for UDecimal {
    fn eq(&self, other: &Self) -> bool {
        let left = self.normalized();
        let right = other.normalized();
        left.significand == right.significand && left.exponent == right.exponent
    }
}

impl Eq for UDecimal {}

impl Ord for UDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_exponent = max(self.exponent, other.exponent);

        match (
            scale_checked(self.significand, max_exponent - self.exponent),
            scale_checked(other.significand, max_exponent - other.exponent),
        ) {
            (Some(left), Some(right)) => left.cmp(&right),
            // Only a non-zero value can overflow when scaled, so it is the larger one.
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (None, None) => self.normalized().to_string().len().cmp(&other.normalized().to_string().len()),
        }
    }
}

impl PartialOrd for UDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for UDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.significand.to_string();
        let exponent = self.exponent as usize;

        let (integer, fraction) = if digits.len() > exponent {
            let (integer, fraction) = digits.split_at(digits.len() - exponent);
            (integer.to_string(), fraction.to_string())
        } else {
            ("0".to_string(), format!("{digits:0>exponent$}"))
        };

        let fraction = fraction.trim_end_matches('0');
        let fraction = if fraction.is_empty() { "0" } else { fraction };

        write!(f, "{integer}.{fraction}")
    }
}

impl Serialize for UDecimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Formats a raw amount of a token with `decimals` decimals, e.g. `1500000` with 6 decimals is `"1.5"`.
pub fn format_units(raw: TokenAmount, decimals: u8) -> String {
    UDecimal::from_raw(raw, decimals).to_string()
}

/// Converts a human-entered amount into the raw amount of a token with `decimals` decimals.
///
/// Trailing fractional zeros are ignored, any other fractional digit beyond `decimals` is an error.
pub fn parse_units(amount: &str, decimals: u8) -> Result<TokenAmount, ParseAmountError> {
    let amount = amount.trim();
    let (integer, fraction) = split_amount(amount)?;

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(ParseAmountError::TooManyDecimals {
            amount: amount.to_string(),
            decimals,
        });
    }

    let digits = format!("{integer}{fraction:0<width$}", width = decimals as usize);

    digits.bytes().try_fold(0u128, |raw, digit| {
        raw.checked_mul(10)
            .and_then(|raw| raw.checked_add(u128::from(digit - b'0')))
            .ok_or_else(|| ParseAmountError::Overflow(amount.to_string()))
    })
}

/// Checks the parts of a human-entered amount that don't depend on the token's decimals
/// and tells whether every digit is zero.
pub fn amount_is_zero(amount: &str) -> Result<bool, ParseAmountError> {
    let (integer, fraction) = split_amount(amount.trim())?;
    Ok(integer.bytes().chain(fraction.bytes()).all(|digit| digit == b'0'))
}

/// Integer and fractional digits of a trimmed amount.
fn split_amount(amount: &str) -> Result<(&str, &str), ParseAmountError> {
    if amount.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let (integer, fraction) = match amount.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (amount, ""),
    };

    let is_digits = |part: &str| part.bytes().all(|char| char.is_ascii_digit());
    if !is_digits(integer) || !is_digits(fraction) || (integer.is_empty() && fraction.is_empty()) {
        return Err(ParseAmountError::Invalid(amount.to_string()));
    }

    Ok((integer, fraction))
}

#[cfg(test)]
mod tests {
    use fake::Fake;
    use rstest::rstest;

    use crate::{amount_is_zero, format_units, parse_units, ParseAmountError, UDecimal};

    const MAX_DECIMALS: u8 = 24;

    #[test]
    fn udecimal_display() {
        assert_eq!("0.1", UDecimal::new(1, 1).to_string());
        assert_eq!("0.12", UDecimal::new(12, 2).to_string());
        assert_eq!("1.0", UDecimal::new(1000, 3).to_string());
        assert_eq!("5.0", UDecimal::new(50000, 4).to_string());
        assert_eq!("0.0", UDecimal::new(0, 18).to_string());
        assert_eq!("42.0", UDecimal::new(42, 0).to_string());
        assert_eq!("0.000000000000000001", UDecimal::from_raw(1, 18).to_string());
    }

    #[test]
    fn udecimal_eq_by_value() {
        assert_eq!(UDecimal::new(10, 1), UDecimal::new(1, 0));
        assert_eq!(UDecimal::new(1_000_000_000_000_000_000, 18), UDecimal::new(1, 0));
        assert_ne!(UDecimal::new(11, 1), UDecimal::new(1, 0));
        assert!(UDecimal::new(15, 1) > UDecimal::new(1, 0));
        assert!(UDecimal::new(5, 1) < UDecimal::new(1, 0));
    }

    #[test]
    fn udecimal_add() {
        assert_eq!((UDecimal::new(5, 1) + UDecimal::new(3, 1)).to_string(), "0.8");
        assert_eq!((UDecimal::new(3, 1) + UDecimal::new(5, 1)).to_string(), "0.8");

        assert_eq!((UDecimal::new(5, 1) + UDecimal::new(3, 2)).to_string(), "0.53");
        assert_eq!((UDecimal::new(3, 2) + UDecimal::new(5, 1)).to_string(), "0.53");

        let total: UDecimal = [UDecimal::from_raw(1_500_000, 6), UDecimal::from_raw(2 * 10u128.pow(18), 18)]
            .into_iter()
            .sum();
        assert_eq!("3.5", total.to_string());
    }

    #[test]
    fn udecimal_saturating_sub() {
        assert_eq!("0.7", UDecimal::new(1, 0).saturating_sub(UDecimal::new(3, 1)).to_string());
        assert_eq!(UDecimal::zero(), UDecimal::new(1, 0).saturating_sub(UDecimal::new(2, 0)));
    }

    #[rstest]
    #[case("1", 18, 1_000_000_000_000_000_000)]
    #[case("1.5", 6, 1_500_000)]
    #[case(".5", 1, 5)]
    #[case("5.", 0, 5)]
    #[case("0.000001", 6, 1)]
    #[case("2.500000000", 6, 2_500_000)]
    #[case(" 7 ", 2, 700)]
    fn parse_valid(#[case] input: &str, #[case] decimals: u8, #[case] expected: u128) {
        assert_eq!(Ok(expected), parse_units(input, decimals));
    }

    #[rstest]
    #[case("0", Ok(true))]
    #[case(" 0.000 ", Ok(true))]
    #[case(".0", Ok(true))]
    #[case("0.0000000000000000000000001", Ok(false))]
    #[case("10", Ok(false))]
    #[case("", Err(ParseAmountError::Empty))]
    #[case("-1", Err(ParseAmountError::Invalid("-1".into())))]
    #[case("1.2.3", Err(ParseAmountError::Invalid("1.2.3".into())))]
    fn amount_syntax_without_decimals(#[case] input: &str, #[case] expected: Result<bool, ParseAmountError>) {
        assert_eq!(expected, amount_is_zero(input));
    }

    #[rstest]
    #[case("", ParseAmountError::Empty)]
    #[case("-1", ParseAmountError::Invalid("-1".into()))]
    #[case("1e18", ParseAmountError::Invalid("1e18".into()))]
    #[case(".", ParseAmountError::Invalid(".".into()))]
    #[case("1.2.3", ParseAmountError::Invalid("1.2.3".into()))]
    #[case("0.0000001", ParseAmountError::TooManyDecimals { amount: "0.0000001".into(), decimals: 6 })]
    #[case("340282366920938463463374607431768211456", ParseAmountError::Overflow("340282366920938463463374607431768211456".into()))]
    fn parse_invalid(#[case] input: &str, #[case] expected: ParseAmountError) {
        assert_eq!(Err(expected), parse_units(input, 6));
    }

    #[test]
    fn format_then_parse_restores_raw_amount() {
        for _ in 0..10_000 {
            let raw: u128 = (0..u64::MAX).fake::<u64>().into();
            let decimals: u8 = (0..MAX_DECIMALS).fake();

            let formatted = format_units(raw, decimals);

            assert_eq!(Ok(raw), parse_units(&formatted, decimals), "{formatted} with {decimals} decimals");
        }
    }

    #[test]
    fn serialize_as_string() {
        assert_eq!("\"1.5\"", serde_json::to_string(&UDecimal::from_raw(15, 1)).unwrap());
    }
}
