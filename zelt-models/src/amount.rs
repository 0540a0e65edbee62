// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::config::AMOUNT_DECIMAL_FACTOR;
use crate::error::ModelsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A structure representing an amount of tokens with safe operations.
///
/// The underlying `u128` raw representation is a fixed-point value counted
/// in the smallest indivisible unit, with `AMOUNT_DECIMAL_FACTOR` smallest
/// units per token. `u128` is required: with 18 fractional decimals the
/// total supply alone exceeds the range of `u64`. Floats are never used so
/// that every replica computes bit-identical balances.
///
/// Serde serializes an `Amount` as its raw integer value, which matches the
/// integer amounts carried by transaction records and checkpoint files.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Ord, PartialOrd, Default, Serialize, Deserialize,
)]
pub struct Amount(u128);

impl Amount {
    /// Minimum amount
    pub const MIN: Amount = Amount(u128::MIN);

    /// Maximum amount
    pub const MAX: Amount = Amount(u128::MAX);

    /// Creates a zero `Amount`
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Obtains the underlying raw `u128` representation, in smallest units
    pub const fn to_raw(&self) -> u128 {
        self.0
    }

    /// Constructs an `Amount` from the underlying raw `u128` representation,
    /// counted in smallest units.
    /// In most cases, you should be using `Amount::from_str("11.23")`.
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Safely adds two amounts, saturating the result on overflow
    #[must_use]
    pub fn saturating_add(self, amount: Amount) -> Self {
        Amount(self.0.saturating_add(amount.0))
    }

    /// Safely subtracts two amounts, saturating the result on underflow
    #[must_use]
    pub fn saturating_sub(self, amount: Amount) -> Self {
        Amount(self.0.saturating_sub(amount.0))
    }

    /// Safely subtracts two amounts, returning `None` on underflow
    /// ```
    /// # use zelt_models::amount::Amount;
    /// # use std::str::FromStr;
    /// let amount_1: Amount = Amount::from_str("42").unwrap();
    /// let amount_2: Amount = Amount::from_str("7").unwrap();
    /// let res: Amount = amount_1.checked_sub(amount_2).unwrap();
    /// assert_eq!(res, Amount::from_str("35").unwrap())
    /// ```
    pub fn checked_sub(self, amount: Amount) -> Option<Self> {
        self.0.checked_sub(amount.0).map(Amount)
    }

    /// Safely adds two amounts, returning `None` on overflow
    /// ```
    /// # use zelt_models::amount::Amount;
    /// # use std::str::FromStr;
    /// let amount_1: Amount = Amount::from_str("42").unwrap();
    /// let amount_2: Amount = Amount::from_str("7").unwrap();
    /// let res: Amount = amount_1.checked_add(amount_2).unwrap();
    /// assert_eq!(res, Amount::from_str("49").unwrap())
    /// ```
    pub fn checked_add(self, amount: Amount) -> Option<Self> {
        self.0.checked_add(amount.0).map(Amount)
    }
}

/// Displays an `Amount` in decimal token units (like "10.33")
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let integer = self.0 / AMOUNT_DECIMAL_FACTOR;
        let fractional = self.0 % AMOUNT_DECIMAL_FACTOR;
        if fractional == 0 {
            write!(f, "{}", integer)
        } else {
            let fractional = format!("{:018}", fractional);
            write!(f, "{}.{}", integer, fractional.trim_end_matches('0'))
        }
    }
}

/// Parses an `Amount` from a decimal string in token units.
///
/// Underscore separators are accepted; more fractional digits than the
/// token has decimals is an error, never a silent truncation.
impl FromStr for Amount {
    type Err = ModelsError;

    fn from_str(str_amount: &str) -> Result<Self, Self::Err> {
        let cleaned: String = str_amount.chars().filter(|c| *c != '_').collect();
        let (integer, fractional) = match cleaned.split_once('.') {
            Some((integer, fractional)) => (integer, fractional),
            None => (cleaned.as_str(), ""),
        };
        if integer.is_empty() && fractional.is_empty() {
            return Err(ModelsError::AmountParseError(format!(
                "empty amount: {}",
                str_amount
            )));
        }
        if fractional.len() > crate::config::TOKEN_DECIMALS as usize {
            return Err(ModelsError::AmountParseError(format!(
                "amount has too many fractional digits: {}",
                str_amount
            )));
        }
        let integer_value: u128 = if integer.is_empty() {
            0
        } else {
            integer.parse().map_err(|_| {
                ModelsError::AmountParseError(format!("invalid amount: {}", str_amount))
            })?
        };
        let fractional_value: u128 = if fractional.is_empty() {
            0
        } else {
            let parsed: u128 = fractional.parse().map_err(|_| {
                ModelsError::AmountParseError(format!("invalid amount: {}", str_amount))
            })?;
            parsed * 10u128.pow(crate::config::TOKEN_DECIMALS - fractional.len() as u32)
        };
        integer_value
            .checked_mul(AMOUNT_DECIMAL_FACTOR)
            .and_then(|raw| raw.checked_add(fractional_value))
            .map(Amount)
            .ok_or_else(|| {
                ModelsError::AmountParseError(format!("amount out of range: {}", str_amount))
            })
    }
}
