//! Arbitrary-precision non-negative integers as they arrive from the runtime.
//!
//! Balances, insurance limits and expiry stamps are unbounded on chain, so they
//! are carried as canonical decimal digits instead of a fixed-width integer.
//! The wire form accepts JSON strings (optionally with the `n` suffix the
//! runtime uses for big integers) or plain JSON integers of any length, and
//! always writes a string back out. Integers wider than `u64` keep their exact
//! digits because serde_json is built with `arbitrary_precision`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountParseError {
    #[error("amount is empty")]
    Empty,
    #[error("amount '{0}' contains a non-digit character")]
    InvalidDigit(String),
    #[error("amount must be an integer or a digit string, got {0}")]
    WrongType(&'static str),
}

/// Canonical decimal representation: ASCII digits, no leading zeros except
/// for the single digit `0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "String")]
pub struct Amount(String);

impl Amount {
    pub fn zero() -> Self {
        Amount("0".into())
    }

    pub fn from_u64(value: u64) -> Self {
        Amount(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == "0"
    }

    /// Narrows to `u64` when the value fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    /// Splits into whole and fractional digit strings for a token with
    /// `decimals` fractional places. The fractional part is left-padded.
    pub fn split_decimals(&self, decimals: u8) -> (String, String) {
        let decimals = decimals as usize;
        if decimals == 0 {
            return (self.0.clone(), String::new());
        }
        if self.0.len() > decimals {
            let (whole, frac) = self.0.split_at(self.0.len() - decimals);
            (whole.to_string(), frac.to_string())
        } else {
            let mut frac = "0".repeat(decimals - self.0.len());
            frac.push_str(&self.0);
            ("0".to_string(), frac)
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount::zero()
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_suffix('n').unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(AmountParseError::Empty);
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountParseError::InvalidDigit(raw.to_string()));
        }
        let canonical = digits.trim_start_matches('0');
        if canonical.is_empty() {
            Ok(Amount::zero())
        } else {
            Ok(Amount(canonical.to_string()))
        }
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount::from_u64(value)
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        // Canonical form makes digit count decide magnitude first.
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl TryFrom<Value> for Amount {
    type Error = AmountParseError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        match raw {
            Value::Number(number) => number.to_string().parse(),
            Value::String(text) => text.parse(),
            Value::Null => Err(AmountParseError::WrongType("null")),
            Value::Bool(_) => Err(AmountParseError::WrongType("a boolean")),
            Value::Array(_) => Err(AmountParseError::WrongType("an array")),
            Value::Object(_) => Err(AmountParseError::WrongType("an object")),
        }
    }
}
