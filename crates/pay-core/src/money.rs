//! # Money Types
//!
//! Currency codes and conversion of decimal prices into the smallest
//! currency unit expected by the payment gateway.
//!
//! Prices are carried as exact decimals (`rust_decimal`), never as binary
//! floats, so a price of `19.995` is really `19.995` when it gets rounded.

use crate::error::{PaymentError, PaymentResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency code, stored lowercase (`"usd"`, `"eur"`).
///
/// Only the shape of the code is checked here. Whether the gateway
/// recognises it is left to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Parse a currency code, normalising case and surrounding whitespace
    pub fn parse(code: &str) -> PaymentResult<Self> {
        let code = code.trim().to_ascii_lowercase();
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(PaymentError::InvalidRequest(format!(
                "Invalid currency code: '{}'",
                code
            )));
        }
        Ok(Self(code))
    }

    /// Returns the lowercase ISO 4217 code
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Currency {
    type Error = PaymentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_uppercase())
    }
}

/// Convert a decimal price into the smallest currency unit.
///
/// The price is multiplied by 100 and rounded half away from zero, so
/// `19.995` becomes `2000` and `19.994` becomes `1999`.
pub fn to_minor_units(price: Decimal) -> PaymentResult<i64> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(PaymentError::InvalidPrice {
            message: format!("price must not be negative, got {}", price),
        });
    }

    price
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_i64())
        .ok_or_else(|| PaymentError::InvalidPrice {
            message: format!("price {} is out of range", price),
        })
}
