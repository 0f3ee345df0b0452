//! Money type for representing currency amounts
//!
//! Amounts are stored in minor units (i64) and always travel together with
//! their currency, so a bare number never stands in for money.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::currency::CurrencyUnit;

/// A monetary amount in the minor units of its currency
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    currency: CurrencyUnit,
    amount_minor: i64,
}

impl Money {
    /// Create a Money amount from minor units
    pub fn new(currency: CurrencyUnit, amount_minor: i64) -> Self {
        Self {
            currency,
            amount_minor,
        }
    }

    /// Create a zero amount in the given currency
    pub fn zero(currency: CurrencyUnit) -> Self {
        Self::new(currency, 0)
    }

    pub fn currency(&self) -> &CurrencyUnit {
        &self.currency
    }

    /// Get the amount in minor units
    pub fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Check if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Format with the currency symbol, e.g. "-$10.50" or "¥1200"
    pub fn format(&self) -> String {
        let digits = self.currency.fraction_digits;
        let abs = self.amount_minor.unsigned_abs();
        let sign = if self.is_negative() { "-" } else { "" };
        if digits == 0 {
            return format!("{}{}{}", sign, self.currency.symbol, abs);
        }
        let scale = 10u64.pow(digits);
        format!(
            "{}{}{}.{:0width$}",
            sign,
            self.currency.symbol,
            abs / scale,
            abs % scale,
            width = digits as usize
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}
