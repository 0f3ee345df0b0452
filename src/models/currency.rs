//! Currency descriptors and the lookup service that resolves them

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{EnvelopeError, EnvelopeResult};

/// Describes a currency: its code, display symbol and minor-unit precision
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyUnit {
    pub code: String,
    pub symbol: String,
    pub fraction_digits: u32,
}

impl CurrencyUnit {
    pub fn new(code: impl Into<String>, symbol: impl Into<String>, fraction_digits: u32) -> Self {
        Self {
            code: code.into(),
            symbol: symbol.into(),
            fraction_digits,
        }
    }
}

/// Resolves currency codes to descriptors
pub trait CurrencyContext: Send + Sync {
    /// Look up a currency by code, failing for unknown codes
    fn get(&self, code: &str) -> EnvelopeResult<CurrencyUnit>;
}

const BUILT_IN: &[(&str, &str, u32)] = &[
    ("USD", "$", 2),
    ("EUR", "€", 2),
    ("GBP", "£", 2),
    ("JPY", "¥", 0),
    ("CHF", "CHF", 2),
    ("CAD", "CA$", 2),
    ("AUD", "A$", 2),
    ("SEK", "kr", 2),
    ("NOK", "kr", 2),
    ("PLN", "zł", 2),
    ("INR", "₹", 2),
    ("KWD", "KD", 3),
];

/// In-memory currency table seeded with common ISO currencies
#[derive(Debug, Clone)]
pub struct StaticCurrencyContext {
    units: HashMap<String, CurrencyUnit>,
}

impl StaticCurrencyContext {
    pub fn new() -> Self {
        let units = BUILT_IN
            .iter()
            .map(|(code, symbol, digits)| {
                (code.to_string(), CurrencyUnit::new(*code, *symbol, *digits))
            })
            .collect();
        Self { units }
    }

    /// Register an additional currency, replacing any unit with the same code
    pub fn register(&mut self, unit: CurrencyUnit) {
        self.units.insert(unit.code.clone(), unit);
    }
}

impl Default for StaticCurrencyContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrencyContext for StaticCurrencyContext {
    fn get(&self, code: &str) -> EnvelopeResult<CurrencyUnit> {
        self.units
            .get(code)
            .cloned()
            .ok_or_else(|| EnvelopeError::UnknownCurrency(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_lookup() {
        let context = StaticCurrencyContext::new();
        let jpy = context.get("JPY").unwrap();
        assert_eq!(jpy.fraction_digits, 0);
        assert_eq!(context.get("EUR").unwrap().symbol, "€");
    }

    #[test]
    fn test_unknown_code() {
        let context = StaticCurrencyContext::new();
        assert_eq!(
            context.get("XXX").unwrap_err(),
            EnvelopeError::UnknownCurrency("XXX".into())
        );
    }

    #[test]
    fn test_register() {
        let mut context = StaticCurrencyContext::new();
        context.register(CurrencyUnit::new("BTC", "₿", 8));
        assert_eq!(context.get("BTC").unwrap().fraction_digits, 8);
    }
}
