//! Budget model
//!
//! A budget caps spending for one account, or for every account sharing a
//! currency, over a recurring period.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::currency::CurrencyContext;
use super::money::Money;
use crate::error::{EnvelopeError, EnvelopeResult};
use crate::provider::contract::{
    KEY_ACCOUNTID, KEY_BUDGET, KEY_COLOR, KEY_CURRENCY, KEY_DESCRIPTION, KEY_GROUPING, KEY_ROWID,
    KEY_TITLE,
};
use crate::provider::Row;

/// Account id standing for "all accounts" when a budget has no own account
pub const HOME_AGGREGATE_ID: i64 = i32::MIN as i64;

/// Period a budget amount applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Grouping {
    None,
    Day,
    Week,
    Month,
    Year,
}

impl Grouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grouping::None => "NONE",
            Grouping::Day => "DAY",
            Grouping::Week => "WEEK",
            Grouping::Month => "MONTH",
            Grouping::Year => "YEAR",
        }
    }
}

impl FromStr for Grouping {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Grouping::None),
            "DAY" => Ok(Grouping::Day),
            "WEEK" => Ok(Grouping::Week),
            "MONTH" => Ok(Grouping::Month),
            "YEAR" => Ok(Grouping::Year),
            other => Err(EnvelopeError::invalid_value(
                KEY_GROUPING,
                format!("unknown grouping '{}'", other),
            )),
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one budget row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,

    /// Owning account, or a negative id for an aggregate over a currency
    pub account_id: i64,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Currency code the amount is expressed in
    pub currency: String,

    pub amount: Money,

    pub grouping: Grouping,

    /// RGB color
    pub color: i32,
}

impl Budget {
    /// Decode a budget row
    ///
    /// Every column is required; `description` may be NULL. An unknown
    /// currency or grouping fails the row.
    pub fn from_row(row: &Row, currencies: &dyn CurrencyContext) -> EnvelopeResult<Self> {
        let currency = row.get_string(KEY_CURRENCY)?;
        let unit = currencies.get(&currency)?;
        Ok(Self {
            id: row.get_i64(KEY_ROWID)?,
            account_id: row.get_i64(KEY_ACCOUNTID)?,
            title: row.get_string(KEY_TITLE)?,
            description: row.get_opt_string(KEY_DESCRIPTION)?,
            amount: Money::new(unit, row.get_i64(KEY_BUDGET)?),
            grouping: row.get_string(KEY_GROUPING)?.parse()?,
            color: row.get_i32(KEY_COLOR)?,
            currency,
        })
    }

    /// True when the budget spans every account of its currency
    pub fn is_aggregate(&self) -> bool {
        self.account_id < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StaticCurrencyContext;

    fn row() -> Row {
        Row::new()
            .with(KEY_ROWID, 3i64)
            .with(KEY_ACCOUNTID, -2i64)
            .with(KEY_TITLE, "Food")
            .with(KEY_DESCRIPTION, Option::<String>::None)
            .with(KEY_CURRENCY, "EUR")
            .with(KEY_BUDGET, 45_000i64)
            .with(KEY_GROUPING, "MONTH")
            .with(KEY_COLOR, 0x00ff00i32)
    }

    #[test]
    fn test_from_row() {
        let budget = Budget::from_row(&row(), &StaticCurrencyContext::new()).unwrap();
        assert_eq!(budget.id, 3);
        assert_eq!(budget.title, "Food");
        assert_eq!(budget.description, None);
        assert_eq!(budget.currency, "EUR");
        assert_eq!(budget.amount.amount_minor(), 45_000);
        assert_eq!(budget.amount.currency().code, "EUR");
        assert_eq!(budget.grouping, Grouping::Month);
        assert_eq!(budget.color, 0x00ff00);
        assert!(budget.is_aggregate());
    }

    #[test]
    fn test_unknown_grouping_fails() {
        let bad = row().with(KEY_GROUPING, "FORTNIGHT");
        let err = Budget::from_row(&bad, &StaticCurrencyContext::new()).unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidValue { ref column, .. } if column == KEY_GROUPING));
    }

    #[test]
    fn test_missing_column_fails() {
        let mut bad = Row::new();
        for (column, value) in row().columns().filter(|(c, _)| *c != KEY_COLOR) {
            bad.put(column, value.clone());
        }
        assert_eq!(
            Budget::from_row(&bad, &StaticCurrencyContext::new()).unwrap_err(),
            EnvelopeError::missing_column(KEY_COLOR)
        );
    }

    #[test]
    fn test_unknown_currency_fails() {
        let bad = row().with(KEY_CURRENCY, "ZZZ");
        assert_eq!(
            Budget::from_row(&bad, &StaticCurrencyContext::new()).unwrap_err(),
            EnvelopeError::UnknownCurrency("ZZZ".into())
        );
    }

    #[test]
    fn test_grouping_names() {
        for grouping in [
            Grouping::None,
            Grouping::Day,
            Grouping::Week,
            Grouping::Month,
            Grouping::Year,
        ] {
            assert_eq!(grouping.as_str().parse::<Grouping>().unwrap(), grouping);
        }
        assert!("month".parse::<Grouping>().is_err());
    }
}
