//! Recurring plan instances and their realized state

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EnvelopeError, EnvelopeResult};
use crate::provider::contract::{
    KEY_AMOUNT, KEY_BEGIN, KEY_EVENT_ID, KEY_INSTANCE_STATUS, KEY_ROWID, KEY_TEMPLATEID,
    KEY_TITLE, KEY_TRANSACTIONID,
};
use crate::provider::Row;

/// Whether a planned occurrence has been turned into a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanInstanceState {
    #[default]
    Open,
    Applied,
    Cancelled,
}

impl PlanInstanceState {
    /// State of an instance whose status row exists
    ///
    /// A linked transaction means the instance was applied; a status row
    /// without one means it was cancelled.
    pub fn from_transaction_id(transaction_id: Option<i64>) -> Self {
        match transaction_id {
            Some(_) => PlanInstanceState::Applied,
            None => PlanInstanceState::Cancelled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanInstanceState::Open => "OPEN",
            PlanInstanceState::Applied => "APPLIED",
            PlanInstanceState::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for PlanInstanceState {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(PlanInstanceState::Open),
            "APPLIED" => Ok(PlanInstanceState::Applied),
            "CANCELLED" => Ok(PlanInstanceState::Cancelled),
            other => Err(EnvelopeError::invalid_value(
                KEY_INSTANCE_STATUS,
                format!("unknown state '{}'", other),
            )),
        }
    }
}

impl fmt::Display for PlanInstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authoritative state of one plan instance after a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanInstanceUpdate {
    pub template_id: i64,
    pub instance_id: i64,
    pub state: PlanInstanceState,
    pub transaction_id: Option<i64>,
    pub amount: Option<i64>,
}

impl PlanInstanceUpdate {
    /// The update reported when no status row exists
    pub fn open(template_id: i64, instance_id: i64) -> Self {
        Self {
            template_id,
            instance_id,
            state: PlanInstanceState::Open,
            transaction_id: None,
            amount: None,
        }
    }

    /// Decode a status row for the given instance
    pub fn from_row(template_id: i64, instance_id: i64, row: &Row) -> EnvelopeResult<Self> {
        let transaction_id = optional_i64(row, KEY_TRANSACTIONID)?;
        Ok(Self {
            template_id,
            instance_id,
            state: PlanInstanceState::from_transaction_id(transaction_id),
            transaction_id,
            amount: optional_i64(row, KEY_AMOUNT)?,
        })
    }
}

/// One occurrence of a plan inside the planner window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanInstance {
    pub template_id: i64,
    pub instance_id: i64,
    pub event_id: i64,
    pub title: String,
    /// Start of the occurrence in epoch millis
    pub begin: i64,
    /// Local calendar day of `begin`
    pub date: NaiveDate,
    pub amount: Option<i64>,
    pub state: PlanInstanceState,
    pub transaction_id: Option<i64>,
}

impl PlanInstance {
    /// Decode a calendar instance row joined with its template
    ///
    /// Returns `None` for rows that do not belong to a template or cannot be
    /// read; the planner drops those.
    pub fn from_event_row<Tz: TimeZone>(row: &Row, zone: &Tz) -> Option<Self> {
        let template_id = row.get_opt_i64(KEY_TEMPLATEID).ok()??;
        let begin = row.get_i64(KEY_BEGIN).ok()?;
        let date = zone.timestamp_millis_opt(begin).earliest()?.date_naive();
        let state = match row.get(KEY_INSTANCE_STATUS) {
            Some(_) => row.get_string(KEY_INSTANCE_STATUS).ok()?.parse().ok()?,
            None => PlanInstanceState::Open,
        };
        Some(Self {
            template_id,
            instance_id: row.get_i64(KEY_ROWID).ok()?,
            event_id: row.get_i64(KEY_EVENT_ID).ok()?,
            title: row.get_string(KEY_TITLE).ok()?,
            begin,
            date,
            amount: optional_i64(row, KEY_AMOUNT).ok()?,
            state,
            transaction_id: optional_i64(row, KEY_TRANSACTIONID).ok()?,
        })
    }
}

/// Read a column that providers may leave out entirely
fn optional_i64(row: &Row, column: &str) -> EnvelopeResult<Option<i64>> {
    if row.contains(column) {
        row.get_opt_i64(column)
    } else {
        Ok(None)
    }
}
