//! Result rows and column values
//!
//! Rows are ordered column/value pairs. Typed getters turn absent columns and
//! values of the wrong shape into mapping errors instead of defaults.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EnvelopeError, EnvelopeResult};

/// A single column value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// An ordered set of column values, used both for results and for writes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

/// Values written by an update
pub type ContentValues = Row;

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.put(column, value);
        self
    }

    /// Set a column, replacing an existing value
    pub fn put(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(c, v)| (c.as_str(), v))
    }

    fn require(&self, column: &str) -> EnvelopeResult<&Value> {
        self.get(column)
            .ok_or_else(|| EnvelopeError::missing_column(column))
    }

    /// Read an integer column; NULL is an error
    pub fn get_i64(&self, column: &str) -> EnvelopeResult<i64> {
        self.get_opt_i64(column)?
            .ok_or_else(|| EnvelopeError::invalid_value(column, "unexpected NULL"))
    }

    /// Read a nullable integer column
    pub fn get_opt_i64(&self, column: &str) -> EnvelopeResult<Option<i64>> {
        match self.require(column)? {
            Value::Null => Ok(None),
            Value::Integer(n) => Ok(Some(*n)),
            Value::Text(s) => s.trim().parse().map(Some).map_err(|_| {
                EnvelopeError::invalid_value(column, format!("'{}' is not an integer", s))
            }),
            Value::Real(r) => Err(EnvelopeError::invalid_value(
                column,
                format!("{} is not an integer", r),
            )),
        }
    }

    pub fn get_i32(&self, column: &str) -> EnvelopeResult<i32> {
        let value = self.get_i64(column)?;
        i32::try_from(value).map_err(|_| {
            EnvelopeError::invalid_value(column, format!("{} does not fit in 32 bits", value))
        })
    }

    /// Read a text column; NULL is an error
    pub fn get_string(&self, column: &str) -> EnvelopeResult<String> {
        self.get_opt_string(column)?
            .ok_or_else(|| EnvelopeError::invalid_value(column, "unexpected NULL"))
    }

    /// Read a nullable text column
    pub fn get_opt_string(&self, column: &str) -> EnvelopeResult<Option<String>> {
        match self.require(column)? {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s.clone())),
            Value::Integer(n) => Ok(Some(n.to_string())),
            Value::Real(r) => Ok(Some(r.to_string())),
        }
    }
}
