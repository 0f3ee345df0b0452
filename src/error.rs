//! Custom error types for envelope-planner
//!
//! This module defines the error hierarchy for the view model layer using
//! thiserror for ergonomic error definitions.

use thiserror::Error;

/// The main error type for envelope-planner operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvelopeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid argument passed to a constructor or operation
    #[error("Validation error: {0}")]
    Validation(String),

    /// A result row lacks a column the mapper requires
    #[error("Missing column: {column}")]
    MissingColumn { column: String },

    /// A column value cannot be read as the declared type
    #[error("Invalid value for column '{column}': {reason}")]
    InvalidValue { column: String, reason: String },

    /// Currency code not known to the currency context
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Malformed content reference
    #[error("Invalid uri: {0}")]
    InvalidUri(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A single-row query produced more than one row
    #[error("Expected a single row, got {0}")]
    TooManyRows(usize),

    /// Errors raised by the content provider
    #[error("Storage error: {0}")]
    Storage(String),

    /// Store reported a result that disagrees with the request
    #[error("Inconsistency: {0}")]
    Inconsistency(String),

    /// Task or runtime failures
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl EnvelopeError {
    /// Create a "missing column" error
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Create an "invalid value" error
    pub fn invalid_value(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from decoding a result row
    pub fn is_mapping(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. }
                | Self::InvalidValue { .. }
                | Self::UnknownCurrency(_)
                | Self::TooManyRows(_)
        )
    }

    /// Short machine-readable name of the variant, used by diagnostic entries
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Validation(_) => "validation",
            Self::MissingColumn { .. } => "missing_column",
            Self::InvalidValue { .. } => "invalid_value",
            Self::UnknownCurrency(_) => "unknown_currency",
            Self::InvalidUri(_) => "invalid_uri",
            Self::NotFound { .. } => "not_found",
            Self::TooManyRows(_) => "too_many_rows",
            Self::Storage(_) => "storage",
            Self::Inconsistency(_) => "inconsistency",
            Self::Runtime(_) => "runtime",
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for EnvelopeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for EnvelopeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<tokio::task::JoinError> for EnvelopeError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Runtime(err.to_string())
    }
}

/// Result type alias for envelope-planner operations
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;
