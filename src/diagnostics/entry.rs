//! Diagnostic entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EnvelopeError;

/// A single diagnostic log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticEntry {
    /// When the problem was reported (UTC)
    pub timestamp: DateTime<Utc>,

    /// Error variant, e.g. "inconsistency"
    pub kind: String,

    /// Rendered error message
    pub message: String,
}

impl DiagnosticEntry {
    /// Create an entry for an error, stamped with the current time
    pub fn from_error(error: &EnvelopeError) -> Self {
        Self {
            timestamp: Utc::now(),
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}
