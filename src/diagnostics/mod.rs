//! Diagnostic sink
//!
//! Problems this layer cannot hand back to a caller, such as a delete that
//! removed fewer rows than requested, go to an `ErrorReporter`. Reporting is
//! fire-and-forget: implementations must not block and must not fail.
//!
//! - `TracingReporter`: emits an `error!` event
//! - `DiagnosticLog`: appends JSON lines to a file
//! - `RecordingReporter`: keeps reports in memory

mod entry;
mod log;

pub use entry::DiagnosticEntry;
pub use log::DiagnosticLog;

use std::sync::Mutex;

use tracing::error;

use crate::error::EnvelopeError;

/// Receives errors that are not surfaced to callers
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &EnvelopeError);
}

/// Reports errors as tracing events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, reported: &EnvelopeError) {
        error!(kind = reported.kind(), error = %reported, "diagnostic report");
    }
}

/// Collects reports in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<EnvelopeError>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything reported so far
    pub fn reports(&self) -> Vec<EnvelopeError> {
        self.reports
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, error: &EnvelopeError) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push(error.clone());
        }
    }
}
