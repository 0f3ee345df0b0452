//! Append-only diagnostic log
//!
//! Each reported error is written as a single JSON line and flushed
//! immediately.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

use super::entry::DiagnosticEntry;
use super::ErrorReporter;
use crate::error::{EnvelopeError, EnvelopeResult};

/// Writes diagnostic entries to a JSONL file
pub struct DiagnosticLog {
    log_path: PathBuf,
    // Serializes appends from concurrent reporters
    write_lock: Mutex<()>,
}

impl DiagnosticLog {
    pub fn new(log_path: PathBuf) -> Self {
        Self {
            log_path,
            write_lock: Mutex::new(()),
        }
    }

    /// Append an entry to the log file
    pub fn log(&self, entry: &DiagnosticEntry) -> EnvelopeResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| EnvelopeError::Io(format!("Diagnostic log lock poisoned: {}", e)))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| EnvelopeError::Io(format!("Failed to open diagnostic log: {}", e)))?;

        let json = serde_json::to_string(entry).map_err(|e| {
            EnvelopeError::Json(format!("Failed to serialize diagnostic entry: {}", e))
        })?;

        writeln!(file, "{}", json)
            .map_err(|e| EnvelopeError::Io(format!("Failed to write diagnostic entry: {}", e)))?;

        file.flush()
            .map_err(|e| EnvelopeError::Io(format!("Failed to flush diagnostic log: {}", e)))?;

        Ok(())
    }

    /// Read all entries, oldest first
    pub fn read_all(&self) -> EnvelopeResult<Vec<DiagnosticEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| EnvelopeError::Io(format!("Failed to open diagnostic log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                EnvelopeError::Io(format!(
                    "Failed to read diagnostic log line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: DiagnosticEntry = serde_json::from_str(&line).map_err(|e| {
                EnvelopeError::Json(format!(
                    "Failed to parse diagnostic entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Read the most recent N entries
    pub fn read_recent(&self, count: usize) -> EnvelopeResult<Vec<DiagnosticEntry>> {
        let all_entries = self.read_all()?;
        let start = all_entries.len().saturating_sub(count);
        Ok(all_entries[start..].to_vec())
    }

    /// Number of entries in the log
    pub fn entry_count(&self) -> EnvelopeResult<usize> {
        Ok(self.read_all()?.len())
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

impl ErrorReporter for DiagnosticLog {
    fn report(&self, error: &EnvelopeError) {
        if let Err(e) = self.log(&DiagnosticEntry::from_error(error)) {
            warn!(error = %e, reported = %error, "could not record diagnostic");
        }
    }
}
