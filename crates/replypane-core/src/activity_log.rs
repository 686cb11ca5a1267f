//! User-facing activity trace.
//!
//! Append-only and in memory. Each entry is also emitted as a `tracing`
//! event under the `replypane::activity` target.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Local};
use tracing::info;

/// One timestamped log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp `message` with the local wall clock and append it.
    pub fn append(&self, message: impl Into<String>) -> LogEntry {
        let entry = LogEntry {
            timestamp: Local::now(),
            message: message.into(),
        };
        info!(target: "replypane::activity", "{}", entry.message);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
        entry
    }

    /// Snapshot of every entry, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries rendered one per line, as the panel shows them.
    pub fn render(&self) -> String {
        self.entries()
            .iter()
            .map(|e| format!("{e}\n"))
            .collect()
    }
}
