use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

/// Maximum number of entries retained; the oldest entry is evicted beyond this.
pub const LOG_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// One immutable record in the in-memory log ring.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Process-wide bounded log ring shared by every request handler.
///
/// Cloning yields another handle onto the same buffer. The mutex is never held
/// across an await point.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogBuffer {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(LOG_CAPACITY))),
        }
    }

    /// Appends a timestamped entry, evicting the oldest once capacity is
    /// exceeded, and mirrors it to the tracing subscriber.
    pub fn append(&self, level: LogLevel, message: impl Into<String>, data: Option<serde_json::Value>) {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            data,
        };
        match entry.level {
            LogLevel::Info => info!(data = ?entry.data, "{}", entry.message),
            LogLevel::Warning => warn!(data = ?entry.data, "{}", entry.message),
            LogLevel::Error => error!(data = ?entry.data, "{}", entry.message),
        }
        let mut guard = self.entries.lock().unwrap();
        guard.push_back(entry);
        while guard.len() > LOG_CAPACITY {
            guard.pop_front();
        }
    }

    /// Last `n` entries in insertion order, non-destructively.
    pub fn recent(&self, n: usize) -> Vec<LogEntry> {
        let guard = self.entries.lock().unwrap();
        let skip = guard.len().saturating_sub(n);
        guard.iter().skip(skip).cloned().collect()
    }

    pub fn all(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().iter().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Timestamp of the newest entry, if any.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.entries.lock().unwrap().back().map(|entry| entry.timestamp)
    }
}
