//! Request log sinks.
//!
//! `FileRequestLog` appends one JSON object per line to
//! `<log_path>/<log_name>.log`. Write failures are reported through
//! `tracing` and never reach the caller.

use chrono::Utc;
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;

use crate::config::LogConfig;
use crate::ports::{LogRecord, RequestLog};

// =============================================================================
// File Request Log
// =============================================================================

/// JSON-lines request log backed by a file.
pub struct FileRequestLog {
    /// Target file
    path: PathBuf,
    /// Log switch
    enabled: bool,
    /// Open handle, reused across writes; guards appends so lines from
    /// concurrent calls do not interleave
    file: Mutex<Option<File>>,
}

impl FileRequestLog {
    pub fn new(config: &LogConfig) -> Self {
        Self {
            path: config.file_path(),
            enabled: config.enabled,
            file: Mutex::new(None),
        }
    }

    /// Path records are appended to.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a handle is currently held open.
    pub fn is_open(&self) -> bool {
        self.file
            .lock()
            .map(|file| file.is_some())
            .unwrap_or(false)
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut guard = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if guard.is_none() {
            *guard = Some(self.open()?);
        }

        let result = match guard.as_mut() {
            Some(file) => writeln!(file, "{}", line),
            None => Ok(()),
        };

        // Reopen on the next record after a failed write
        if result.is_err() {
            *guard = None;
        }
        result
    }

    fn open(&self) -> std::io::Result<File> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        OpenOptions::new().create(true).append(true).open(&self.path)
    }
}

impl RequestLog for FileRequestLog {
    fn write(&self, record: LogRecord) {
        if !self.enabled {
            return;
        }

        let mut entry = LogRecord::new();
        entry.insert("logged_at".to_string(), Value::String(Utc::now().to_rfc3339()));
        entry.extend(record);

        let line = match serde_json::to_string(&entry) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to serialize request log record");
                return;
            }
        };

        if let Err(e) = self.append(&line) {
            warn!(error = %e, path = %self.path.display(), "Failed to write request log");
        }
    }
}

// =============================================================================
// Noop Request Log
// =============================================================================

/// Request log that discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRequestLog;

impl RequestLog for NoopRequestLog {
    fn write(&self, _record: LogRecord) {}
}
