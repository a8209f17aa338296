// Debug logging module for per-tick decision logging
//
// Each decision is written as one JSON line together with the inputs and the
// pre-tick policy state, so the replay tool can re-run it exactly. The file
// handle is shared behind a mutex so parallel sessions can log to one file.

use log::error;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Arc;

use crate::policy::{PolicyState, Status};
use crate::types::Coord;

/// Represents a single debug log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionLogEntry {
    pub seed: u64,
    pub tick: u64,
    pub cols: i32,
    pub rows: i32,
    pub body: Vec<Coord>,
    pub food: Option<Coord>,
    pub score: u32,
    /// Policy state before the decision was made
    pub state: PolicyState,
    pub chosen: Coord,
    pub chosen_move: String,
    pub status: Status,
    pub timestamp: String,
}

/// Shared debug logger state
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Appends one decision. Write failures are logged and otherwise ignored.
    pub fn log_decision(&self, entry: &DecisionLogEntry) {
        if !self.enabled {
            return;
        }

        let json_line = match serde_json::to_string(entry) {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to serialize debug log entry: {}", e);
                return;
            }
        };

        let mut guard = self.file.lock();
        if let Some(file) = guard.as_mut() {
            if let Err(e) = writeln!(file, "{}", json_line) {
                error!("Failed to write debug log entry: {}", e);
            } else if let Err(e) = file.flush() {
                error!("Failed to flush debug log: {}", e);
            }
        }
    }
}

/// RFC 3339 timestamp for log entries
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
