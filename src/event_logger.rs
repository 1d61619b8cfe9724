//! Draw event logging for auditing past draws

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{error, info};

/// Types of draw events that can be logged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DrawEvent {
    /// Page connected
    ClientJoin { connection_id: String },
    /// Page disconnected
    ClientLeave { connection_id: String },
    /// Pool reshuffled
    Reset,
    /// Rolling started
    RollStart,
    /// A number was drawn
    Draw { number: u8, remaining: usize },
    /// Every number has been drawn
    Exhausted { drawn: Vec<u8> },
}

/// Logged event with timestamp
#[derive(Debug, Serialize)]
struct LogEntry<'a> {
    /// Unix timestamp in milliseconds
    timestamp_ms: u128,
    #[serde(flatten)]
    event: &'a DrawEvent,
}

/// Append-only JSON-lines draw log
pub struct EventLogger {
    /// File writer (None if logging disabled)
    writer: Option<Mutex<BufWriter<File>>>,
}

impl EventLogger {
    /// Open the log at `path`, or a disabled logger when `path` is `None`
    pub fn open(path: Option<&str>) -> Self {
        let Some(path) = path else {
            info!("Event logging is disabled");
            return Self::disabled();
        };

        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                info!("Event logging enabled, writing to {}", path);
                Self {
                    writer: Some(Mutex::new(BufWriter::new(file))),
                }
            }
            Err(e) => {
                error!("Failed to open event log file {}: {}", path, e);
                Self::disabled()
            }
        }
    }

    /// A logger that drops every event
    pub fn disabled() -> Self {
        Self { writer: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    /// Log a draw event
    pub fn log(&self, event: DrawEvent) {
        let Some(ref writer) = self.writer else {
            return;
        };

        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);

        let entry = LogEntry {
            timestamp_ms,
            event: &event,
        };

        if let Ok(mut w) = writer.lock() {
            if let Ok(json) = serde_json::to_string(&entry) {
                let _ = writeln!(w, "{}", json);
                let _ = w.flush();
            }
        }
    }

    pub fn log_join(&self, connection_id: &str) {
        self.log(DrawEvent::ClientJoin {
            connection_id: connection_id.to_string(),
        });
    }

    pub fn log_leave(&self, connection_id: &str) {
        self.log(DrawEvent::ClientLeave {
            connection_id: connection_id.to_string(),
        });
    }

    pub fn log_draw(&self, number: u8, remaining: usize) {
        self.log(DrawEvent::Draw { number, remaining });
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::disabled()
    }
}
