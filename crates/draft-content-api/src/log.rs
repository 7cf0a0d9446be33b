// crates/draft-content-api/src/log.rs
// ============================================================================
// Module: Service Logging
// Description: Structured JSON-line log events and sinks.
// Purpose: Emit request and upstream events without a logging framework.
// Dependencies: serde, serde_json, draft-content-config
// ============================================================================

//! ## Overview
//! Every component logs through [`LogSink`]. Events are serialized as one JSON
//! object per line carrying the event name, level, message, and the request's
//! transaction id and content uuid when known. Sink failures never surface to
//! callers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use draft_content_config::LogSinkType;
use draft_content_config::LoggingConfig;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Severity attached to a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Routine progress.
    Info,
    /// Degraded but handled.
    Warn,
    /// Request or upstream failure.
    Error,
}

/// Structured log event.
#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
    /// Request transaction id, when the event belongs to a request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Content uuid, when the event concerns a single piece of content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Additional structured fields.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,
}

impl LogEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(event: &'static str, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            event,
            timestamp_ms: timestamp_ms(),
            level,
            message: message.into(),
            transaction_id: None,
            uuid: None,
            fields: Map::new(),
        }
    }

    /// Creates an info event.
    #[must_use]
    pub fn info(event: &'static str, message: impl Into<String>) -> Self {
        Self::new(event, LogLevel::Info, message)
    }

    /// Creates a warning event.
    #[must_use]
    pub fn warn(event: &'static str, message: impl Into<String>) -> Self {
        Self::new(event, LogLevel::Warn, message)
    }

    /// Creates an error event.
    #[must_use]
    pub fn error(event: &'static str, message: impl Into<String>) -> Self {
        Self::new(event, LogLevel::Error, message)
    }

    /// Attaches a transaction id.
    #[must_use]
    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    /// Attaches a content uuid.
    #[must_use]
    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    /// Attaches an extra field.
    #[must_use]
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Attaches an error description under the `error` field.
    #[must_use]
    pub fn with_error(self, error: &impl Display) -> Self {
        self.with_field("error", error.to_string())
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for structured log events.
pub trait LogSink: Send + Sync {
    /// Records a log event.
    fn record(&self, event: &LogEvent);
}

/// Log sink that writes JSON lines to stderr.
pub struct StderrLogSink;

impl LogSink for StderrLogSink {
    fn record(&self, event: &LogEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Log sink that appends JSON lines to a file.
pub struct FileLogSink {
    /// File handle for log output.
    file: Mutex<File>,
}

impl FileLogSink {
    /// Opens a file-backed sink in append mode.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::Error`] when the file cannot be opened.
    pub fn new(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileLogSink {
    fn record(&self, event: &LogEvent) {
        let Ok(payload) = serde_json::to_string(event) else {
            return;
        };
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Log sink that drops all events.
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    fn record(&self, _event: &LogEvent) {}
}

/// Log sink that keeps events in memory for inspection.
#[derive(Default)]
pub struct MemoryLogSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Returns the recorded events carrying the given event name.
    #[must_use]
    pub fn named(&self, event: &str) -> Vec<LogEvent> {
        self.events().into_iter().filter(|record| record.event == event).collect()
    }
}

impl LogSink for MemoryLogSink {
    fn record(&self, event: &LogEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event.clone());
    }
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds the sink selected by logging configuration.
///
/// # Errors
///
/// Returns [`std::io::Error`] when a file sink cannot be opened or has no path.
pub fn build_log_sink(config: &LoggingConfig) -> Result<Arc<dyn LogSink>, std::io::Error> {
    match config.sink {
        LogSinkType::Stderr => Ok(Arc::new(StderrLogSink)),
        LogSinkType::None => Ok(Arc::new(NoopLogSink)),
        LogSinkType::File => {
            let path = config.path.as_deref().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "file log sink requires path")
            })?;
            Ok(Arc::new(FileLogSink::new(path)?))
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the current time in milliseconds since the Unix epoch.
fn timestamp_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions use unwrap for clarity.")]

    use super::*;

    #[test]
    fn event_serializes_without_empty_optionals() {
        let event = LogEvent::info("startup", "ready");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "startup");
        assert_eq!(value["level"], "info");
        assert!(value.get("transaction_id").is_none());
        assert!(value.get("fields").is_none());
    }

    #[test]
    fn event_carries_request_context() {
        let event = LogEvent::error("draft_read_failed", "boom")
            .with_transaction_id("tid_abc")
            .with_uuid("u-1")
            .with_field("status", 500);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["transaction_id"], "tid_abc");
        assert_eq!(value["uuid"], "u-1");
        assert_eq!(value["fields"]["status"], 500);
    }

    #[test]
    fn file_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("service.log");
        let sink = FileLogSink::new(&path).unwrap();
        sink.record(&LogEvent::info("one", "first"));
        sink.record(&LogEvent::warn("two", "second"));
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "two");
        assert_eq!(second["level"], "warn");
    }

    #[test]
    fn file_sink_without_path_is_rejected() {
        let config = LoggingConfig {
            sink: LogSinkType::File,
            path: None,
        };
        assert!(build_log_sink(&config).is_err());
    }
}
