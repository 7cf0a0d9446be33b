// crates/draft-content-hooks/src/log.rs
// ============================================================================
// Module: Hook Logging
// Description: Log sinks that receive hook diagnostic lines.
// Purpose: Route hook output to the engine's log without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Hooks write one diagnostic line at a time through [`HookLog`]. The engine
//! decides where lines go; JSON-line, stderr and in-memory sinks are provided.
//! Write failures are dropped: a hook never fails because its log did.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Destination for hook diagnostic lines.
pub trait HookLog: Send + Sync {
    /// Writes a single diagnostic line.
    fn write_line(&self, message: &str);
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// JSON-line record emitted for each hook message.
#[derive(Debug, Serialize)]
struct HookLogRecord<'a> {
    /// Event identifier.
    event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    timestamp_ms: u128,
    /// Message written by the hook.
    message: &'a str,
}

impl<'a> HookLogRecord<'a> {
    /// Creates a record stamped with the current time.
    fn new(message: &'a str) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "hook_log",
            timestamp_ms,
            message,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Hook log that writes JSON lines to any writer.
pub struct JsonLineHookLog<W: Write + Send> {
    /// Output writer for log records.
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLineHookLog<W> {
    /// Wraps a writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the writer, consuming the sink.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> HookLog for JsonLineHookLog<W> {
    fn write_line(&self, message: &str) {
        if let Ok(payload) = serde_json::to_string(&HookLogRecord::new(message))
            && let Ok(mut writer) = self.writer.lock()
        {
            let _ = writeln!(writer, "{payload}");
            let _ = writer.flush();
        }
    }
}

/// Hook log that writes JSON lines to stderr.
pub struct StderrHookLog;

impl HookLog for StderrHookLog {
    fn write_line(&self, message: &str) {
        if let Ok(payload) = serde_json::to_string(&HookLogRecord::new(message)) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Hook log that keeps raw messages in memory.
#[derive(Default)]
pub struct MemoryHookLog {
    /// Messages in write order.
    lines: Mutex<Vec<String>>,
}

impl MemoryHookLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the messages written so far.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl HookLog for MemoryHookLog {
    fn write_line(&self, message: &str) {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).push(message.to_string());
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
