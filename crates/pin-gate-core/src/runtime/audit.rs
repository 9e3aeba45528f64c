// crates/pin-gate-core/src/runtime/audit.rs
// ============================================================================
// Module: Pin Gate Audit Logging
// Description: Structured audit events for handled authentication challenges.
// Purpose: Emit JSON-line decision records without a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The challenge adapter records one [`PinAuditEvent`] per handled challenge.
//! Events carry the host, outcome, and disposition only: no certificate
//! material and no block reason. Sinks are injected so deployments can route
//! events to their own logging pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use serde::Serialize;

use crate::core::DecisionOutcome;
use crate::core::Timestamp;
use crate::interfaces::PinAuditSink;
use crate::runtime::adapter::Disposition;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Pin decision audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Evaluation timestamp (milliseconds since epoch).
    pub timestamp_ms: i64,
    /// Host as presented by the transport.
    pub host: String,
    /// Decision outcome.
    pub outcome: DecisionOutcome,
    /// Disposition handed back to the transport.
    pub disposition: Disposition,
}

impl PinAuditEvent {
    /// Creates a pin decision event.
    #[must_use]
    pub fn new(
        host: &str,
        now: Timestamp,
        outcome: DecisionOutcome,
        disposition: Disposition,
    ) -> Self {
        Self {
            event: "pin_decision",
            timestamp_ms: now.as_unix_millis(),
            host: host.to_string(),
            outcome,
            disposition,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrAuditSink;

impl PinAuditSink for StderrAuditSink {
    fn record(&self, event: &PinAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
#[derive(Debug)]
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl PinAuditSink for FileAuditSink {
    fn record(&self, event: &PinAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl PinAuditSink for NoopAuditSink {
    fn record(&self, _event: &PinAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
