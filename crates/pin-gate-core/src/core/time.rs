// crates/pin-gate-core/src/core/time.rs
// ============================================================================
// Module: Pin Gate Time Model
// Description: Canonical timestamp representation for pin enforcement windows.
// Purpose: Keep evaluation deterministic by injecting time explicitly.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Pin Gate evaluates enforcement windows against an explicit `now` supplied
//! by the caller. The engine never reads wall-clock time directly; the
//! challenge adapter obtains time through an injectable clock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Milliseconds per second.
const MILLIS_PER_SECOND: i64 = 1_000;
/// Nanoseconds per millisecond.
const NANOS_PER_MILLI: i128 = 1_000_000;

/// Canonical timestamp used for enforcement windows and audit records.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads wall-clock time.
/// - Ordering follows unix-epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix-epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Creates a timestamp from unix-epoch seconds, saturating on overflow.
    #[must_use]
    pub const fn from_unix_seconds(seconds: i64) -> Self {
        Self(seconds.saturating_mul(MILLIS_PER_SECOND))
    }

    /// Returns the timestamp as unix-epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }

    /// Converts an [`OffsetDateTime`] into a timestamp with millisecond precision.
    #[must_use]
    pub fn from_offset_datetime(value: OffsetDateTime) -> Self {
        let seconds = value.unix_timestamp().saturating_mul(MILLIS_PER_SECOND);
        Self(seconds.saturating_add(i64::from(value.millisecond())))
    }

    /// Converts the timestamp into an [`OffsetDateTime`] when representable.
    #[must_use]
    pub fn to_offset_datetime(self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(self.0) * NANOS_PER_MILLI).ok()
    }

    /// Parses an RFC 3339 timestamp such as `2026-01-01T00:00:00Z`.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError::Parse`] when the text is not valid RFC 3339.
    pub fn parse_rfc3339(text: &str) -> Result<Self, TimestampError> {
        let parsed = OffsetDateTime::parse(text.trim(), &Rfc3339)
            .map_err(|err| TimestampError::Parse(err.to_string()))?;
        Ok(Self::from_offset_datetime(parsed))
    }

    /// Formats the timestamp as RFC 3339 text.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError::OutOfRange`] when the value cannot be represented.
    pub fn to_rfc3339(self) -> Result<String, TimestampError> {
        let value = self.to_offset_datetime().ok_or(TimestampError::OutOfRange(self.0))?;
        value.format(&Rfc3339).map_err(|err| TimestampError::Parse(err.to_string()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_rfc3339() {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{}ms", self.0),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when converting timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// Timestamp text could not be parsed or formatted.
    #[error("invalid rfc 3339 timestamp: {0}")]
    Parse(String),
    /// Timestamp value is outside the representable calendar range.
    #[error("timestamp out of range: {0}ms")]
    OutOfRange(i64),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
