// crates/pin-gate-core/src/core/host.rs
// ============================================================================
// Module: Pin Gate Host Names
// Description: Normalized host names used as configuration lookup keys.
// Purpose: Ensure lookups compare hosts in one canonical form.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Host names are normalized once at the boundary: ASCII lowercase with a
//! single trailing dot removed. Wildcards are not host names; they live in
//! [`crate::core::HostPattern`].
//!
//! A value containing `:` must be an IPv6 literal, bracketed or bare. It is
//! stored in canonical text form with any zone identifier dropped. Anything
//! else with a `:` (for example `example.com:443`) is rejected so a port
//! suffix can never slip past a pinned host's lookup.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::net::Ipv6Addr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum length of a host name in bytes.
pub const MAX_HOST_NAME_LENGTH: usize = 253;

// ============================================================================
// SECTION: Host Name
// ============================================================================

/// Normalized host name.
///
/// # Invariants
/// - Non-empty, at most [`MAX_HOST_NAME_LENGTH`] bytes.
/// - ASCII lowercase, no trailing dot, no empty labels.
/// - Contains no whitespace, control, path, or wildcard characters.
/// - Contains `:` only as a canonical IPv6 literal, never as a port separator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostName(String);

impl HostName {
    /// Parses and normalizes a host name.
    ///
    /// # Errors
    ///
    /// Returns [`HostNameError`] when the value is empty, too long, or malformed.
    pub fn parse(value: &str) -> Result<Self, HostNameError> {
        if value.contains(':') {
            return parse_ipv6_literal(value);
        }
        let trimmed = value.strip_suffix('.').unwrap_or(value);
        if trimmed.is_empty() {
            return Err(HostNameError::Empty);
        }
        if trimmed.len() > MAX_HOST_NAME_LENGTH {
            return Err(HostNameError::TooLong(trimmed.len()));
        }
        if let Some(ch) = trimmed.chars().find(|ch| is_forbidden(*ch)) {
            return Err(HostNameError::InvalidCharacter(ch));
        }
        if trimmed.split('.').any(str::is_empty) {
            return Err(HostNameError::EmptyLabel(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Returns the host name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the host is an IPv6 literal.
    #[must_use]
    pub fn is_ipv6(&self) -> bool {
        self.0.contains(':')
    }

    /// Returns the number of dot-separated labels.
    #[must_use]
    pub fn label_count(&self) -> usize {
        self.0.split('.').count()
    }

    /// Returns true when this host is a strict subdomain of `parent`.
    #[must_use]
    pub fn is_subdomain_of(&self, parent: &Self) -> bool {
        if self.is_ipv6() {
            return false;
        }
        self.0
            .strip_suffix(parent.as_str())
            .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.'))
    }
}

/// Parses an IPv6 literal into its canonical form without the zone identifier.
fn parse_ipv6_literal(value: &str) -> Result<HostName, HostNameError> {
    let unbracketed =
        value.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')).unwrap_or(value);
    let address = match unbracketed.split_once('%') {
        Some((_, "")) => return Err(HostNameError::InvalidAddress(value.to_string())),
        Some((address, _zone)) => address,
        None => unbracketed,
    };
    address
        .parse::<Ipv6Addr>()
        .map(|address| HostName(address.to_string()))
        .map_err(|_| HostNameError::InvalidAddress(value.to_string()))
}

/// Returns true for characters never valid in a host name.
fn is_forbidden(ch: char) -> bool {
    ch.is_whitespace()
        || ch.is_control()
        || matches!(ch, '/' | '\\' | '@' | '?' | '#' | '*' | '%' | ',' | ';')
}

impl fmt::Display for HostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for HostName {
    type Error = HostNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for HostName {
    type Error = HostNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<HostName> for String {
    fn from(value: HostName) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Host name and host pattern validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostNameError {
    /// Host name is empty.
    #[error("host name must be non-empty")]
    Empty,
    /// Host name exceeds the maximum length.
    #[error("host name exceeds {MAX_HOST_NAME_LENGTH} bytes: {0}")]
    TooLong(usize),
    /// Host name contains a forbidden character.
    #[error("host name contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// Host contains `:` but is not an IPv6 literal.
    #[error("host is not a name or IPv6 literal (ports are not allowed): {0}")]
    InvalidAddress(String),
    /// Host name contains an empty label.
    #[error("host name contains an empty label: {0}")]
    EmptyLabel(String),
    /// Wildcard pattern covers a single label (for example `*.com`).
    #[error("wildcard pattern is too broad: {0}")]
    WildcardTooBroad(String),
    /// Wildcard pattern was combined with `include_subdomains`.
    #[error("wildcard pattern cannot also include subdomains: {0}")]
    WildcardWithSubdomains(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
