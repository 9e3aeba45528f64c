// crates/pin-gate-core/src/core/domain.rs
// ============================================================================
// Module: Pin Gate Domain Configuration
// Description: Per-domain pin sets, host patterns, and enforcement windows.
// Purpose: Describe which hosts are pinned, to what, and when.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`DomainPinConfiguration`] binds a [`HostPattern`] to a [`PinSet`], an
//! [`EnforcementWindow`], and the [`FailureDisposition`] the transport should
//! apply when a pinned chain is blocked. Configurations are immutable once
//! built and are shared read-only across concurrent evaluations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::host::HostName;
use crate::core::host::HostNameError;
use crate::core::pin::PinSet;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Host Pattern
// ============================================================================

/// Hosts a configuration applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostPattern {
    /// Exactly one host.
    Exact(HostName),
    /// The anchor host and every subdomain beneath it.
    Subdomains(HostName),
    /// Hosts exactly one label below the anchor (`*.example.com`).
    Wildcard(HostName),
}

impl HostPattern {
    /// Parses a configured host string.
    ///
    /// A leading `*.` selects [`HostPattern::Wildcard`]; otherwise
    /// `include_subdomains` selects between exact and subdomain matching.
    ///
    /// # Errors
    ///
    /// Returns [`HostNameError`] for malformed hosts, single-label wildcards,
    /// or wildcards combined with `include_subdomains`.
    pub fn parse(pattern: &str, include_subdomains: bool) -> Result<Self, HostNameError> {
        if let Some(rest) = pattern.strip_prefix("*.") {
            if include_subdomains {
                return Err(HostNameError::WildcardWithSubdomains(pattern.to_string()));
            }
            let anchor = HostName::parse(rest)?;
            if anchor.label_count() < 2 {
                return Err(HostNameError::WildcardTooBroad(pattern.to_string()));
            }
            return Ok(Self::Wildcard(anchor));
        }
        let host = HostName::parse(pattern)?;
        if include_subdomains {
            Ok(Self::Subdomains(host))
        } else {
            Ok(Self::Exact(host))
        }
    }

    /// Returns the host the pattern is anchored at.
    #[must_use]
    pub const fn anchor(&self) -> &HostName {
        match self {
            Self::Exact(host) | Self::Subdomains(host) | Self::Wildcard(host) => host,
        }
    }

    /// Returns true when the pattern covers `host`.
    #[must_use]
    pub fn matches(&self, host: &HostName) -> bool {
        match self {
            Self::Exact(anchor) => anchor == host,
            Self::Subdomains(anchor) => anchor == host || host.is_subdomain_of(anchor),
            Self::Wildcard(anchor) => {
                host.is_subdomain_of(anchor) && host.label_count() == anchor.label_count() + 1
            }
        }
    }
}

impl fmt::Display for HostPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(host) => write!(f, "{host}"),
            Self::Subdomains(host) => write!(f, "{host} (including subdomains)"),
            Self::Wildcard(host) => write!(f, "*.{host}"),
        }
    }
}

// ============================================================================
// SECTION: Enforcement Window
// ============================================================================

/// Time range during which a domain's pins are enforced.
///
/// # Invariants
/// - `not_before` is inclusive, `not_after` is exclusive.
/// - When both bounds are present, `not_before < not_after`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EnforcementWindow {
    /// First instant at which pins are enforced.
    not_before: Option<Timestamp>,
    /// First instant at which pins are no longer enforced.
    not_after: Option<Timestamp>,
}

impl EnforcementWindow {
    /// Window that is always active.
    #[must_use]
    pub const fn always() -> Self {
        Self {
            not_before: None,
            not_after: None,
        }
    }

    /// Builds a window from optional bounds.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::Inverted`] when `not_before >= not_after`.
    pub fn new(
        not_before: Option<Timestamp>,
        not_after: Option<Timestamp>,
    ) -> Result<Self, WindowError> {
        if let (Some(start), Some(end)) = (not_before, not_after)
            && start >= end
        {
            return Err(WindowError::Inverted {
                not_before: start,
                not_after: end,
            });
        }
        Ok(Self {
            not_before,
            not_after,
        })
    }

    /// Returns the inclusive start bound.
    #[must_use]
    pub const fn not_before(&self) -> Option<Timestamp> {
        self.not_before
    }

    /// Returns the exclusive end bound.
    #[must_use]
    pub const fn not_after(&self) -> Option<Timestamp> {
        self.not_after
    }

    /// Returns true when `now` falls inside the window.
    #[must_use]
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.not_before.is_none_or(|start| now >= start)
            && self.not_after.is_none_or(|end| now < end)
    }
}

/// Enforcement window construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// Start bound is not before the end bound.
    #[error("enforcement window start {not_before} is not before end {not_after}")]
    Inverted {
        /// Inclusive start bound.
        not_before: Timestamp,
        /// Exclusive end bound.
        not_after: Timestamp,
    },
}

// ============================================================================
// SECTION: Failure Disposition
// ============================================================================

/// Transport action requested when a pinned chain is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FailureDisposition {
    /// Reject the protection space; the connection fails.
    #[default]
    #[serde(rename = "reject")]
    RejectProtectionSpace,
    /// Cancel the authentication challenge; the connection fails.
    #[serde(rename = "cancel")]
    CancelChallenge,
}

// ============================================================================
// SECTION: Domain Pin Configuration
// ============================================================================

/// Pin configuration for one host pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainPinConfiguration {
    /// Hosts this configuration applies to.
    pub pattern: HostPattern,
    /// Acceptable pins.
    pub pins: PinSet,
    /// When the pins are enforced.
    pub window: EnforcementWindow,
    /// Transport action on block.
    pub on_failure: FailureDisposition,
}

impl DomainPinConfiguration {
    /// Creates an always-active configuration that rejects on failure.
    #[must_use]
    pub const fn new(pattern: HostPattern, pins: PinSet) -> Self {
        Self {
            pattern,
            pins,
            window: EnforcementWindow::always(),
            on_failure: FailureDisposition::RejectProtectionSpace,
        }
    }

    /// Sets the enforcement window.
    #[must_use]
    pub const fn with_window(mut self, window: EnforcementWindow) -> Self {
        self.window = window;
        self
    }

    /// Sets the failure disposition.
    #[must_use]
    pub const fn with_failure_disposition(mut self, on_failure: FailureDisposition) -> Self {
        self.on_failure = on_failure;
        self
    }

    /// Returns true when pinning is enforced at `now`.
    #[must_use]
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.window.is_active(now)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Tests unwrap on literal patterns.")]

    use super::EnforcementWindow;
    use super::HostPattern;
    use crate::core::host::HostName;
    use crate::core::host::HostNameError;
    use crate::core::time::Timestamp;

    fn host(value: &str) -> HostName {
        HostName::parse(value).unwrap()
    }

    #[test]
    fn exact_pattern_matches_only_itself() {
        let pattern = HostPattern::parse("example.com", false).unwrap();
        assert!(pattern.matches(&host("EXAMPLE.com")));
        assert!(!pattern.matches(&host("www.example.com")));
    }

    #[test]
    fn subdomain_pattern_covers_anchor_and_descendants() {
        let pattern = HostPattern::parse("example.com", true).unwrap();
        assert!(pattern.matches(&host("example.com")));
        assert!(pattern.matches(&host("a.b.example.com")));
        assert!(!pattern.matches(&host("notexample.com")));
    }

    #[test]
    fn wildcard_pattern_covers_one_label() {
        let pattern = HostPattern::parse("*.example.com", false).unwrap();
        assert!(pattern.matches(&host("www.example.com")));
        assert!(!pattern.matches(&host("example.com")));
        assert!(!pattern.matches(&host("a.b.example.com")));
    }

    #[test]
    fn wildcard_pattern_rejects_tld_and_subdomain_flag() {
        assert!(matches!(
            HostPattern::parse("*.com", false),
            Err(HostNameError::WildcardTooBroad(_))
        ));
        assert!(matches!(
            HostPattern::parse("*.example.com", true),
            Err(HostNameError::WildcardWithSubdomains(_))
        ));
    }

    #[test]
    fn window_bounds_are_inclusive_then_exclusive() {
        let start = Timestamp::from_unix_millis(100);
        let end = Timestamp::from_unix_millis(200);
        let window = EnforcementWindow::new(Some(start), Some(end)).unwrap();
        assert!(!window.is_active(Timestamp::from_unix_millis(99)));
        assert!(window.is_active(start));
        assert!(window.is_active(Timestamp::from_unix_millis(199)));
        assert!(!window.is_active(end));
        assert!(EnforcementWindow::new(Some(end), Some(start)).is_err());
        assert!(EnforcementWindow::new(Some(end), Some(end)).is_err());
    }
}
