// crates/pin-gate-core/src/runtime/snapshot.rs
// ============================================================================
// Module: Pin Gate Configuration Snapshots
// Description: Immutable pin configuration sets and atomic snapshot swapping.
// Purpose: Resolve one authoritative configuration per host, safely shared.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! A [`PinSnapshot`] is an immutable set of domain configurations with a
//! fixed precedence: an exact host wins, otherwise the subdomain or wildcard
//! pattern with the longest anchor wins. Two suffix patterns on the same
//! anchor would tie, so construction rejects them as ambiguous.
//!
//! [`SharedPinConfig`] publishes snapshots by whole-`Arc` replacement; a
//! lookup clones the current `Arc` once, so a concurrent reload never shows
//! an evaluation a partially updated configuration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use thiserror::Error;

use crate::core::DomainPinConfiguration;
use crate::core::HostName;
use crate::core::HostPattern;
use crate::interfaces::PinConfigSource;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Snapshot construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// Two configurations use the same pattern.
    #[error("duplicate pin configuration for {0}")]
    Duplicate(String),
    /// Two suffix patterns share an anchor and would tie for some host.
    #[error("ambiguous pin configuration: {first} and {second} overlap with equal precedence")]
    Ambiguous {
        /// First conflicting pattern.
        first: String,
        /// Second conflicting pattern.
        second: String,
    },
}

// ============================================================================
// SECTION: Snapshot
// ============================================================================

/// Immutable set of domain pin configurations.
#[derive(Debug, Clone, Default)]
pub struct PinSnapshot {
    /// Exact-host configurations keyed by host.
    exact: BTreeMap<HostName, Arc<DomainPinConfiguration>>,
    /// Subdomain and wildcard configurations, longest anchor first.
    suffixes: Vec<Arc<DomainPinConfiguration>>,
}

impl PinSnapshot {
    /// Creates an empty snapshot (no host is pinned).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a snapshot, rejecting duplicate and ambiguous patterns.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when two configurations could both claim a host
    /// with equal precedence.
    pub fn new(
        domains: impl IntoIterator<Item = DomainPinConfiguration>,
    ) -> Result<Self, SnapshotError> {
        let mut exact: BTreeMap<HostName, Arc<DomainPinConfiguration>> = BTreeMap::new();
        let mut suffixes: BTreeMap<HostName, Arc<DomainPinConfiguration>> = BTreeMap::new();
        for domain in domains {
            let domain = Arc::new(domain);
            match &domain.pattern {
                HostPattern::Exact(host) => {
                    if exact.insert(host.clone(), Arc::clone(&domain)).is_some() {
                        return Err(SnapshotError::Duplicate(domain.pattern.to_string()));
                    }
                }
                HostPattern::Subdomains(anchor) | HostPattern::Wildcard(anchor) => {
                    if let Some(existing) = suffixes.insert(anchor.clone(), Arc::clone(&domain)) {
                        if existing.pattern == domain.pattern {
                            return Err(SnapshotError::Duplicate(domain.pattern.to_string()));
                        }
                        return Err(SnapshotError::Ambiguous {
                            first: existing.pattern.to_string(),
                            second: domain.pattern.to_string(),
                        });
                    }
                }
            }
        }
        let mut suffixes: Vec<Arc<DomainPinConfiguration>> = suffixes.into_values().collect();
        suffixes.sort_by_key(|domain| Reverse(domain.pattern.anchor().label_count()));
        Ok(Self {
            exact,
            suffixes,
        })
    }

    /// Returns the number of configurations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len() + self.suffixes.len()
    }

    /// Returns true when no host is pinned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.suffixes.is_empty()
    }
}

impl PinConfigSource for PinSnapshot {
    fn lookup(&self, host: &HostName) -> Option<Arc<DomainPinConfiguration>> {
        if let Some(domain) = self.exact.get(host) {
            return Some(Arc::clone(domain));
        }
        self.suffixes.iter().find(|domain| domain.pattern.matches(host)).cloned()
    }
}

// ============================================================================
// SECTION: Shared Snapshot
// ============================================================================

/// Atomically swappable snapshot holder.
#[derive(Debug, Default)]
pub struct SharedPinConfig {
    /// Current snapshot; replaced as a whole.
    current: RwLock<Arc<PinSnapshot>>,
}

impl SharedPinConfig {
    /// Creates a holder publishing `snapshot`.
    #[must_use]
    pub fn new(snapshot: PinSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Returns the currently published snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<PinSnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Publishes `snapshot` and returns the one it replaced.
    pub fn replace(&self, snapshot: PinSnapshot) -> Arc<PinSnapshot> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(snapshot))
    }
}

impl PinConfigSource for SharedPinConfig {
    fn lookup(&self, host: &HostName) -> Option<Arc<DomainPinConfiguration>> {
        self.current().lookup(host)
    }
}
