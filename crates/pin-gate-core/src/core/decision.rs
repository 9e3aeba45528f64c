// crates/pin-gate-core/src/core/decision.rs
// ============================================================================
// Module: Pin Gate Decisions
// Description: Three-way trust decision produced per handshake evaluation.
// Purpose: Make exhaustive handling of pinning outcomes a compile-time check.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`Decision`] is the single result of an evaluation. `Block` is a normal
//! outcome, not an error, and deliberately carries no reason so callers
//! cannot branch on validation internals.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Trust decision for one certificate chain and host.
///
/// # Invariants
/// - `Allow` only follows successful baseline validation and a pin match.
/// - `NotPinned` only follows a missing or inactive configuration.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision<C> {
    /// Chain is trusted and pinned; carries the session credential.
    Allow(C),
    /// Chain failed baseline validation or matched no pin.
    Block,
    /// No active pin configuration applies to the host.
    NotPinned,
}

impl<C> Decision<C> {
    /// Returns the payload-free outcome label.
    #[must_use]
    pub const fn outcome(&self) -> DecisionOutcome {
        match self {
            Self::Allow(_) => DecisionOutcome::Allow,
            Self::Block => DecisionOutcome::Block,
            Self::NotPinned => DecisionOutcome::NotPinned,
        }
    }

    /// Returns the credential when the decision is `Allow`.
    #[must_use]
    pub const fn credential(&self) -> Option<&C> {
        match self {
            Self::Allow(credential) => Some(credential),
            Self::Block | Self::NotPinned => None,
        }
    }

    /// Consumes the decision and returns the credential when `Allow`.
    #[must_use]
    pub fn into_credential(self) -> Option<C> {
        match self {
            Self::Allow(credential) => Some(credential),
            Self::Block | Self::NotPinned => None,
        }
    }
}

// ============================================================================
// SECTION: Outcome Labels
// ============================================================================

/// Decision outcome without its credential payload.
///
/// # Invariants
/// - Variants are stable for audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    /// Chain allowed.
    Allow,
    /// Chain blocked.
    Block,
    /// Host not pinned.
    NotPinned,
}
