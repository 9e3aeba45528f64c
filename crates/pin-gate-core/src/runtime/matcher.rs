// crates/pin-gate-core/src/runtime/matcher.rs
// ============================================================================
// Module: Pin Gate Pin Matcher
// Description: Compares one certificate against a domain's pin set.
// Purpose: Provide the pure comparison used at every chain position.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The matcher hashes the bytes selected by the pin set's basis and checks
//! membership in constant time. It never mutates its inputs, and identical
//! inputs always produce identical results.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::PinDigest;
use crate::core::PinSet;
use crate::interfaces::CertificateRef;

// ============================================================================
// SECTION: Pin Matcher
// ============================================================================

/// Pure certificate-to-pin-set comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct PinMatcher;

impl PinMatcher {
    /// Creates a pin matcher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns true when `certificate` matches any pin in `pins`.
    ///
    /// A public-key pin set never matches a certificate for which the trust
    /// engine supplied no subject public key info.
    #[must_use]
    pub fn matches(&self, certificate: &CertificateRef<'_>, pins: &PinSet) -> bool {
        certificate
            .basis_bytes(pins.basis())
            .is_some_and(|bytes| pins.contains(&PinDigest::of(bytes)))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
