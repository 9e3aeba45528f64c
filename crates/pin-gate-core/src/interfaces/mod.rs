// crates/pin-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Pin Gate Interfaces
// Description: Collaborator contracts for configuration, trust, time, and audit.
// Purpose: Define the seams between the decision core and external systems.
// Dependencies: crate::core, time
// ============================================================================

//! ## Overview
//! The core never parses certificates, validates chains, loads files, or
//! reads the clock on its own. Each of those concerns sits behind a trait so
//! the engine can be driven by fakes in tests and by platform backends in
//! production. Implementations must be safe for concurrent, reentrant use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use time::OffsetDateTime;

use crate::core::DomainPinConfiguration;
use crate::core::HostName;
use crate::core::PinBasis;
use crate::core::Timestamp;
use crate::runtime::PinAuditEvent;

// ============================================================================
// SECTION: Configuration Source
// ============================================================================

/// Source of per-host pin configuration.
///
/// Implementations own host-pattern precedence and must return at most one
/// authoritative configuration per host. Any reload must be published as a
/// whole snapshot so a lookup never observes a partial update.
pub trait PinConfigSource: Send + Sync {
    /// Returns the configuration governing `host`, if any.
    fn lookup(&self, host: &HostName) -> Option<Arc<DomainPinConfiguration>>;
}

impl<T: PinConfigSource + ?Sized> PinConfigSource for Arc<T> {
    fn lookup(&self, host: &HostName) -> Option<Arc<DomainPinConfiguration>> {
        (**self).lookup(host)
    }
}

// ============================================================================
// SECTION: Trust Evaluator
// ============================================================================

/// Opaque certificate view supplied by a [`TrustEvaluator`].
///
/// The core hashes these bytes but never interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertificateRef<'a> {
    /// DER-encoded certificate.
    pub der: &'a [u8],
    /// DER-encoded subject public key info, when the engine can supply it.
    pub spki: Option<&'a [u8]>,
}

impl<'a> CertificateRef<'a> {
    /// Creates a view over certificate DER without an SPKI view.
    #[must_use]
    pub const fn new(der: &'a [u8]) -> Self {
        Self {
            der,
            spki: None,
        }
    }

    /// Attaches the subject public key info view.
    #[must_use]
    pub const fn with_spki(mut self, spki: &'a [u8]) -> Self {
        self.spki = Some(spki);
        self
    }

    /// Returns the bytes a pin of `basis` is computed over.
    #[must_use]
    pub const fn basis_bytes(&self, basis: PinBasis) -> Option<&'a [u8]> {
        match basis {
            PinBasis::Certificate => Some(self.der),
            PinBasis::SubjectPublicKeyInfo => self.spki,
        }
    }
}

/// External TLS trust engine.
///
/// Performs standard chain and hostname validation and exposes the presented
/// chain as an indexable, leaf-first sequence.
pub trait TrustEvaluator: Send + Sync {
    /// Chain handle presented by the transport.
    type Chain;
    /// Session credential derived from a validated chain.
    type Credential;

    /// Validates `chain` for `host` under the standard certificate policy at `now`.
    fn validate_chain(&self, chain: &Self::Chain, host: &HostName, now: Timestamp) -> bool;

    /// Returns the number of certificates in `chain`.
    fn chain_length(&self, chain: &Self::Chain) -> usize;

    /// Returns the certificate at `index`, leaf first.
    fn certificate_at<'c>(&self, chain: &'c Self::Chain, index: usize)
    -> Option<CertificateRef<'c>>;

    /// Derives the session credential for a validated chain.
    fn credential(&self, chain: &Self::Chain) -> Self::Credential;
}

impl<T: TrustEvaluator + ?Sized> TrustEvaluator for Arc<T> {
    type Chain = T::Chain;
    type Credential = T::Credential;

    fn validate_chain(&self, chain: &Self::Chain, host: &HostName, now: Timestamp) -> bool {
        (**self).validate_chain(chain, host, now)
    }

    fn chain_length(&self, chain: &Self::Chain) -> usize {
        (**self).chain_length(chain)
    }

    fn certificate_at<'c>(
        &self,
        chain: &'c Self::Chain,
        index: usize,
    ) -> Option<CertificateRef<'c>> {
        (**self).certificate_at(chain, index)
    }

    fn credential(&self, chain: &Self::Chain) -> Self::Credential {
        (**self).credential(chain)
    }
}

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Time source used at the adapter edge.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_offset_datetime(OffsetDateTime::now_utc())
    }
}

/// Clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

// ============================================================================
// SECTION: Audit Sink
// ============================================================================

/// Audit sink for handled challenges.
pub trait PinAuditSink: Send + Sync {
    /// Record a pin decision event.
    fn record(&self, event: &PinAuditEvent);
}
