// crates/pin-gate-core/tests/common/mod.rs
// ============================================================================
// Module: Pin Gate Test Fixtures
// Description: Fake trust engine, chains, and configuration builders.
// Purpose: Drive the decision core without a real TLS stack.
// ============================================================================

//! Shared fixtures for pin-gate-core integration tests.

#![allow(dead_code, reason = "Not every test binary uses every fixture.")]
#![allow(
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items,
    reason = "Fixtures unwrap on literal inputs."
)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use pin_gate_core::CertificateRef;
use pin_gate_core::DomainPinConfiguration;
use pin_gate_core::HostName;
use pin_gate_core::HostPattern;
use pin_gate_core::PinAuditEvent;
use pin_gate_core::PinAuditSink;
use pin_gate_core::PinBasis;
use pin_gate_core::PinDigest;
use pin_gate_core::PinSet;
use pin_gate_core::Timestamp;
use pin_gate_core::TrustEvaluator;

// ============================================================================
// SECTION: Fake Chains
// ============================================================================

/// Certificate stand-in with distinct DER and SPKI bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeCert {
    pub der: Vec<u8>,
    pub spki: Vec<u8>,
}

/// Builds a certificate whose bytes derive from `name`.
pub fn cert(name: &str) -> FakeCert {
    FakeCert {
        der: format!("{name}-der").into_bytes(),
        spki: format!("{name}-spki").into_bytes(),
    }
}

/// Chain stand-in with a scripted baseline validation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeChain {
    pub certificates: Vec<FakeCert>,
    pub baseline_valid: bool,
}

/// Chain that passes baseline validation.
pub fn valid_chain(names: &[&str]) -> FakeChain {
    FakeChain {
        certificates: names.iter().map(|name| cert(name)).collect(),
        baseline_valid: true,
    }
}

/// Chain that fails baseline validation.
pub fn invalid_chain(names: &[&str]) -> FakeChain {
    FakeChain {
        certificates: names.iter().map(|name| cert(name)).collect(),
        baseline_valid: false,
    }
}

/// Credential produced by the fake trust engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeCredential {
    pub leaf_der: Vec<u8>,
}

// ============================================================================
// SECTION: Fake Trust Engine
// ============================================================================

/// Trust engine that obeys the chain's scripted validation result.
#[derive(Debug, Default)]
pub struct FakeTrust {
    validations: AtomicUsize,
    certificate_reads: AtomicUsize,
}

impl FakeTrust {
    pub fn validations(&self) -> usize {
        self.validations.load(Ordering::SeqCst)
    }

    pub fn certificate_reads(&self) -> usize {
        self.certificate_reads.load(Ordering::SeqCst)
    }
}

impl TrustEvaluator for FakeTrust {
    type Chain = FakeChain;
    type Credential = FakeCredential;

    fn validate_chain(&self, chain: &FakeChain, _host: &HostName, _now: Timestamp) -> bool {
        self.validations.fetch_add(1, Ordering::SeqCst);
        chain.baseline_valid && !chain.certificates.is_empty()
    }

    fn chain_length(&self, chain: &FakeChain) -> usize {
        chain.certificates.len()
    }

    fn certificate_at<'c>(&self, chain: &'c FakeChain, index: usize) -> Option<CertificateRef<'c>> {
        self.certificate_reads.fetch_add(1, Ordering::SeqCst);
        chain.certificates.get(index).map(|cert| CertificateRef::new(&cert.der).with_spki(&cert.spki))
    }

    fn credential(&self, chain: &FakeChain) -> FakeCredential {
        FakeCredential {
            leaf_der: chain.certificates.first().map(|cert| cert.der.clone()).unwrap_or_default(),
        }
    }
}

// ============================================================================
// SECTION: Configuration Builders
// ============================================================================

pub fn host(value: &str) -> HostName {
    HostName::parse(value).unwrap()
}

/// Certificate-basis pin for a named certificate.
pub fn cert_pin(name: &str) -> PinDigest {
    PinDigest::of(&cert(name).der)
}

/// Public-key-basis pin for a named certificate.
pub fn spki_pin(name: &str) -> PinDigest {
    PinDigest::of(&cert(name).spki)
}

/// Exact-host configuration pinning the named certificates.
pub fn pinned(pattern: &str, names: &[&str]) -> DomainPinConfiguration {
    let pins = PinSet::new(PinBasis::Certificate, names.iter().map(|name| cert_pin(name))).unwrap();
    DomainPinConfiguration::new(HostPattern::parse(pattern, false).unwrap(), pins)
}

/// Subdomain configuration pinning the named certificates.
pub fn pinned_with_subdomains(pattern: &str, names: &[&str]) -> DomainPinConfiguration {
    let pins = PinSet::new(PinBasis::Certificate, names.iter().map(|name| cert_pin(name))).unwrap();
    DomainPinConfiguration::new(HostPattern::parse(pattern, true).unwrap(), pins)
}

/// Fixed "today" used across scenarios: 2026-10-19T00:00:00Z.
pub const TODAY: Timestamp = Timestamp::from_unix_millis(1_792_368_000_000);
/// One day in milliseconds.
pub const DAY_MS: i64 = 86_400_000;

// ============================================================================
// SECTION: Recording Audit Sink
// ============================================================================

/// Audit sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PinAuditEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<PinAuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl PinAuditSink for RecordingSink {
    fn record(&self, event: &PinAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
