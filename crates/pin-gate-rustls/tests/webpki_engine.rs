// crates/pin-gate-rustls/tests/webpki_engine.rs
// ============================================================================
// Module: WebPKI Engine Tests
// Description: Decision engine tests over real certificate chains.
// Purpose: Ensure baseline validation and pin matching compose correctly.
// ============================================================================

//! ## Overview
//! Runs [`TrustDecisionEngine`] with [`pin_gate_rustls::WebPkiTrustEvaluator`]
//! against freshly generated CAs and leaves.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::missing_docs_in_private_items,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use pin_gate_core::Clock;
use pin_gate_core::Decision;
use pin_gate_core::HostName;
use pin_gate_core::PinBasis;
use pin_gate_core::SystemClock;
use pin_gate_core::Timestamp;
use pin_gate_core::TrustDecisionEngine;
use pin_gate_core::TrustEvaluator;
use pin_gate_rustls::PresentedChain;
use pin_gate_rustls::TrustSetupError;
use pin_gate_rustls::subject_public_key_info;
use rcgen::PublicKeyData;

use crate::common::evaluator;
use crate::common::generate_ca;
use crate::common::generate_leaf;
use crate::common::pinned;
use crate::common::presented;

fn host(value: &str) -> HostName {
    HostName::parse(value).unwrap()
}

// ============================================================================
// SECTION: Chain Views
// ============================================================================

#[test]
fn spki_extraction_matches_leaf_public_key() {
    let ca = generate_ca("Pin Gate Test CA");
    let leaf = generate_leaf(&ca, &["example.com"]);

    let spki = subject_public_key_info(leaf.cert.der()).unwrap();

    assert_eq!(spki, leaf.key.subject_public_key_info());
}

#[test]
fn spki_extraction_rejects_garbage() {
    assert!(matches!(subject_public_key_info(b"not a certificate"), Err(TrustSetupError::Certificate(_))));
}

#[test]
fn presented_chain_parses_pem_in_order() {
    let ca = generate_ca("Pin Gate Test CA");
    let leaf = generate_leaf(&ca, &["example.com"]);
    let pem = format!("{}{}", leaf.cert.pem(), ca.cert.pem());

    let chain = PresentedChain::from_pem(pem.as_bytes()).unwrap();

    assert_eq!(chain.len(), 2);
    assert_eq!(&chain.certificates()[0], leaf.cert.der());
    let view = chain.certificate_ref(0).unwrap();
    assert_eq!(view.spki, Some(leaf.key.subject_public_key_info().as_slice()));
}

#[test]
fn presented_chain_rejects_pem_without_certificates() {
    assert_eq!(PresentedChain::from_pem(b"").unwrap_err(), TrustSetupError::NoCertificates);
}

// ============================================================================
// SECTION: Baseline Validation
// ============================================================================

#[test]
fn baseline_accepts_chain_to_configured_root() {
    let ca = generate_ca("Pin Gate Test CA");
    let leaf = generate_leaf(&ca, &["example.com"]);

    let valid = evaluator(&ca).validate_chain(
        &presented(&leaf, &ca),
        &host("example.com"),
        SystemClock.now(),
    );

    assert!(valid);
}

#[test]
fn baseline_rejects_hostname_mismatch() {
    let ca = generate_ca("Pin Gate Test CA");
    let leaf = generate_leaf(&ca, &["example.com"]);

    let valid =
        evaluator(&ca).validate_chain(&presented(&leaf, &ca), &host("other.org"), SystemClock.now());

    assert!(!valid);
}

#[test]
fn baseline_rejects_pre_epoch_evaluation_time() {
    let ca = generate_ca("Pin Gate Test CA");
    let leaf = generate_leaf(&ca, &["example.com"]);

    let valid = evaluator(&ca).validate_chain(
        &presented(&leaf, &ca),
        &host("example.com"),
        Timestamp::from_unix_millis(-1_000),
    );

    assert!(!valid);
}

#[test]
fn baseline_rejects_empty_chain() {
    let ca = generate_ca("Pin Gate Test CA");

    let valid =
        evaluator(&ca).validate_chain(&PresentedChain::new(Vec::new()), &host("example.com"), SystemClock.now());

    assert!(!valid);
}

// ============================================================================
// SECTION: Decisions
// ============================================================================

#[test]
fn leaf_public_key_pin_allows_and_returns_chain() {
    let ca = generate_ca("Pin Gate Test CA");
    let leaf = generate_leaf(&ca, &["example.com"]);
    let spki = leaf.key.subject_public_key_info();
    let config = pinned("example.com", PinBasis::SubjectPublicKeyInfo, &spki);
    let engine = TrustDecisionEngine::new(config, evaluator(&ca));

    let decision = engine.evaluate(&presented(&leaf, &ca), &host("example.com"), SystemClock.now());

    let credential = decision.into_credential().unwrap();
    assert_eq!(credential.leaf(), Some(leaf.cert.der()));
    assert_eq!(credential.certificates.len(), 2);
}

#[test]
fn issuer_certificate_pin_allows_any_leaf_it_signed() {
    let ca = generate_ca("Pin Gate Test CA");
    let leaf = generate_leaf(&ca, &["example.com"]);
    let config = pinned("example.com", PinBasis::Certificate, ca.cert.der());
    let engine = TrustDecisionEngine::new(config, evaluator(&ca));

    let decision = engine.evaluate(&presented(&leaf, &ca), &host("example.com"), SystemClock.now());

    assert!(matches!(decision, Decision::Allow(_)));
}

#[test]
fn valid_chain_with_foreign_key_is_blocked() {
    let ca = generate_ca("Pin Gate Test CA");
    let leaf = generate_leaf(&ca, &["example.com"]);
    let other = generate_leaf(&ca, &["example.com"]);
    let spki = other.key.subject_public_key_info();
    let config = pinned("example.com", PinBasis::SubjectPublicKeyInfo, &spki);
    let engine = TrustDecisionEngine::new(config, evaluator(&ca));

    let decision = engine.evaluate(&presented(&leaf, &ca), &host("example.com"), SystemClock.now());

    assert_eq!(decision, Decision::Block);
}

#[test]
fn pinned_key_under_untrusted_root_is_blocked() {
    let trusted = generate_ca("Pin Gate Trusted CA");
    let rogue = generate_ca("Pin Gate Rogue CA");
    let leaf = generate_leaf(&rogue, &["example.com"]);
    let spki = leaf.key.subject_public_key_info();
    let config = pinned("example.com", PinBasis::SubjectPublicKeyInfo, &spki);
    let engine = TrustDecisionEngine::new(config, evaluator(&trusted));

    let decision = engine.evaluate(&presented(&leaf, &rogue), &host("example.com"), SystemClock.now());

    assert_eq!(decision, Decision::Block);
}

#[test]
fn unpinned_host_is_left_to_default_handling() {
    let ca = generate_ca("Pin Gate Test CA");
    let leaf = generate_leaf(&ca, &["example.com"]);
    let config = pinned("pinned.example", PinBasis::Certificate, leaf.cert.der());
    let engine = TrustDecisionEngine::new(config, evaluator(&ca));

    let decision = engine.evaluate(&presented(&leaf, &ca), &host("example.com"), SystemClock.now());

    assert_eq!(decision, Decision::NotPinned);
}
