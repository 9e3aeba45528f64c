// crates/pin-gate-core/tests/snapshot.rs
// ============================================================================
// Module: Configuration Snapshot Tests
// Description: Tests for host precedence and snapshot replacement.
// ============================================================================
//! ## Overview
//! Validates that exactly one configuration governs each host and that
//! reloads swap whole snapshots.

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

use std::sync::Arc;

use pin_gate_core::Decision;
use pin_gate_core::DomainPinConfiguration;
use pin_gate_core::HostPattern;
use pin_gate_core::PinBasis;
use pin_gate_core::PinConfigSource;
use pin_gate_core::PinSet;
use pin_gate_core::PinSnapshot;
use pin_gate_core::SharedPinConfig;
use pin_gate_core::SnapshotError;
use pin_gate_core::TrustDecisionEngine;

use crate::common::FakeTrust;
use crate::common::TODAY;
use crate::common::cert_pin;
use crate::common::host;
use crate::common::pinned;
use crate::common::pinned_with_subdomains;
use crate::common::valid_chain;

fn wildcard(anchor: &str, names: &[&str]) -> DomainPinConfiguration {
    let pins = PinSet::new(PinBasis::Certificate, names.iter().map(|name| cert_pin(name))).unwrap();
    DomainPinConfiguration::new(HostPattern::parse(&format!("*.{anchor}"), false).unwrap(), pins)
}

fn governing_pattern(snapshot: &PinSnapshot, value: &str) -> Option<String> {
    snapshot.lookup(&host(value)).map(|domain| domain.pattern.to_string())
}

// ============================================================================
// SECTION: Precedence
// ============================================================================

#[test]
fn exact_host_beats_subdomain_pattern() {
    let snapshot = PinSnapshot::new(vec![
        pinned_with_subdomains("example.com", &["parent"]),
        pinned("api.example.com", &["api"]),
    ])
    .unwrap();

    assert_eq!(governing_pattern(&snapshot, "api.example.com").as_deref(), Some("api.example.com"));
    assert_eq!(
        governing_pattern(&snapshot, "www.example.com").as_deref(),
        Some("example.com (including subdomains)")
    );
    assert_eq!(
        governing_pattern(&snapshot, "example.com").as_deref(),
        Some("example.com (including subdomains)")
    );
}

#[test]
fn longest_anchor_wins_among_suffix_patterns() {
    let snapshot = PinSnapshot::new(vec![
        pinned_with_subdomains("example.com", &["parent"]),
        pinned_with_subdomains("eu.example.com", &["eu"]),
    ])
    .unwrap();

    assert_eq!(
        governing_pattern(&snapshot, "api.eu.example.com").as_deref(),
        Some("eu.example.com (including subdomains)")
    );
    assert_eq!(
        governing_pattern(&snapshot, "api.us.example.com").as_deref(),
        Some("example.com (including subdomains)")
    );
}

#[test]
fn wildcard_matches_one_label_only() {
    let snapshot = PinSnapshot::new(vec![wildcard("example.com", &["w"])]).unwrap();

    assert_eq!(governing_pattern(&snapshot, "api.example.com").as_deref(), Some("*.example.com"));
    assert_eq!(governing_pattern(&snapshot, "a.b.example.com"), None);
    assert_eq!(governing_pattern(&snapshot, "example.com"), None);
    assert_eq!(governing_pattern(&snapshot, "badexample.com"), None);
}

#[test]
fn exact_pattern_does_not_cover_subdomains() {
    let snapshot = PinSnapshot::new(vec![pinned("example.com", &["h1"])]).unwrap();

    assert_eq!(governing_pattern(&snapshot, "www.example.com"), None);
}

// ============================================================================
// SECTION: Construction Errors
// ============================================================================

#[test]
fn duplicate_exact_hosts_are_rejected() {
    let result =
        PinSnapshot::new(vec![pinned("example.com", &["h1"]), pinned("EXAMPLE.com", &["h2"])]);

    assert_eq!(result.unwrap_err(), SnapshotError::Duplicate("example.com".to_string()));
}

#[test]
fn suffix_patterns_sharing_an_anchor_are_ambiguous() {
    let result = PinSnapshot::new(vec![
        pinned_with_subdomains("example.com", &["h1"]),
        wildcard("example.com", &["h2"]),
    ]);

    assert!(matches!(result, Err(SnapshotError::Ambiguous { .. })));
}

#[test]
fn empty_snapshot_pins_nothing() {
    let snapshot = PinSnapshot::empty();

    assert!(snapshot.is_empty());
    assert_eq!(snapshot.len(), 0);
    assert_eq!(governing_pattern(&snapshot, "example.com"), None);
}

// ============================================================================
// SECTION: Shared Snapshot
// ============================================================================

#[test]
fn replaced_snapshot_governs_later_evaluations() {
    let shared = Arc::new(SharedPinConfig::new(PinSnapshot::empty()));
    let engine = TrustDecisionEngine::new(Arc::clone(&shared), FakeTrust::default());
    let chain = valid_chain(&["h4"]);

    assert_eq!(engine.evaluate(&chain, &host("example.com"), TODAY), Decision::NotPinned);

    let previous = shared.replace(PinSnapshot::new(vec![pinned("example.com", &["h1"])]).unwrap());

    assert!(previous.is_empty());
    assert_eq!(shared.current().len(), 1);
    assert_eq!(engine.evaluate(&chain, &host("example.com"), TODAY), Decision::Block);
}
