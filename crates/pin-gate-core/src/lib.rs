// crates/pin-gate-core/src/lib.rs
// ============================================================================
// Module: Pin Gate Core Library
// Description: Public API surface for the Pin Gate trust decision core.
// Purpose: Expose pinning types, collaborator interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Pin Gate core decides whether a TLS handshake may proceed for a host by
//! combining baseline chain validation, per-domain pin configuration, and pin
//! matching across the presented chain. Certificate parsing and chain
//! validation are delegated to a [`TrustEvaluator`]; configuration is read
//! through a [`PinConfigSource`]. Evaluation is a pure function of
//! `(chain, host, now)` for a fixed configuration snapshot.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use interfaces::CertificateRef;
pub use interfaces::Clock;
pub use interfaces::FixedClock;
pub use interfaces::PinAuditSink;
pub use interfaces::PinConfigSource;
pub use interfaces::SystemClock;
pub use interfaces::TrustEvaluator;
pub use runtime::Assessment;
pub use runtime::AuthenticationChallenge;
pub use runtime::ChallengeAdapter;
pub use runtime::ChallengeKind;
pub use runtime::Disposition;
pub use runtime::FileAuditSink;
pub use runtime::NoopAuditSink;
pub use runtime::PinAuditEvent;
pub use runtime::PinMatcher;
pub use runtime::PinSnapshot;
pub use runtime::SharedPinConfig;
pub use runtime::SnapshotError;
pub use runtime::StderrAuditSink;
pub use runtime::TrustDecisionEngine;
