// crates/pin-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Pin Gate Runtime
// Description: Pin matching, trust decisions, challenge handling, and snapshots.
// Purpose: Evaluate presented chains against pin configuration deterministically.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the decision pipeline. The engine is the single
//! place where ordering is decided; the challenge adapter and every transport
//! integration call into it rather than re-implementing the steps.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod adapter;
pub mod audit;
pub mod engine;
pub mod matcher;
pub mod snapshot;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use adapter::AuthenticationChallenge;
pub use adapter::ChallengeAdapter;
pub use adapter::ChallengeKind;
pub use adapter::Disposition;
pub use adapter::translate;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::PinAuditEvent;
pub use audit::StderrAuditSink;
pub use engine::Assessment;
pub use engine::TrustDecisionEngine;
pub use matcher::PinMatcher;
pub use snapshot::PinSnapshot;
pub use snapshot::SharedPinConfig;
pub use snapshot::SnapshotError;
