// crates/pin-gate-core/src/runtime/adapter.rs
// ============================================================================
// Module: Pin Gate Challenge Adapter
// Description: Bridges transport authentication challenges and engine decisions.
// Purpose: Translate challenges into evaluations and decisions into dispositions.
// Dependencies: crate::{core, interfaces, runtime::engine, runtime::audit}
// ============================================================================

//! ## Overview
//! The adapter handles server-trust challenges only. Every other challenge
//! kind, and a server-trust challenge without a chain, is left to the
//! transport's default handling: `handle` returns `false` and never calls
//! the responder. A handled challenge resolves the responder exactly once;
//! the responder is `FnOnce`, so a second resolution cannot compile.
//!
//! | Decision    | Disposition                             | Credential |
//! |-------------|-----------------------------------------|------------|
//! | `Allow(c)`  | [`Disposition::UseCredential`]          | `c`        |
//! | `Block`     | configured [`FailureDisposition`]       | none       |
//! | `NotPinned` | [`Disposition::PerformDefaultHandling`] | none       |

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::core::Decision;
use crate::core::DecisionOutcome;
use crate::core::FailureDisposition;
use crate::core::HostName;
use crate::core::Timestamp;
use crate::interfaces::Clock;
use crate::interfaces::PinAuditSink;
use crate::interfaces::PinConfigSource;
use crate::interfaces::SystemClock;
use crate::interfaces::TrustEvaluator;
use crate::runtime::audit::NoopAuditSink;
use crate::runtime::audit::PinAuditEvent;
use crate::runtime::engine::Assessment;
use crate::runtime::engine::TrustDecisionEngine;

// ============================================================================
// SECTION: Challenge Types
// ============================================================================

/// Classification of an authentication challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    /// Server trust evaluation for a TLS handshake.
    ServerTrust,
    /// Request for a client certificate.
    ClientCertificate,
    /// HTTP basic credentials.
    HttpBasic,
    /// HTTP digest credentials.
    HttpDigest,
    /// Any other challenge kind.
    Other,
}

/// Authentication challenge raised by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationChallenge<Ch> {
    /// Host being contacted.
    pub host: String,
    /// Challenge classification.
    pub kind: ChallengeKind,
    /// Presented chain, for server-trust challenges.
    pub chain: Option<Ch>,
}

impl<Ch> AuthenticationChallenge<Ch> {
    /// Creates a server-trust challenge carrying a chain.
    #[must_use]
    pub fn server_trust(host: impl Into<String>, chain: Ch) -> Self {
        Self {
            host: host.into(),
            kind: ChallengeKind::ServerTrust,
            chain: Some(chain),
        }
    }

    /// Creates a challenge of `kind` without a chain.
    #[must_use]
    pub fn new(host: impl Into<String>, kind: ChallengeKind) -> Self {
        Self {
            host: host.into(),
            kind,
            chain: None,
        }
    }
}

// ============================================================================
// SECTION: Disposition
// ============================================================================

/// Instruction returned to the transport for a handled challenge.
///
/// # Invariants
/// - Variants are stable for audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Continue the handshake with the supplied credential.
    UseCredential,
    /// Reject the protection space; the connection fails.
    RejectProtectionSpace,
    /// Cancel the challenge; the connection fails.
    CancelChallenge,
    /// Apply the platform's default handling.
    PerformDefaultHandling,
}

impl Disposition {
    /// Returns the disposition for a blocked chain.
    #[must_use]
    pub const fn for_block(on_failure: FailureDisposition) -> Self {
        match on_failure {
            FailureDisposition::RejectProtectionSpace => Self::RejectProtectionSpace,
            FailureDisposition::CancelChallenge => Self::CancelChallenge,
        }
    }
}

/// Translates an assessment into a disposition and optional credential.
pub fn translate<C>(assessment: Assessment<C>) -> (Disposition, Option<C>) {
    match assessment.decision {
        Decision::Allow(credential) => (Disposition::UseCredential, Some(credential)),
        Decision::Block => {
            (Disposition::for_block(assessment.on_failure.unwrap_or_default()), None)
        }
        Decision::NotPinned => (Disposition::PerformDefaultHandling, None),
    }
}

// ============================================================================
// SECTION: Challenge Adapter
// ============================================================================

/// Challenge adapter over a trust decision engine.
pub struct ChallengeAdapter<S, T> {
    /// Decision engine.
    engine: TrustDecisionEngine<S, T>,
    /// Time source for `handle`.
    clock: Arc<dyn Clock>,
    /// Audit sink for handled challenges.
    audit: Arc<dyn PinAuditSink>,
}

impl<S, T> fmt::Debug for ChallengeAdapter<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChallengeAdapter").finish_non_exhaustive()
    }
}

impl<S, T> ChallengeAdapter<S, T>
where
    S: PinConfigSource,
    T: TrustEvaluator,
{
    /// Creates an adapter using the system clock and no audit sink.
    #[must_use]
    pub fn new(engine: TrustDecisionEngine<S, T>) -> Self {
        Self {
            engine,
            clock: Arc::new(SystemClock),
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn PinAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the underlying engine.
    #[must_use]
    pub const fn engine(&self) -> &TrustDecisionEngine<S, T> {
        &self.engine
    }

    /// Handles a challenge at the clock's current time.
    ///
    /// Returns `false` without calling `respond` when the challenge is not a
    /// server-trust challenge with a chain. Otherwise calls `respond` exactly
    /// once and returns `true`.
    pub fn handle<F>(&self, challenge: &AuthenticationChallenge<T::Chain>, respond: F) -> bool
    where
        F: FnOnce(Disposition, Option<T::Credential>),
    {
        self.handle_at(challenge, self.clock.now(), respond)
    }

    /// Handles a challenge at an explicit time.
    ///
    /// A server-trust challenge whose host cannot be parsed is blocked with
    /// the default failure disposition.
    pub fn handle_at<F>(
        &self,
        challenge: &AuthenticationChallenge<T::Chain>,
        now: Timestamp,
        respond: F,
    ) -> bool
    where
        F: FnOnce(Disposition, Option<T::Credential>),
    {
        if challenge.kind != ChallengeKind::ServerTrust {
            return false;
        }
        let Some(chain) = challenge.chain.as_ref() else {
            return false;
        };

        let (outcome, disposition, credential) = match HostName::parse(&challenge.host) {
            Ok(host) => {
                let assessment = self.engine.assess(chain, &host, now);
                let outcome = assessment.decision.outcome();
                let (disposition, credential) = translate(assessment);
                (outcome, disposition, credential)
            }
            Err(_) => (
                DecisionOutcome::Block,
                Disposition::for_block(FailureDisposition::default()),
                None,
            ),
        };

        self.audit.record(&PinAuditEvent::new(&challenge.host, now, outcome, disposition));
        respond(disposition, credential);
        true
    }
}
