// crates/pin-gate-core/src/runtime/engine.rs
// ============================================================================
// Module: Pin Gate Trust Decision Engine
// Description: Ordered evaluation of configuration, baseline trust, and pins.
// Purpose: Produce exactly one decision per (chain, host, now) evaluation.
// Dependencies: crate::{core, interfaces, runtime::matcher}
// ============================================================================

//! ## Overview
//! Evaluation runs three steps in a fixed order:
//! 1. Configuration lookup. No configuration, or one outside its enforcement
//!    window, yields `NotPinned` before any validation is attempted.
//! 2. Baseline validation. An empty or invalid chain yields `Block`; pin
//!    matching never runs for such a chain.
//! 3. Pin matching from index 0 upward. The first match yields `Allow`;
//!    exhausting the chain yields `Block`.
//!
//! The engine holds no per-evaluation state and takes no locks of its own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Decision;
use crate::core::DomainPinConfiguration;
use crate::core::FailureDisposition;
use crate::core::HostName;
use crate::core::Timestamp;
use crate::interfaces::PinConfigSource;
use crate::interfaces::TrustEvaluator;
use crate::runtime::matcher::PinMatcher;

// ============================================================================
// SECTION: Assessment
// ============================================================================

/// Decision plus the failure disposition from the same configuration lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment<C> {
    /// Trust decision.
    pub decision: Decision<C>,
    /// Configured failure disposition; `None` when no configuration applied.
    pub on_failure: Option<FailureDisposition>,
}

impl<C> Assessment<C> {
    /// Assessment for a host without active pinning.
    const fn not_pinned() -> Self {
        Self {
            decision: Decision::NotPinned,
            on_failure: None,
        }
    }

    /// Assessment for a pinned host with a concrete decision.
    const fn pinned(decision: Decision<C>, domain: &DomainPinConfiguration) -> Self {
        Self {
            decision,
            on_failure: Some(domain.on_failure),
        }
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Trust decision engine over a configuration source and a trust evaluator.
#[derive(Debug, Clone)]
pub struct TrustDecisionEngine<S, T> {
    /// Read-only configuration source.
    config: S,
    /// Baseline validation and chain access.
    trust: T,
    /// Pin comparison.
    matcher: PinMatcher,
}

impl<S, T> TrustDecisionEngine<S, T>
where
    S: PinConfigSource,
    T: TrustEvaluator,
{
    /// Creates an engine from its collaborators.
    #[must_use]
    pub const fn new(config: S, trust: T) -> Self {
        Self {
            config,
            trust,
            matcher: PinMatcher::new(),
        }
    }

    /// Returns the configuration source.
    #[must_use]
    pub const fn config(&self) -> &S {
        &self.config
    }

    /// Returns the trust evaluator.
    #[must_use]
    pub const fn trust(&self) -> &T {
        &self.trust
    }

    /// Evaluates `chain` for `host` at `now`.
    pub fn evaluate(
        &self,
        chain: &T::Chain,
        host: &HostName,
        now: Timestamp,
    ) -> Decision<T::Credential> {
        self.assess(chain, host, now).decision
    }

    /// Evaluates `chain` and also reports the configured failure disposition.
    #[must_use]
    pub fn assess(
        &self,
        chain: &T::Chain,
        host: &HostName,
        now: Timestamp,
    ) -> Assessment<T::Credential> {
        let Some(domain) = self.config.lookup(host) else {
            return Assessment::not_pinned();
        };
        if !domain.is_active(now) {
            return Assessment::not_pinned();
        }

        let length = self.trust.chain_length(chain);
        if length == 0 || !self.trust.validate_chain(chain, host, now) {
            return Assessment::pinned(Decision::Block, &domain);
        }

        let pinned = (0 .. length)
            .filter_map(|index| self.trust.certificate_at(chain, index))
            .any(|certificate| self.matcher.matches(&certificate, &domain.pins));
        if pinned {
            Assessment::pinned(Decision::Allow(self.trust.credential(chain)), &domain)
        } else {
            Assessment::pinned(Decision::Block, &domain)
        }
    }
}
