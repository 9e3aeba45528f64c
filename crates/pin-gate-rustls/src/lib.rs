// crates/pin-gate-rustls/src/lib.rs
// ============================================================================
// Module: Pin Gate rustls Library
// Description: rustls-backed trust evaluation and pin enforcement.
// Purpose: Connect the pin decision core to real TLS handshakes.
// Dependencies: pin-gate-core, rustls, rustls-pki-types, x509-parser
// ============================================================================

//! ## Overview
//! `pin-gate-rustls` supplies the platform half of pinning:
//! [`WebPkiTrustEvaluator`] performs baseline chain and hostname validation,
//! [`PresentedChain`] exposes certificate and SPKI bytes for matching, and
//! [`PinningServerVerifier`] plugs the decision core into a rustls
//! [`rustls::ClientConfig`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod chain;
pub mod error;
pub mod evaluator;
pub mod verifier;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use chain::PresentedChain;
pub use chain::VerifiedChain;
pub use chain::certificates_from_pem;
pub use chain::subject_public_key_info;
pub use error::TrustSetupError;
pub use evaluator::WebPkiTrustEvaluator;
pub use evaluator::root_store_from_pem;
pub use verifier::PinningServerVerifier;
pub use verifier::client_config;
