// crates/pin-gate-rustls/src/error.rs
// ============================================================================
// Module: Trust Setup Errors
// Description: Errors raised while assembling roots, chains, and verifiers.
// ============================================================================

//! Setup errors for the rustls trust backend. Handshake-time failures are
//! reported through `rustls::Error`, not this type.

use thiserror::Error;

/// Trust backend setup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrustSetupError {
    /// PEM input could not be decoded.
    #[error("invalid pem: {0}")]
    Pem(String),
    /// PEM input held no certificates.
    #[error("no certificates found")]
    NoCertificates,
    /// Certificate could not be parsed.
    #[error("invalid certificate: {0}")]
    Certificate(String),
    /// Trust anchor was rejected by the root store.
    #[error("invalid trust anchor: {0}")]
    RootStore(String),
    /// WebPKI verifier could not be built.
    #[error("verifier setup failed: {0}")]
    Verifier(String),
    /// Protocol versions are unsupported by the crypto provider.
    #[error("tls protocol setup failed: {0}")]
    Protocol(String),
}
