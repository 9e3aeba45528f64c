// crates/pin-gate-rustls/src/evaluator.rs
// ============================================================================
// Module: WebPKI Trust Evaluator
// Description: Baseline chain and hostname validation backed by rustls.
// Purpose: Implement the platform trust role for the decision engine.
// Dependencies: pin-gate-core, rustls, rustls-pki-types
// ============================================================================

//! ## Overview
//! [`WebPkiTrustEvaluator`] answers the engine's baseline question with the
//! rustls WebPKI verifier: does the chain build to a configured root, and is
//! it valid for the host at the evaluation time? It never consults pins.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use pin_gate_core::CertificateRef;
use pin_gate_core::HostName;
use pin_gate_core::Timestamp;
use pin_gate_core::TrustEvaluator;
use rustls::RootCertStore;
use rustls::client::WebPkiServerVerifier;
use rustls::client::danger::ServerCertVerifier;
use rustls::crypto::CryptoProvider;
use rustls_pki_types::ServerName;
use rustls_pki_types::UnixTime;

use crate::chain::PresentedChain;
use crate::chain::VerifiedChain;
use crate::chain::certificates_from_pem;
use crate::error::TrustSetupError;

// ============================================================================
// SECTION: Root Stores
// ============================================================================

/// Builds a root store from every certificate in a PEM document.
///
/// # Errors
///
/// Returns [`TrustSetupError`] when the PEM is malformed, empty, or holds a
/// certificate that cannot serve as a trust anchor.
pub fn root_store_from_pem(pem: &[u8]) -> Result<RootCertStore, TrustSetupError> {
    let mut roots = RootCertStore::empty();
    for cert in certificates_from_pem(pem)? {
        roots.add(cert).map_err(|err| TrustSetupError::RootStore(err.to_string()))?;
    }
    Ok(roots)
}

// ============================================================================
// SECTION: Time Conversion
// ============================================================================

/// Converts an evaluation time to rustls time; pre-epoch times have no
/// rustls equivalent.
pub(crate) fn unix_time(now: Timestamp) -> Option<UnixTime> {
    let seconds = u64::try_from(now.as_unix_millis().div_euclid(1000)).ok()?;
    Some(UnixTime::since_unix_epoch(Duration::from_secs(seconds)))
}

/// Converts rustls time to an evaluation time.
pub(crate) fn timestamp(now: UnixTime) -> Timestamp {
    Timestamp::from_unix_seconds(i64::try_from(now.as_secs()).unwrap_or(i64::MAX))
}

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// Trust evaluator backed by the rustls WebPKI verifier.
#[derive(Debug, Clone)]
pub struct WebPkiTrustEvaluator {
    /// Chain and hostname verifier.
    verifier: Arc<WebPkiServerVerifier>,
    /// Crypto provider shared with client configs.
    provider: Arc<CryptoProvider>,
}

impl WebPkiTrustEvaluator {
    /// Creates an evaluator over `roots` using the aws-lc-rs provider.
    ///
    /// # Errors
    ///
    /// Returns [`TrustSetupError::Verifier`] when the root store is empty.
    pub fn new(roots: RootCertStore) -> Result<Self, TrustSetupError> {
        Self::with_provider(roots, Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
    }

    /// Creates an evaluator over `roots` using an explicit crypto provider.
    ///
    /// # Errors
    ///
    /// Returns [`TrustSetupError::Verifier`] when the verifier cannot be built.
    pub fn with_provider(
        roots: RootCertStore,
        provider: Arc<CryptoProvider>,
    ) -> Result<Self, TrustSetupError> {
        let verifier =
            WebPkiServerVerifier::builder_with_provider(Arc::new(roots), Arc::clone(&provider))
                .build()
                .map_err(|err| TrustSetupError::Verifier(err.to_string()))?;
        Ok(Self {
            verifier,
            provider,
        })
    }

    /// Creates an evaluator trusting every certificate in a PEM document.
    ///
    /// # Errors
    ///
    /// Returns [`TrustSetupError`] when the roots cannot be loaded.
    pub fn from_pem(pem: &[u8]) -> Result<Self, TrustSetupError> {
        Self::new(root_store_from_pem(pem)?)
    }

    /// Returns the underlying WebPKI verifier.
    #[must_use]
    pub const fn verifier(&self) -> &Arc<WebPkiServerVerifier> {
        &self.verifier
    }

    /// Returns the crypto provider.
    #[must_use]
    pub const fn provider(&self) -> &Arc<CryptoProvider> {
        &self.provider
    }
}

impl TrustEvaluator for WebPkiTrustEvaluator {
    type Chain = PresentedChain;
    type Credential = VerifiedChain;

    fn validate_chain(&self, chain: &PresentedChain, host: &HostName, now: Timestamp) -> bool {
        let Some((end_entity, intermediates)) = chain.certificates().split_first() else {
            return false;
        };
        let Ok(server_name) = ServerName::try_from(host.as_str()) else {
            return false;
        };
        let Some(now) = unix_time(now) else {
            return false;
        };
        self.verifier
            .verify_server_cert(end_entity, intermediates, &server_name, chain.ocsp_response(), now)
            .is_ok()
    }

    fn chain_length(&self, chain: &PresentedChain) -> usize {
        chain.len()
    }

    fn certificate_at<'c>(
        &self,
        chain: &'c PresentedChain,
        index: usize,
    ) -> Option<CertificateRef<'c>> {
        chain.certificate_ref(index)
    }

    fn credential(&self, chain: &PresentedChain) -> VerifiedChain {
        VerifiedChain {
            certificates: chain.certificates().to_vec(),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
