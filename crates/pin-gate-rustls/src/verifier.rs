// crates/pin-gate-rustls/src/verifier.rs
// ============================================================================
// Module: Pinning Server Verifier
// Description: rustls server certificate verifier driven by pin decisions.
// Purpose: Enforce pins during real TLS handshakes.
// Dependencies: pin-gate-core, rustls
// ============================================================================

//! ## Overview
//! [`PinningServerVerifier`] turns each rustls server certificate check into
//! a server-trust challenge for the [`ChallengeAdapter`] and maps the
//! resulting disposition back onto rustls:
//!
//! | Disposition                 | rustls result                               |
//! |-----------------------------|---------------------------------------------|
//! | `UseCredential`             | `ServerCertVerified`                        |
//! | `PerformDefaultHandling`    | WebPKI verifier result                      |
//! | `RejectProtectionSpace`     | `InvalidCertificate(ApplicationVerificationFailure)` |
//! | `CancelChallenge`           | `InvalidCertificate(ApplicationVerificationFailure)` |
//!
//! Handshake signatures are always checked by the WebPKI verifier.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use pin_gate_core::AuthenticationChallenge;
use pin_gate_core::ChallengeAdapter;
use pin_gate_core::Disposition;
use pin_gate_core::PinAuditSink;
use pin_gate_core::PinConfigSource;
use pin_gate_core::TrustDecisionEngine;
use rustls::CertificateError;
use rustls::ClientConfig;
use rustls::DigitallySignedStruct;
use rustls::Error;
use rustls::SignatureScheme;
use rustls::client::WebPkiServerVerifier;
use rustls::client::danger::HandshakeSignatureValid;
use rustls::client::danger::ServerCertVerified;
use rustls::client::danger::ServerCertVerifier;
use rustls_pki_types::CertificateDer;
use rustls_pki_types::ServerName;
use rustls_pki_types::UnixTime;

use crate::chain::PresentedChain;
use crate::error::TrustSetupError;
use crate::evaluator::WebPkiTrustEvaluator;
use crate::evaluator::timestamp;

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// rustls verifier that enforces pins before accepting a server chain.
pub struct PinningServerVerifier<S> {
    /// Challenge adapter over the WebPKI-backed engine.
    adapter: ChallengeAdapter<S, WebPkiTrustEvaluator>,
    /// Verifier used for unpinned hosts and handshake signatures.
    fallback: Arc<WebPkiServerVerifier>,
}

impl<S> fmt::Debug for PinningServerVerifier<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinningServerVerifier").finish_non_exhaustive()
    }
}

impl<S: PinConfigSource> PinningServerVerifier<S> {
    /// Creates a verifier over a pin configuration and WebPKI evaluator.
    #[must_use]
    pub fn new(pins: S, trust: WebPkiTrustEvaluator) -> Self {
        let fallback = Arc::clone(trust.verifier());
        Self {
            adapter: ChallengeAdapter::new(TrustDecisionEngine::new(pins, trust)),
            fallback,
        }
    }

    /// Routes audit events to `audit`.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn PinAuditSink>) -> Self {
        self.adapter = self.adapter.with_audit_sink(audit);
        self
    }

    /// Returns the challenge adapter.
    #[must_use]
    pub const fn adapter(&self) -> &ChallengeAdapter<S, WebPkiTrustEvaluator> {
        &self.adapter
    }
}

impl<S: PinConfigSource> ServerCertVerifier for PinningServerVerifier<S> {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, Error> {
        let chain = PresentedChain::from_parts(end_entity, intermediates)
            .with_ocsp_response(ocsp_response.to_vec());
        let challenge = AuthenticationChallenge::server_trust(server_name.to_str(), chain);

        // Unanswered challenges stay rejected.
        let mut disposition = Disposition::RejectProtectionSpace;
        let handled = self.adapter.handle_at(&challenge, timestamp(now), |answer, _| {
            disposition = answer;
        });
        if !handled {
            disposition = Disposition::PerformDefaultHandling;
        }

        match disposition {
            Disposition::UseCredential => Ok(ServerCertVerified::assertion()),
            Disposition::PerformDefaultHandling => self.fallback.verify_server_cert(
                end_entity,
                intermediates,
                server_name,
                ocsp_response,
                now,
            ),
            Disposition::RejectProtectionSpace | Disposition::CancelChallenge => {
                Err(Error::InvalidCertificate(CertificateError::ApplicationVerificationFailure))
            }
        }
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, Error> {
        self.fallback.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, Error> {
        self.fallback.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.fallback.supported_verify_schemes()
    }
}

// ============================================================================
// SECTION: Client Config
// ============================================================================

/// Builds a rustls client config that enforces `pins`.
///
/// # Errors
///
/// Returns [`TrustSetupError::Protocol`] when the evaluator's provider does
/// not support the default protocol versions.
pub fn client_config<S>(
    pins: S,
    trust: WebPkiTrustEvaluator,
    audit: Arc<dyn PinAuditSink>,
) -> Result<ClientConfig, TrustSetupError>
where
    S: PinConfigSource + 'static,
{
    let provider = Arc::clone(trust.provider());
    let verifier = PinningServerVerifier::new(pins, trust).with_audit_sink(audit);
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|err| TrustSetupError::Protocol(err.to_string()))?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(verifier))
        .with_no_client_auth();
    Ok(config)
}
