// crates/pin-gate-rustls/src/chain.rs
// ============================================================================
// Module: Presented Chains
// Description: Owned certificate chains and verified-chain credentials.
// Purpose: Give the decision engine DER and SPKI views of a server chain.
// Dependencies: rustls-pki-types, x509-parser
// ============================================================================

//! ## Overview
//! A [`PresentedChain`] owns the certificates a server sent, leaf first, and
//! extracts each certificate's subject public key info once at construction.
//! A certificate whose SPKI cannot be parsed exposes no SPKI view and can
//! only ever match certificate-basis pins.

// ============================================================================
// SECTION: Imports
// ============================================================================

use pin_gate_core::CertificateRef;
use rustls_pki_types::CertificateDer;
use rustls_pki_types::pem::PemObject;

use crate::error::TrustSetupError;

// ============================================================================
// SECTION: SPKI Extraction
// ============================================================================

/// Returns the DER-encoded subject public key info of a certificate.
///
/// # Errors
///
/// Returns [`TrustSetupError::Certificate`] when `der` is not an X.509
/// certificate.
pub fn subject_public_key_info(der: &[u8]) -> Result<Vec<u8>, TrustSetupError> {
    let (_, cert) = x509_parser::parse_x509_certificate(der)
        .map_err(|err| TrustSetupError::Certificate(err.to_string()))?;
    Ok(cert.tbs_certificate.subject_pki.raw.to_vec())
}

// ============================================================================
// SECTION: Presented Chain
// ============================================================================

/// Certificate chain presented by a server, leaf first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedChain {
    /// Certificates in presentation order.
    certificates: Vec<CertificateDer<'static>>,
    /// SPKI bytes per certificate, when parseable.
    spki: Vec<Option<Vec<u8>>>,
    /// Stapled OCSP response, possibly empty.
    ocsp_response: Vec<u8>,
}

impl PresentedChain {
    /// Creates a chain from owned certificates.
    #[must_use]
    pub fn new(certificates: Vec<CertificateDer<'static>>) -> Self {
        let spki = certificates.iter().map(|cert| subject_public_key_info(cert).ok()).collect();
        Self {
            certificates,
            spki,
            ocsp_response: Vec::new(),
        }
    }

    /// Creates a chain from the borrowed views rustls hands a verifier.
    #[must_use]
    pub fn from_parts(end_entity: &CertificateDer<'_>, intermediates: &[CertificateDer<'_>]) -> Self {
        let mut certificates = Vec::with_capacity(intermediates.len() + 1);
        certificates.push(end_entity.clone().into_owned());
        certificates.extend(intermediates.iter().map(|cert| cert.clone().into_owned()));
        Self::new(certificates)
    }

    /// Parses every certificate in a PEM document.
    ///
    /// # Errors
    ///
    /// Returns [`TrustSetupError`] when the PEM is malformed or holds no
    /// certificates.
    pub fn from_pem(pem: &[u8]) -> Result<Self, TrustSetupError> {
        Ok(Self::new(certificates_from_pem(pem)?))
    }

    /// Attaches a stapled OCSP response.
    #[must_use]
    pub fn with_ocsp_response(mut self, ocsp_response: Vec<u8>) -> Self {
        self.ocsp_response = ocsp_response;
        self
    }

    /// Returns the certificates, leaf first.
    #[must_use]
    pub fn certificates(&self) -> &[CertificateDer<'static>] {
        &self.certificates
    }

    /// Returns the stapled OCSP response.
    #[must_use]
    pub fn ocsp_response(&self) -> &[u8] {
        &self.ocsp_response
    }

    /// Returns the number of certificates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    /// Returns true when the server presented nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// Returns pin-matching views of the certificate at `index`.
    #[must_use]
    pub fn certificate_ref(&self, index: usize) -> Option<CertificateRef<'_>> {
        let der = self.certificates.get(index)?;
        let view = CertificateRef::new(der.as_ref());
        match self.spki.get(index).and_then(Option::as_deref) {
            Some(spki) => Some(view.with_spki(spki)),
            None => Some(view),
        }
    }
}

/// Parses every certificate in a PEM document.
///
/// # Errors
///
/// Returns [`TrustSetupError`] when the PEM is malformed or holds no
/// certificates.
pub fn certificates_from_pem(pem: &[u8]) -> Result<Vec<CertificateDer<'static>>, TrustSetupError> {
    let certificates = CertificateDer::pem_slice_iter(pem)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| TrustSetupError::Pem(err.to_string()))?;
    if certificates.is_empty() {
        return Err(TrustSetupError::NoCertificates);
    }
    Ok(certificates)
}

// ============================================================================
// SECTION: Verified Chain
// ============================================================================

/// Credential handed back when a pinned chain is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedChain {
    /// Validated certificates, leaf first.
    pub certificates: Vec<CertificateDer<'static>>,
}

impl VerifiedChain {
    /// Returns the leaf certificate.
    #[must_use]
    pub fn leaf(&self) -> Option<&CertificateDer<'static>> {
        self.certificates.first()
    }
}
