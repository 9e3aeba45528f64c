// crates/pin-gate-rustls/tests/common/mod.rs
// ============================================================================
// Module: TLS Test Fixtures
// Description: Generate ephemeral CAs and leaf certificates.
// Purpose: Exercise real WebPKI validation without committed key material.
// Dependencies: rcgen
// ============================================================================

//! Shared rcgen fixtures for pin-gate-rustls integration tests.

#![allow(dead_code, reason = "Not every test binary uses every fixture.")]
#![allow(
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items,
    reason = "Fixture generation failures abort the test."
)]

use pin_gate_core::DomainPinConfiguration;
use pin_gate_core::HostPattern;
use pin_gate_core::PinBasis;
use pin_gate_core::PinDigest;
use pin_gate_core::PinSet;
use pin_gate_core::PinSnapshot;
use pin_gate_rustls::PresentedChain;
use pin_gate_rustls::WebPkiTrustEvaluator;
use rcgen::BasicConstraints;
use rcgen::Certificate;
use rcgen::CertificateParams;
use rcgen::DistinguishedName;
use rcgen::DnType;
use rcgen::IsCa;
use rcgen::Issuer;
use rcgen::KeyPair;

pub struct TestCa {
    pub cert: Certificate,
    pub issuer: Issuer<'static, KeyPair>,
}

pub struct TestLeaf {
    pub cert: Certificate,
    pub key: KeyPair,
}

pub fn generate_ca(common_name: &str) -> TestCa {
    let key = KeyPair::generate().unwrap();
    let mut params = CertificateParams::default();
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.distinguished_name = distinguished_name(common_name);
    let cert = params.self_signed(&key).unwrap();
    TestCa {
        cert,
        issuer: Issuer::new(params, key),
    }
}

pub fn generate_leaf(ca: &TestCa, hosts: &[&str]) -> TestLeaf {
    let key = KeyPair::generate().unwrap();
    let mut params =
        CertificateParams::new(hosts.iter().map(ToString::to_string).collect::<Vec<_>>()).unwrap();
    params.distinguished_name = distinguished_name("Pin Gate Test Server");
    params.is_ca = IsCa::NoCa;
    let cert = params.signed_by(&key, &ca.issuer).unwrap();
    TestLeaf {
        cert,
        key,
    }
}

fn distinguished_name(common_name: &str) -> DistinguishedName {
    let mut name = DistinguishedName::new();
    name.push(DnType::CommonName, common_name);
    name
}

pub fn presented(leaf: &TestLeaf, ca: &TestCa) -> PresentedChain {
    PresentedChain::new(vec![leaf.cert.der().clone(), ca.cert.der().clone()])
}

pub fn evaluator(ca: &TestCa) -> WebPkiTrustEvaluator {
    WebPkiTrustEvaluator::from_pem(ca.cert.pem().as_bytes()).unwrap()
}

/// Exact-host configuration with one pin over `bytes`.
pub fn pinned(host: &str, basis: PinBasis, bytes: &[u8]) -> PinSnapshot {
    let pins = PinSet::new(basis, [PinDigest::of(bytes)]).unwrap();
    let domain = DomainPinConfiguration::new(HostPattern::parse(host, false).unwrap(), pins);
    PinSnapshot::new(vec![domain]).unwrap()
}
