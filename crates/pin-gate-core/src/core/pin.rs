// crates/pin-gate-core/src/core/pin.rs
// ============================================================================
// Module: Pin Gate Pins
// Description: Pin digests, comparison basis, and per-domain pin sets.
// Purpose: Represent acceptable certificate or public-key hashes for a domain.
// Dependencies: base64, serde, subtle
// ============================================================================

//! ## Overview
//! A pin is a SHA-256 digest over either the full DER certificate or its
//! DER-encoded subject public key info. A [`PinSet`] is non-empty and uses a
//! single basis for every digest it holds, so the matcher applies one
//! comparison rule per domain.
//!
//! Text forms: `sha256/<base64>` (HPKP style) or 64 hex characters, with
//! optional `:` separators as printed by `openssl x509 -fingerprint`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde::Serialize;
use subtle::Choice;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::core::hashing::DEFAULT_HASH_ALGORITHM;
use crate::core::hashing::HashAlgorithm;
use crate::core::hashing::SHA256_DIGEST_LEN;
use crate::core::hashing::hex_decode;
use crate::core::hashing::hex_encode;
use crate::core::hashing::sha256;

// ============================================================================
// SECTION: Pin Basis
// ============================================================================

/// Bytes a pin digest is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinBasis {
    /// SHA-256 over the full DER-encoded certificate.
    Certificate,
    /// SHA-256 over the DER-encoded subject public key info.
    #[default]
    SubjectPublicKeyInfo,
}

// ============================================================================
// SECTION: Pin Digest
// ============================================================================

/// SHA-256 pin digest.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PinDigest([u8; SHA256_DIGEST_LEN]);

impl PinDigest {
    /// Wraps raw digest bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SHA256_DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Computes the digest of the provided bytes.
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Self(sha256(bytes))
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SHA256_DIGEST_LEN] {
        &self.0
    }

    /// Returns the digest as lowercase hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex_encode(&self.0)
    }

    /// Compares two digests in constant time.
    #[must_use]
    pub fn ct_matches(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }

    /// Parses `sha256/<base64>` or hex text into a digest.
    ///
    /// # Errors
    ///
    /// Returns [`PinParseError`] for unsupported algorithms, bad encodings, or
    /// digests of the wrong length.
    pub fn parse(text: &str) -> Result<Self, PinParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(PinParseError::Empty);
        }
        let bytes = if let Some((label, encoded)) = trimmed.split_once('/') {
            HashAlgorithm::parse(label)?;
            STANDARD
                .decode(encoded.trim())
                .map_err(|err| PinParseError::Encoding(err.to_string()))?
        } else {
            hex_decode(&trimmed.replace(':', ""))?
        };
        let digest: [u8; SHA256_DIGEST_LEN] =
            bytes.try_into().map_err(|bytes: Vec<u8>| PinParseError::Length(bytes.len()))?;
        Ok(Self(digest))
    }
}

impl fmt::Display for PinDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", DEFAULT_HASH_ALGORITHM.label(), STANDARD.encode(self.0))
    }
}

impl fmt::Debug for PinDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PinDigest({self})")
    }
}

impl Serialize for PinDigest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PinDigest {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Pin Set
// ============================================================================

/// Non-empty set of acceptable digests sharing one basis.
///
/// # Invariants
/// - At least one digest.
/// - Digests are unique and kept in first-seen order.
/// - Every digest was computed over [`PinSet::basis`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinSet {
    /// Basis shared by all digests.
    basis: PinBasis,
    /// Unique digests in first-seen order.
    digests: Vec<PinDigest>,
}

impl PinSet {
    /// Builds a pin set from digests that share `basis`.
    ///
    /// # Errors
    ///
    /// Returns [`PinSetError::Empty`] when no digests are supplied.
    pub fn new(
        basis: PinBasis,
        digests: impl IntoIterator<Item = PinDigest>,
    ) -> Result<Self, PinSetError> {
        let mut unique: Vec<PinDigest> = Vec::new();
        for digest in digests {
            if !unique.contains(&digest) {
                unique.push(digest);
            }
        }
        if unique.is_empty() {
            return Err(PinSetError::Empty);
        }
        Ok(Self {
            basis,
            digests: unique,
        })
    }

    /// Returns the shared basis.
    #[must_use]
    pub const fn basis(&self) -> PinBasis {
        self.basis
    }

    /// Returns the digests in first-seen order.
    #[must_use]
    pub fn digests(&self) -> &[PinDigest] {
        &self.digests
    }

    /// Returns true when `candidate` is in the set.
    ///
    /// Every stored digest is compared so timing does not reveal which pin
    /// (if any) matched.
    #[must_use]
    pub fn contains(&self, candidate: &PinDigest) -> bool {
        let found =
            self.digests.iter().fold(Choice::from(0), |acc, digest| acc | digest.ct_matches(candidate));
        bool::from(found)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when parsing pin text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PinParseError {
    /// Pin text is empty.
    #[error("pin must be non-empty")]
    Empty,
    /// Pin names an algorithm other than SHA-256.
    #[error("unsupported pin hash algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// Pin digest is not valid base64 or hex.
    #[error("invalid pin encoding: {0}")]
    Encoding(String),
    /// Pin digest has the wrong length.
    #[error("pin digest must be {SHA256_DIGEST_LEN} bytes, got {0}")]
    Length(usize),
}

/// Errors raised when building pin sets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PinSetError {
    /// Pin set has no digests.
    #[error("pin set must contain at least one pin")]
    Empty,
}

// ============================================================================
// SECTION: Tests
// ============================================================================
