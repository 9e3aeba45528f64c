// crates/pin-gate-core/src/core/hashing.rs
// ============================================================================
// Module: Pin Gate Hashing
// Description: Fixed, collision-resistant digest used for pin comparison.
// Purpose: Provide the single hash algorithm accepted for pins.
// Dependencies: serde, sha2
// ============================================================================

//! ## Overview
//! Pins are compared over SHA-256 digests only. There is deliberately no
//! variant for legacy algorithms, so a configuration naming one fails to
//! parse instead of silently weakening the comparison.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use crate::core::pin::PinParseError;

// ============================================================================
// SECTION: Hash Algorithm
// ============================================================================

/// Digest length in bytes for SHA-256.
pub const SHA256_DIGEST_LEN: usize = 32;

/// Supported hash algorithms for pin digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256 hashing.
    Sha256,
}

/// Default hash algorithm for Pin Gate.
pub const DEFAULT_HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

impl HashAlgorithm {
    /// Returns the stable label used in pin text (`sha256/...`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }

    /// Parses an algorithm label, rejecting anything but SHA-256.
    ///
    /// # Errors
    ///
    /// Returns [`PinParseError::UnsupportedAlgorithm`] for unknown or weak labels.
    pub fn parse(label: &str) -> Result<Self, PinParseError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            other => Err(PinParseError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Hashing Helpers
// ============================================================================

/// Hashes raw bytes with SHA-256.
#[must_use]
pub fn sha256(bytes: &[u8]) -> [u8; SHA256_DIGEST_LEN] {
    Sha256::digest(bytes).into()
}

/// Encodes bytes as a lowercase hex string.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

/// Decodes a hex string (either case) into bytes.
///
/// # Errors
///
/// Returns [`PinParseError::Encoding`] on odd length or non-hex characters.
pub fn hex_decode(text: &str) -> Result<Vec<u8>, PinParseError> {
    if text.len() % 2 != 0 {
        return Err(PinParseError::Encoding("hex digest has odd length".to_string()));
    }
    text.as_bytes()
        .chunks(2)
        .map(|pair| {
            let high = hex_value(pair[0])?;
            let low = hex_value(pair[1])?;
            Ok((high << 4) | low)
        })
        .collect()
}

/// Returns the numeric value of a single hex character.
fn hex_value(byte: u8) -> Result<u8, PinParseError> {
    match byte {
        b'0'..=b'9' => Ok(byte - b'0'),
        b'a'..=b'f' => Ok(byte - b'a' + 10),
        b'A'..=b'F' => Ok(byte - b'A' + 10),
        _ => Err(PinParseError::Encoding("invalid hex character".to_string())),
    }
}
