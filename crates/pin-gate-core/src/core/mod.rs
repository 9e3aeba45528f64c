// crates/pin-gate-core/src/core/mod.rs
// ============================================================================
// Module: Pin Gate Core Types
// Description: Canonical pinning data model and decision types.
// Purpose: Provide stable, serializable types for hosts, pins, and decisions.
// Dependencies: serde, sha2, subtle, time
// ============================================================================

//! ## Overview
//! Core types define host names, pin digests and sets, per-domain pin
//! configuration, and the three-way [`Decision`]. These types are read-only
//! during evaluation and carry their invariants in their constructors.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod decision;
pub mod domain;
pub mod hashing;
pub mod host;
pub mod pin;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::decision::Decision;
pub use self::decision::DecisionOutcome;
pub use self::domain::DomainPinConfiguration;
pub use self::domain::EnforcementWindow;
pub use self::domain::FailureDisposition;
pub use self::domain::HostPattern;
pub use self::domain::WindowError;
pub use self::hashing::DEFAULT_HASH_ALGORITHM;
pub use self::hashing::HashAlgorithm;
pub use self::hashing::SHA256_DIGEST_LEN;
pub use self::host::HostName;
pub use self::host::HostNameError;
pub use self::host::MAX_HOST_NAME_LENGTH;
pub use self::pin::PinBasis;
pub use self::pin::PinDigest;
pub use self::pin::PinParseError;
pub use self::pin::PinSet;
pub use self::pin::PinSetError;
pub use self::time::Timestamp;
pub use self::time::TimestampError;
