// crates/pin-gate-cli/src/commands.rs
// ============================================================================
// Module: Pin Gate CLI Commands
// Description: Pin computation, config validation, and offline chain checks.
// Purpose: Keep command logic testable apart from argument parsing.
// Dependencies: pin-gate-config, pin-gate-core, pin-gate-rustls, serde
// ============================================================================

//! ## Overview
//! Each command reads bounded inputs from disk, runs the same code paths a
//! TLS client would, and returns a serializable report. Output formatting is
//! left to the binary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use pin_gate_config::ConfigError;
use pin_gate_config::PinGateConfig;
use pin_gate_core::AuthenticationChallenge;
use pin_gate_core::ChallengeAdapter;
use pin_gate_core::DecisionOutcome;
use pin_gate_core::Disposition;
use pin_gate_core::FixedClock;
use pin_gate_core::HostName;
use pin_gate_core::HostNameError;
use pin_gate_core::PinAuditSink;
use pin_gate_core::PinBasis;
use pin_gate_core::PinDigest;
use pin_gate_core::Timestamp;
use pin_gate_core::TimestampError;
use pin_gate_core::TrustDecisionEngine;
use pin_gate_rustls::PresentedChain;
use pin_gate_rustls::TrustSetupError;
use pin_gate_rustls::WebPkiTrustEvaluator;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a PEM input file.
pub const MAX_PEM_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI command errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file could not be read.
    #[error("failed to read {path}: {error}")]
    Read {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        error: std::io::Error,
    },
    /// Input file exceeds the size limit.
    #[error("{path} exceeds size limit ({size} > {limit} bytes)")]
    TooLarge {
        /// Offending path.
        path: PathBuf,
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
    /// Configuration failed to load.
    #[error("failed to load config: {0}")]
    Config(#[from] ConfigError),
    /// Certificates or roots were unusable.
    #[error(transparent)]
    Trust(#[from] TrustSetupError),
    /// Host argument was malformed.
    #[error("invalid host: {0}")]
    Host(#[from] HostNameError),
    /// Evaluation time argument was malformed.
    #[error("invalid evaluation time: {0}")]
    Time(#[from] TimestampError),
    /// Output could not be written.
    #[error("failed to write {stream}: {error}")]
    Output {
        /// Stream label.
        stream: &'static str,
        /// Underlying I/O error.
        error: std::io::Error,
    },
}

/// CLI result alias for fallible operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Reads a file from disk while enforcing a hard size limit.
///
/// # Errors
///
/// Returns [`CliError`] when the file cannot be read or is too large.
pub fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> CliResult<Vec<u8>> {
    let read_error = |error| CliError::Read {
        path: path.to_path_buf(),
        error,
    };
    let too_large = |size| CliError::TooLarge {
        path: path.to_path_buf(),
        size,
        limit: max_bytes,
    };
    let file = File::open(path).map_err(read_error)?;
    let size = file.metadata().map_err(read_error)?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(too_large(size));
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(read_error)?;
    if bytes.len() > max_bytes {
        return Err(too_large(u64::try_from(bytes.len()).unwrap_or(u64::MAX)));
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Pin Command
// ============================================================================

/// Pins for one certificate in a PEM file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificatePins {
    /// Position in the file, starting at zero.
    pub index: usize,
    /// Pin over the full DER certificate.
    pub certificate: PinDigest,
    /// Pin over the subject public key info.
    pub subject_public_key_info: PinDigest,
}

impl CertificatePins {
    /// Returns the pin for `basis`.
    #[must_use]
    pub const fn for_basis(&self, basis: PinBasis) -> PinDigest {
        match basis {
            PinBasis::Certificate => self.certificate,
            PinBasis::SubjectPublicKeyInfo => self.subject_public_key_info,
        }
    }
}

/// Computes both pins for every certificate in a PEM document.
///
/// # Errors
///
/// Returns [`CliError::Trust`] when the PEM or a certificate is malformed.
pub fn compute_pins(pem: &[u8]) -> CliResult<Vec<CertificatePins>> {
    let certificates = pin_gate_rustls::certificates_from_pem(pem)?;
    certificates
        .iter()
        .enumerate()
        .map(|(index, cert)| -> CliResult<CertificatePins> {
            let spki = pin_gate_rustls::subject_public_key_info(cert)?;
            Ok(CertificatePins {
                index,
                certificate: PinDigest::of(cert),
                subject_public_key_info: PinDigest::of(&spki),
            })
        })
        .collect()
}

/// Computes pins for a PEM file on disk.
///
/// # Errors
///
/// Returns [`CliError`] when the file cannot be read or parsed.
pub fn command_pin(path: &Path) -> CliResult<Vec<CertificatePins>> {
    compute_pins(&read_bytes_with_limit(path, MAX_PEM_BYTES)?)
}

// ============================================================================
// SECTION: Config Command
// ============================================================================

/// Summary of a validated configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSummary {
    /// Number of pinned domain entries.
    pub domains: usize,
}

/// Loads and validates a configuration file.
///
/// # Errors
///
/// Returns [`CliError::Config`] when the configuration is invalid.
pub fn command_config_validate(path: Option<&Path>) -> CliResult<ConfigSummary> {
    let config = PinGateConfig::load(path)?;
    Ok(ConfigSummary {
        domains: config.snapshot()?.len(),
    })
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

/// Inputs for an offline chain check.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    /// Host being contacted.
    pub host: String,
    /// PEM chain as the server would present it, leaf first.
    pub chain_pem: Vec<u8>,
    /// PEM trust anchors for baseline validation.
    pub roots_pem: Vec<u8>,
    /// Evaluation time.
    pub now: Timestamp,
}

/// Result of an offline chain check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Normalized host.
    pub host: String,
    /// Decision outcome.
    pub outcome: DecisionOutcome,
    /// Disposition a transport would receive.
    pub disposition: Disposition,
    /// Evaluation time in milliseconds since epoch.
    pub evaluated_at_ms: i64,
}

/// Maps a disposition back to the decision that produced it.
const fn outcome_for(disposition: Disposition) -> DecisionOutcome {
    match disposition {
        Disposition::UseCredential => DecisionOutcome::Allow,
        Disposition::PerformDefaultHandling => DecisionOutcome::NotPinned,
        Disposition::RejectProtectionSpace | Disposition::CancelChallenge => DecisionOutcome::Block,
    }
}

/// Evaluates a chain for a host exactly as a pinning TLS client would.
///
/// # Errors
///
/// Returns [`CliError`] when the host, chain, roots, or config are unusable.
pub fn check_chain(
    request: &CheckRequest,
    config: &PinGateConfig,
    audit: Arc<dyn PinAuditSink>,
) -> CliResult<CheckReport> {
    let host = HostName::parse(&request.host)?;
    let chain = PresentedChain::from_pem(&request.chain_pem)?;
    let trust = WebPkiTrustEvaluator::from_pem(&request.roots_pem)?;
    let adapter = ChallengeAdapter::new(TrustDecisionEngine::new(config.snapshot()?, trust))
        .with_clock(Arc::new(FixedClock(request.now)))
        .with_audit_sink(audit);

    let challenge = AuthenticationChallenge::server_trust(host.as_str(), chain);
    let mut disposition = Disposition::RejectProtectionSpace;
    let handled = adapter.handle(&challenge, |answer, _| disposition = answer);
    if !handled {
        disposition = Disposition::PerformDefaultHandling;
    }

    Ok(CheckReport {
        host: host.as_str().to_string(),
        outcome: outcome_for(disposition),
        disposition,
        evaluated_at_ms: request.now.as_unix_millis(),
    })
}

/// Runs `check` with file inputs and the configured audit sink.
///
/// # Errors
///
/// Returns [`CliError`] when any input is unreadable or invalid.
pub fn command_check(
    host: &str,
    chain: &Path,
    roots: &Path,
    config: Option<&Path>,
    now: Timestamp,
) -> CliResult<CheckReport> {
    let config = PinGateConfig::load(config)?;
    let request = CheckRequest {
        host: host.to_string(),
        chain_pem: read_bytes_with_limit(chain, MAX_PEM_BYTES)?,
        roots_pem: read_bytes_with_limit(roots, MAX_PEM_BYTES)?,
        now,
    };
    check_chain(&request, &config, config.audit_sink()?)
}
