// crates/pin-gate-config/src/config.rs
// ============================================================================
// Module: Pin Gate Configuration
// Description: Configuration loading and validation for pinned domains.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: pin-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every domain entry is converted into core types during validation, so a
//! configuration that validates always yields a usable [`PinSnapshot`].
//! A configuration that fails to load must not be treated as "nothing is
//! pinned": callers keep the previous snapshot or refuse to start.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use pin_gate_core::DomainPinConfiguration;
use pin_gate_core::EnforcementWindow;
use pin_gate_core::FailureDisposition;
use pin_gate_core::FileAuditSink;
use pin_gate_core::HostPattern;
use pin_gate_core::NoopAuditSink;
use pin_gate_core::PinAuditSink;
use pin_gate_core::PinBasis;
use pin_gate_core::PinDigest;
use pin_gate_core::PinSet;
use pin_gate_core::PinSnapshot;
use pin_gate_core::StderrAuditSink;
use pin_gate_core::Timestamp;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "pin-gate.toml";
/// Environment variable used to locate the config file.
pub(crate) const CONFIG_ENV_VAR: &str = "PIN_GATE_CONFIG";
/// Maximum size of the config file in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of domain entries.
pub const MAX_DOMAINS: usize = 1024;
/// Maximum number of pins per domain entry.
pub const MAX_PINS_PER_DOMAIN: usize = 64;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Pin Gate configuration loaded from `pin-gate.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PinGateConfig {
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Pinned domain entries.
    #[serde(default)]
    pub domains: Vec<DomainConfig>,
}

impl PinGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.audit.validate()?;
        self.snapshot().map(|_| ())
    }

    /// Builds the immutable pin snapshot described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when any domain entry is invalid or two entries
    /// claim the same host with equal precedence.
    pub fn snapshot(&self) -> Result<PinSnapshot, ConfigError> {
        if self.domains.len() > MAX_DOMAINS {
            return Err(ConfigError::Invalid(format!(
                "domains exceeds max entries ({MAX_DOMAINS})"
            )));
        }
        let domains = self
            .domains
            .iter()
            .enumerate()
            .map(|(index, domain)| domain.to_domain(index))
            .collect::<Result<Vec<_>, _>>()?;
        PinSnapshot::new(domains).map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the audit file cannot be opened.
    pub fn audit_sink(&self) -> Result<Arc<dyn PinAuditSink>, ConfigError> {
        self.audit.build()
    }
}

/// One pinned domain entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainConfig {
    /// Host name, or `*.` followed by a host for single-label wildcards.
    pub host: String,
    /// Extends the pins to every subdomain of `host`.
    #[serde(default)]
    pub include_subdomains: bool,
    /// Bytes the pins are computed over.
    #[serde(default)]
    pub basis: PinBasis,
    /// Accepted pins (`sha256/<base64>` or hex).
    pub pins: Vec<String>,
    /// Optional RFC 3339 start of enforcement (inclusive).
    #[serde(default)]
    pub not_before: Option<String>,
    /// Optional RFC 3339 end of enforcement (exclusive).
    #[serde(default)]
    pub not_after: Option<String>,
    /// Transport action when a pinned chain is blocked.
    #[serde(default)]
    pub on_failure: FailureDisposition,
}

impl DomainConfig {
    /// Converts the entry into a core domain configuration.
    fn to_domain(&self, index: usize) -> Result<DomainPinConfiguration, ConfigError> {
        let field = format!("domains[{index}]");
        let pattern = HostPattern::parse(&self.host, self.include_subdomains)
            .map_err(|err| ConfigError::Invalid(format!("{field}.host: {err}")))?;
        if self.pins.len() > MAX_PINS_PER_DOMAIN {
            return Err(ConfigError::Invalid(format!(
                "{field}.pins exceeds max entries ({MAX_PINS_PER_DOMAIN})"
            )));
        }
        let digests = self
            .pins
            .iter()
            .enumerate()
            .map(|(pin_index, pin)| {
                PinDigest::parse(pin).map_err(|err| {
                    ConfigError::Invalid(format!("{field}.pins[{pin_index}]: {err}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let pins = PinSet::new(self.basis, digests)
            .map_err(|err| ConfigError::Invalid(format!("{field}.pins: {err}")))?;
        let not_before = parse_timestamp(&field, "not_before", self.not_before.as_deref())?;
        let not_after = parse_timestamp(&field, "not_after", self.not_after.as_deref())?;
        let window = EnforcementWindow::new(not_before, not_after)
            .map_err(|err| ConfigError::Invalid(format!("{field}: {err}")))?;
        Ok(DomainPinConfiguration::new(pattern, pins)
            .with_window(window)
            .with_failure_disposition(self.on_failure))
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard audit events.
    None,
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink receiving one event per handled challenge.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Audit log path, required for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        if self.sink == AuditSinkKind::File && self.path.is_none() {
            return Err(ConfigError::Invalid(
                "audit.path is required when audit.sink = \"file\"".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the configured sink.
    fn build(&self) -> Result<Arc<dyn PinAuditSink>, ConfigError> {
        match (self.sink, self.path.as_deref()) {
            (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
            (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
            (AuditSinkKind::File, Some(path)) => {
                let sink = FileAuditSink::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
            (AuditSinkKind::File, None) => Err(ConfigError::Invalid(
                "audit.path is required when audit.sink = \"file\"".to_string(),
            )),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Parses an optional RFC 3339 window bound.
fn parse_timestamp(
    field: &str,
    name: &str,
    value: Option<&str>,
) -> Result<Option<Timestamp>, ConfigError> {
    value
        .map(|text| {
            Timestamp::parse_rfc3339(text)
                .map_err(|err| ConfigError::Invalid(format!("{field}.{name}: {err}")))
        })
        .transpose()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
