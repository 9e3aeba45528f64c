//! Config load validation tests for pin-gate-config.
// crates/pin-gate-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use pin_gate_config::ConfigError;
use pin_gate_config::PinGateConfig;
use pin_gate_core::PinDigest;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<PinGateConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    assert_invalid(PinGateConfig::load(Some(Path::new(&long_path))), "config path exceeds max length")
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    assert_invalid(
        PinGateConfig::load(Some(Path::new(&long_component))),
        "config path component too long",
    )
}

#[test]
fn load_rejects_missing_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let missing = dir.path().join("absent.toml");
    assert_invalid(PinGateConfig::load(Some(&missing)), "config io error")
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'#'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(PinGateConfig::load(Some(file.path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(PinGateConfig::load(Some(file.path())), "config file must be utf-8")
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[[domains]\nhost = ").map_err(|err| err.to_string())?;
    assert_invalid(PinGateConfig::load(Some(file.path())), "config parse error")
}

#[test]
fn load_accepts_valid_file() -> TestResult {
    let pin = PinDigest::of(b"leaf-spki");
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    write!(
        file,
        "[audit]\nsink = \"none\"\n\n[[domains]]\nhost = \"example.com\"\npins = [\"{pin}\"]\n"
    )
    .map_err(|err| err.to_string())?;

    let config = PinGateConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    let snapshot = config.snapshot().map_err(|err| err.to_string())?;

    if snapshot.len() == 1 {
        Ok(())
    } else {
        Err(format!("expected one domain, got {}", snapshot.len()))
    }
}
