// crates/pin-gate-cli/src/lib.rs
// ============================================================================
// Module: Pin Gate CLI Library
// Description: Command implementations shared by the binary and tests.
// Dependencies: pin-gate-config, pin-gate-core, pin-gate-rustls
// ============================================================================

//! ## Overview
//! Library surface for the `pin-gate` binary. Commands return reports; the
//! binary renders them as JSON on stdout.

pub mod commands;
