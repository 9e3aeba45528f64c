// crates/pin-gate-config/src/lib.rs
// ============================================================================
// Module: Pin Gate Config Library
// Description: Canonical pin configuration model and validation.
// Purpose: Single source of truth for pin-gate.toml semantics.
// Dependencies: pin-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `pin-gate-config` reads `pin-gate.toml` and turns it into a
//! [`pin_gate_core::PinSnapshot`] plus an audit sink. Validation is strict
//! and fail-closed: malformed pins, inverted windows, and overlapping
//! patterns are rejected before anything is published.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
