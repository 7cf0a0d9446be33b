// crates/draft-content-config/src/lib.rs
// ============================================================================
// Module: Draft Content Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for draft-content-api.toml semantics.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! `draft-content-config` defines the configuration of the Draft Content API:
//! where the draft store, the Content API and the validators live, which
//! origins and content types may be written, and which extra health checks
//! run. Validation is strict and fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
