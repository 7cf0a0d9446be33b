// crates/draft-content-hooks/src/lib.rs
// ============================================================================
// Module: Draft Content Hooks
// Description: Contract-test hooks for the Draft Content API blueprint suite.
// Purpose: Register the transaction filter with the test engine at startup.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The blueprint test engine builds one [`Transaction`] per documented request
//! and runs every registered before-each hook on it. This crate provides the
//! registry those hooks live in and the one hook the Draft Content suite
//! needs: a filter that skips the good-to-go probe and the draft content
//! transactions, which depend on upstream services the suite cannot stub.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod filter;
pub mod log;
pub mod registry;
pub mod transaction;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use filter::SKIPPED_PREFIXES;
pub use filter::is_excluded;
pub use filter::skip_excluded;
pub use log::HookLog;
pub use log::JsonLineHookLog;
pub use log::MemoryHookLog;
pub use log::StderrHookLog;
pub use registry::HookContext;
pub use registry::HookRegistry;
pub use transaction::Transaction;
pub use transaction::TransactionOrigin;

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Registers the Draft Content suite hooks with the engine's registry.
///
/// Called once at process start, before the engine runs any transaction.
pub fn register(registry: &mut HookRegistry) {
    registry.before_each(skip_excluded);
}
