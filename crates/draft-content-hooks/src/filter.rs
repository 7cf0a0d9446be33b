// crates/draft-content-hooks/src/filter.rs
// ============================================================================
// Module: Transaction Filter
// Description: Before-each hook excluding transactions by name prefix.
// Purpose: Skip the cases the contract suite cannot run in isolation.
// Dependencies: crate::{registry, transaction}
// ============================================================================

//! ## Overview
//! The good-to-go probe and the draft content endpoints call upstream
//! services, so the suite skips them. Matching is a case-sensitive prefix
//! check against exactly the names in [`SKIPPED_PREFIXES`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::registry::HookContext;
use crate::transaction::Transaction;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Transaction name prefixes that are skipped.
pub const SKIPPED_PREFIXES: [&str; 2] = ["Health > /__gtg", "Draft Content >"];

// ============================================================================
// SECTION: Filter
// ============================================================================

/// Returns true when a transaction with this name must be skipped.
#[must_use]
pub fn is_excluded(name: &str) -> bool {
    SKIPPED_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// Marks excluded transactions as skipped, logging each one.
///
/// Non-matching transactions are left untouched and nothing is logged.
pub fn skip_excluded(transaction: &mut Transaction, context: &HookContext<'_>) {
    if is_excluded(&transaction.name) {
        context.log(&format!("skipping: {}", transaction.name));
        transaction.skip = true;
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
