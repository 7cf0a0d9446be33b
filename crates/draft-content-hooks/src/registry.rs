// crates/draft-content-hooks/src/registry.rs
// ============================================================================
// Module: Hook Registry
// Description: Explicit registration point for before-each hooks.
// Purpose: Replace ambient hook loading with a registry the engine owns.
// Dependencies: crate::{log, transaction}
// ============================================================================

//! ## Overview
//! The engine creates one [`HookRegistry`] at startup, hands it to the
//! suite's registration function, then calls
//! [`HookRegistry::run_before_each`] for every transaction before executing
//! it. Hooks run synchronously, in registration order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::log::HookLog;
use crate::transaction::Transaction;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Boxed before-each callback.
type BeforeEachHook = Box<dyn Fn(&mut Transaction, &HookContext<'_>) + Send + Sync>;

/// Services the engine exposes to a running hook.
pub struct HookContext<'a> {
    /// Engine log sink.
    log: &'a dyn HookLog,
}

impl HookContext<'_> {
    /// Writes a diagnostic line to the engine log.
    pub fn log(&self, message: &str) {
        self.log.write_line(message);
    }
}

/// Registered hooks and the log they write to.
pub struct HookRegistry {
    /// Engine log sink shared by all hooks.
    log: Arc<dyn HookLog>,
    /// Before-each hooks in registration order.
    before_each: Vec<BeforeEachHook>,
}

impl HookRegistry {
    /// Creates an empty registry writing to `log`.
    #[must_use]
    pub fn new(log: Arc<dyn HookLog>) -> Self {
        Self {
            log,
            before_each: Vec::new(),
        }
    }

    /// Registers a hook run before each transaction.
    pub fn before_each<F>(&mut self, hook: F)
    where
        F: Fn(&mut Transaction, &HookContext<'_>) + Send + Sync + 'static,
    {
        self.before_each.push(Box::new(hook));
    }

    /// Returns the number of registered before-each hooks.
    #[must_use]
    pub fn before_each_count(&self) -> usize {
        self.before_each.len()
    }

    /// Runs every before-each hook against `transaction`.
    pub fn run_before_each(&self, transaction: &mut Transaction) {
        let context = HookContext {
            log: self.log.as_ref(),
        };
        for hook in &self.before_each {
            hook(transaction, &context);
        }
    }

    /// Runs the before-each hooks over a batch, in order.
    pub fn run_before_each_all(&self, transactions: &mut [Transaction]) {
        for transaction in transactions {
            self.run_before_each(transaction);
        }
    }
}
