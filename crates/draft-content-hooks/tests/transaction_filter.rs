// crates/draft-content-hooks/tests/transaction_filter.rs
// ============================================================================
// Module: Transaction Filter Tests
// Description: Scenario and property tests for the registered skip filter.
// Purpose: Pin exactly which transactions are skipped and what gets logged.
// Dependencies: draft-content-hooks, proptest
// ============================================================================

//! ## Overview
//! Drives the filter through a registry, the way the engine does, and checks
//! the skip flag plus the log lines written for each transaction.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::sync::Arc;

use draft_content_hooks::HookRegistry;
use draft_content_hooks::MemoryHookLog;
use draft_content_hooks::Transaction;
use draft_content_hooks::is_excluded;
use draft_content_hooks::register;
use proptest::prelude::*;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a registry with the suite hooks and returns it with its log.
fn registered() -> (HookRegistry, Arc<MemoryHookLog>) {
    let log = Arc::new(MemoryHookLog::new());
    let mut registry = HookRegistry::new(log.clone());
    register(&mut registry);
    (registry, log)
}

/// Runs the suite hooks on a fresh transaction.
fn run(name: &str) -> (Transaction, Vec<String>) {
    let (registry, log) = registered();
    let mut transaction = Transaction::new(name);
    registry.run_before_each(&mut transaction);
    (transaction, log.lines())
}

// ============================================================================
// SECTION: Scenarios
// ============================================================================

#[test]
fn gtg_transaction_is_skipped_and_logged() {
    let (transaction, lines) = run("Health > /__gtg/service");
    assert!(transaction.skip);
    assert_eq!(lines, vec!["skipping: Health > /__gtg/service".to_string()]);
}

#[test]
fn draft_content_transaction_is_skipped_and_logged() {
    let (transaction, lines) = run("Draft Content > Get article");
    assert!(transaction.skip);
    assert_eq!(lines, vec!["skipping: Draft Content > Get article".to_string()]);
}

#[test]
fn published_content_transaction_runs_silently() {
    let (transaction, lines) = run("Published Content > Get article");
    assert!(!transaction.skip);
    assert!(lines.is_empty());
}

#[test]
fn already_skipped_transaction_stays_skipped() {
    let (registry, log) = registered();
    let mut transaction = Transaction::new("Health > /__health");
    transaction.skip = true;
    registry.run_before_each(&mut transaction);
    assert!(transaction.skip);
    assert!(log.lines().is_empty());
}

#[test]
fn running_twice_matches_running_once() {
    let (registry, log) = registered();
    let mut once = Transaction::new("Draft Content > Write article");
    let mut twice = once.clone();
    registry.run_before_each(&mut once);
    registry.run_before_each(&mut twice);
    registry.run_before_each(&mut twice);
    assert_eq!(once.skip, twice.skip);
    assert_eq!(log.lines().len(), 3);
}

#[test]
fn batch_run_only_skips_matching_names() {
    let (registry, log) = registered();
    let mut batch = vec![
        Transaction::new("Health > /__health > Check health"),
        Transaction::new("Health > /__gtg > Good to go"),
        Transaction::new("Health > /__build-info > Build info"),
        Transaction::new("Draft Content > Read draft"),
    ];
    registry.run_before_each_all(&mut batch);
    let skipped: Vec<bool> = batch.iter().map(|transaction| transaction.skip).collect();
    assert_eq!(skipped, vec![false, true, false, true]);
    assert_eq!(
        log.lines(),
        vec![
            "skipping: Health > /__gtg > Good to go".to_string(),
            "skipping: Draft Content > Read draft".to_string(),
        ]
    );
}

#[test]
fn engine_json_transactions_default_skip_to_false() {
    let transaction: Transaction = serde_json::from_str(
        r#"{"name":"Draft Content > Get article","origin":{"resourceGroupName":"Draft Content"}}"#,
    )
    .unwrap();
    assert!(!transaction.skip);
    assert_eq!(transaction.origin.unwrap().resource_group_name, "Draft Content");
}

// ============================================================================
// SECTION: Properties
// ============================================================================

proptest! {
    #[test]
    fn any_gtg_prefixed_name_is_skipped(suffix in ".{0,48}") {
        let name = format!("Health > /__gtg{suffix}");
        let (transaction, lines) = run(&name);
        prop_assert!(transaction.skip);
        prop_assert_eq!(lines, vec![format!("skipping: {name}")]);
    }

    #[test]
    fn any_draft_content_prefixed_name_is_skipped(suffix in ".{0,48}") {
        let name = format!("Draft Content >{suffix}");
        let (transaction, lines) = run(&name);
        prop_assert!(transaction.skip);
        prop_assert_eq!(lines, vec![format!("skipping: {name}")]);
    }

    #[test]
    fn other_names_are_untouched(name in ".{0,64}") {
        prop_assume!(!is_excluded(&name));
        let (transaction, lines) = run(&name);
        prop_assert!(!transaction.skip);
        prop_assert!(lines.is_empty());
    }
}
