// crates/draft-content-hooks/src/transaction.rs
// ============================================================================
// Module: Transactions
// Description: Engine-owned test transactions handed to hooks.
// Purpose: Model the fields hooks read and the skip flag they may set.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Transaction`] is built by the test engine for a single request/response
//! check and lives for one execution. Hooks may only flip [`Transaction::skip`];
//! the engine reads it after the hooks return.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A single generated contract-test case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Case identifier, e.g. `"Draft Content > Get article"`.
    pub name: String,
    /// Set to skip execution of this case. Defaults to `false`.
    #[serde(default)]
    pub skip: bool,
    /// Blueprint location of the case when the engine supplies it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<TransactionOrigin>,
}

/// Where in the API blueprint a transaction was generated from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOrigin {
    /// Blueprint API name.
    #[serde(default)]
    pub api_name: String,
    /// Resource group heading, e.g. `"Health"`.
    #[serde(default)]
    pub resource_group_name: String,
    /// Resource heading, e.g. `"/__gtg"`.
    #[serde(default)]
    pub resource_name: String,
    /// Action heading.
    #[serde(default)]
    pub action_name: String,
}

impl Transaction {
    /// Creates a transaction that is not yet skipped.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            skip: false,
            origin: None,
        }
    }

    /// Attaches the blueprint origin.
    #[must_use]
    pub fn with_origin(mut self, origin: TransactionOrigin) -> Self {
        self.origin = Some(origin);
        self
    }
}
