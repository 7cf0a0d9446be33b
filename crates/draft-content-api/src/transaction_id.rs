// crates/draft-content-api/src/transaction_id.rs
// ============================================================================
// Module: Transaction Ids
// Description: Request correlation ids carried in the X-Request-Id header.
// Purpose: Tag every inbound request and upstream call with one id.
// Dependencies: axum, rand
// ============================================================================

//! ## Overview
//! Each inbound request is bound to a transaction id, taken from the
//! `X-Request-Id` header or generated as `tid_` followed by ten random
//! lowercase alphanumerics. The id travels in a [`RequestContext`] to every
//! upstream call and is echoed on the response.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::http::HeaderMap;
use rand::Rng;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying the transaction id.
pub const TRANSACTION_ID_HEADER: &str = "X-Request-Id";

/// Prefix of generated transaction ids.
const GENERATED_PREFIX: &str = "tid_";

/// Number of random characters in a generated id.
const GENERATED_LEN: usize = 10;

/// Alphabet for generated ids.
const GENERATED_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Per-request context shared with upstream clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Transaction id for the request.
    transaction_id: String,
}

impl RequestContext {
    /// Creates a context with an explicit transaction id.
    #[must_use]
    pub fn new(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
        }
    }

    /// Creates a context from inbound headers, generating an id when absent.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let transaction_id = headers
            .get(TRANSACTION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or_else(new_transaction_id, ToString::to_string);
        Self {
            transaction_id,
        }
    }

    /// Returns the transaction id.
    #[must_use]
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Generates a fresh transaction id.
#[must_use]
pub fn new_transaction_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0 .. GENERATED_LEN)
        .map(|_| {
            let index = rng.gen_range(0 .. GENERATED_ALPHABET.len());
            char::from(GENERATED_ALPHABET.get(index).copied().unwrap_or(b'0'))
        })
        .collect();
    format!("{GENERATED_PREFIX}{suffix}")
}

// ============================================================================
// SECTION: Tests
// ============================================================================
