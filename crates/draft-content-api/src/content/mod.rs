// crates/draft-content-api/src/content/mod.rs
// ============================================================================
// Module: Content
// Description: Draft and published content clients plus the content handler.
// Purpose: Group upstream content access behind shared error types.
// Dependencies: thiserror, reqwest
// ============================================================================

//! ## Overview
//! Content flows through three upstream roles: the draft content store (RW),
//! validators that map native drafts into the published format, and the
//! Content API used as a fallback when no draft exists. [`ContentHandler`]
//! combines them into the HTTP read and write operations.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod api;
pub mod handler;
pub mod resolver;
pub mod rw;
pub mod transform;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use api::ContentApi;
pub use api::HttpContentApi;
pub use api::SYNTHETIC_CONTENT_UUID;
pub use handler::ContentHandler;
pub use handler::WritePolicy;
pub use resolver::ValidatorResolver;
pub use resolver::strip_media_type_parameters;
pub use rw::DraftContentRw;
pub use rw::DraftWriteHeaders;
pub use rw::HttpDraftContentRw;
pub use transform::TransformError;
pub use transform::transform_upp_content;
pub use validator::DraftContentValidator;
pub use validator::HttpDraftContentValidator;
pub use validator::ValidatorError;

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header naming the system a native draft originates from.
pub const ORIGIN_SYSTEM_ID_HEADER: &str = "X-Origin-System-Id";

/// RW response header carrying the draft modification time.
pub const LAST_MODIFIED_HEADER: &str = "Last-Modified-RFC3339";

/// RW response header carrying the id of the write that produced the draft.
pub const WRITE_REQUEST_ID_HEADER: &str = "Write-Request-Id";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Raw upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures while reading, validating, or writing content.
///
/// # Invariants
/// - Variants are stable for status-code mapping in the handler.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The draft store has no draft for the uuid.
    #[error("draft content not found in PAC")]
    DraftNotFound,
    /// The validator rejected the draft.
    #[error("draft content is invalid")]
    DraftNotValid,
    /// No validator accepts the draft's content type.
    #[error("draft content-type is invalid")]
    DraftContentTypeNotSupported,
    /// The upstream call or the request deadline timed out.
    #[error("request timed out: {0}")]
    Timeout(String),
    /// The upstream call failed in transport.
    #[error("{0}")]
    Transport(String),
    /// The upstream answered with an unexpected status.
    #[error("{0}")]
    UnexpectedStatus(String),
    /// A validator answered with a rejection.
    #[error(transparent)]
    Validator(#[from] ValidatorError),
    /// No validator is configured for the content type.
    #[error("no validator configured for contentType: {0}")]
    NoValidator(String),
    /// An upstream document could not be decoded or re-encoded.
    #[error("{0}")]
    InvalidDocument(String),
}

impl ContentError {
    /// Returns true when the error represents a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Classifies a transport failure from the HTTP client.
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
