// crates/draft-content-api/src/content/validator.rs
// ============================================================================
// Module: Draft Validators
// Description: HTTP clients for draft validation and mapping services.
// Purpose: Turn native drafts into published-format JSON or reject them.
// Dependencies: reqwest, serde_json, async-trait, draft-content-config
// ============================================================================

//! ## Overview
//! A validator receives a native draft at `POST <endpoint>/validate` and
//! answers with the mapped document. Rejections (400, 415, 422) carry an
//! `{"error": ...}` body that is surfaced as a [`ValidatorError`] keeping the
//! upstream status so callers can classify it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use draft_content_config::ValidatorKind;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use thiserror::Error;

use super::ContentError;
use crate::platform::ExternalService;
use crate::platform::GtgError;
use crate::platform::PlatformService;
use crate::transaction_id::RequestContext;

// ============================================================================
// SECTION: Traits
// ============================================================================

/// Validates native drafts.
#[async_trait]
pub trait DraftContentValidator: Send + Sync {
    /// Returns the validator base URL.
    fn endpoint(&self) -> &str;

    /// Returns the validator family.
    fn kind(&self) -> ValidatorKind;

    /// Validates a native draft and returns the mapped document.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Validator`] for rejections and other variants
    /// for transport failures.
    async fn validate(
        &self,
        context: &RequestContext,
        uuid: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<Vec<u8>, ContentError>;
}

// ============================================================================
// SECTION: HTTP Validator
// ============================================================================

/// Validator reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDraftContentValidator {
    /// Validator family.
    kind: ValidatorKind,
    /// Upstream plumbing.
    service: PlatformService,
}

impl HttpDraftContentValidator {
    /// Creates a validator client.
    #[must_use]
    pub const fn new(kind: ValidatorKind, service: PlatformService) -> Self {
        Self {
            kind,
            service,
        }
    }
}

#[async_trait]
impl DraftContentValidator for HttpDraftContentValidator {
    fn endpoint(&self) -> &str {
        self.service.endpoint()
    }

    fn kind(&self) -> ValidatorKind {
        self.kind
    }

    async fn validate(
        &self,
        context: &RequestContext,
        uuid: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<Vec<u8>, ContentError> {
        let url = format!("{}/validate", self.service.endpoint());
        let response = self
            .service
            .request(Method::POST, &url, context)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|err| ContentError::from_transport(&err))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|err| ContentError::from_transport(&err))?;
        match status {
            StatusCode::OK => Ok(bytes.to_vec()),
            StatusCode::BAD_REQUEST
            | StatusCode::UNSUPPORTED_MEDIA_TYPE
            | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(rejection(status.as_u16(), uuid, content_type, &bytes).into())
            }
            other => Err(ValidatorError::new(
                other.as_u16(),
                format!(
                    "UPP Validator returned an unexpected HTTP status code in write operation: {}",
                    other.as_u16()
                ),
            )
            .into()),
        }
    }
}

#[async_trait]
impl ExternalService for HttpDraftContentValidator {
    fn endpoint(&self) -> &str {
        self.service.endpoint()
    }

    async fn gtg(&self) -> Result<(), GtgError> {
        self.service.gtg().await
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Validator rejection carrying the upstream status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidatorError {
    /// Upstream HTTP status code.
    pub status: u16,
    /// Rejection description.
    pub message: String,
}

impl ValidatorError {
    /// Creates a validator error.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the error for a rejection response body.
fn rejection(status: u16, uuid: &str, content_type: &str, body: &[u8]) -> ValidatorError {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => {
            let reason = match map.get("error") {
                Some(Value::String(reason)) => reason.clone(),
                Some(other) => other.to_string(),
                None => "unknown".to_string(),
            };
            ValidatorError::new(
                status,
                format!(
                    "Content with uuid: {uuid}, content-type: {content_type} has failed \
                     validation/mapping with reason: {reason}"
                ),
            )
        }
        Ok(_) => ValidatorError::new(
            status,
            format!(
                "Validation has failed for uuid: {uuid} but couldn't unmarshal response body, \
                 error: expected a JSON object"
            ),
        ),
        Err(err) => ValidatorError::new(
            status,
            format!(
                "Validation has failed for uuid: {uuid} but couldn't unmarshal response body, \
                 error: {err}"
            ),
        ),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
