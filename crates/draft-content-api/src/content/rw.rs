// crates/draft-content-api/src/content/rw.rs
// ============================================================================
// Module: Draft Content RW
// Description: HTTP client for the draft content read/write store.
// Purpose: Read drafts through their validator and write native drafts.
// Dependencies: reqwest, serde_json, async-trait
// ============================================================================

//! ## Overview
//! Reads fetch the native draft, stamp it with the store's modification time
//! and write reference, and pass it through the validator for its media type.
//! Validator rejections are classified: 404 and 415 mean the media type is
//! not supported, 422 means the draft is invalid.
//! Writes forward the native body with its origin and media type unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use serde_json::Value;

use super::ContentError;
use super::LAST_MODIFIED_HEADER;
use super::ORIGIN_SYSTEM_ID_HEADER;
use super::WRITE_REQUEST_ID_HEADER;
use super::resolver::ValidatorResolver;
use crate::log::LogEvent;
use crate::log::LogSink;
use crate::platform::ExternalService;
use crate::platform::GtgError;
use crate::platform::PlatformService;
use crate::transaction_id::RequestContext;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Headers forwarded with a native draft write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftWriteHeaders {
    /// Origin system id of the draft.
    pub origin_system_id: String,
    /// Media type of the draft, parameters included.
    pub content_type: String,
}

// ============================================================================
// SECTION: Traits
// ============================================================================

/// Draft content store operations.
#[async_trait]
pub trait DraftContentRw: Send + Sync {
    /// Reads and validates the draft for `uuid`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::DraftNotFound`] when no draft exists, and other
    /// variants for validation and transport failures.
    async fn read(&self, context: &RequestContext, uuid: &str) -> Result<Vec<u8>, ContentError>;

    /// Writes a native draft for `uuid`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] when the store rejects or cannot take the write.
    async fn write(
        &self,
        context: &RequestContext,
        uuid: &str,
        body: Vec<u8>,
        headers: &DraftWriteHeaders,
    ) -> Result<(), ContentError>;
}

// ============================================================================
// SECTION: HTTP Client
// ============================================================================

/// Draft content store reached over HTTP.
pub struct HttpDraftContentRw {
    /// Upstream plumbing.
    service: PlatformService,
    /// Validators for read results.
    resolver: ValidatorResolver,
    /// Structured log sink.
    log: Arc<dyn LogSink>,
}

impl HttpDraftContentRw {
    /// Creates a store client.
    #[must_use]
    pub fn new(
        service: PlatformService,
        resolver: ValidatorResolver,
        log: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            service,
            resolver,
            log,
        }
    }

    /// Returns the store URL of the draft for `uuid`, shared by reads and writes.
    fn draft_url(&self, uuid: &str) -> String {
        format!("{}/drafts/content/{uuid}", self.service.endpoint())
    }

    /// Validates a stamped native draft.
    async fn validate(
        &self,
        context: &RequestContext,
        uuid: &str,
        native: Vec<u8>,
        content_type: &str,
    ) -> Result<Vec<u8>, ContentError> {
        let validator = self.resolver.validator_for(content_type).inspect_err(|err| {
            self.log.record(
                &LogEvent::error("draft_validator_missing", "unable to resolve validator")
                    .with_transaction_id(context.transaction_id())
                    .with_uuid(uuid)
                    .with_field("content_type", content_type)
                    .with_error(err),
            );
        })?;
        validator.validate(context, uuid, native, content_type).await.map_err(|err| match err {
            ContentError::Validator(rejection) => {
                self.log.record(
                    &LogEvent::warn("draft_validation_failed", "validator rejected draft")
                        .with_transaction_id(context.transaction_id())
                        .with_uuid(uuid)
                        .with_field("validator", validator.kind().as_str())
                        .with_field("status", rejection.status)
                        .with_error(&rejection),
                );
                match rejection.status {
                    404 | 415 => ContentError::DraftContentTypeNotSupported,
                    422 => ContentError::DraftNotValid,
                    _ => ContentError::Validator(rejection),
                }
            }
            other => other,
        })
    }
}

#[async_trait]
impl DraftContentRw for HttpDraftContentRw {
    async fn read(&self, context: &RequestContext, uuid: &str) -> Result<Vec<u8>, ContentError> {
        let url = self.draft_url(uuid);
        let response = self
            .service
            .request(Method::GET, &url, context)
            .send()
            .await
            .map_err(|err| ContentError::from_transport(&err))?;
        match response.status() {
            StatusCode::OK => {
                let headers = response.headers().clone();
                let body =
                    response.bytes().await.map_err(|err| ContentError::from_transport(&err))?;
                let native = stamp_native_draft(&body, &headers)?;
                let content_type = header_text(&headers, CONTENT_TYPE.as_str());
                self.validate(context, uuid, native, &content_type).await
            }
            StatusCode::NOT_FOUND => Err(ContentError::DraftNotFound),
            status => Err(ContentError::UnexpectedStatus(format!(
                "content RW returned an unexpected HTTP status code in read operation: {}",
                status.as_u16()
            ))),
        }
    }

    async fn write(
        &self,
        context: &RequestContext,
        uuid: &str,
        body: Vec<u8>,
        headers: &DraftWriteHeaders,
    ) -> Result<(), ContentError> {
        let url = self.draft_url(uuid);
        let response = self
            .service
            .request(Method::PUT, &url, context)
            .header(ORIGIN_SYSTEM_ID_HEADER, headers.origin_system_id.as_str())
            .header(CONTENT_TYPE, headers.content_type.as_str())
            .body(body)
            .send()
            .await
            .map_err(|err| ContentError::from_transport(&err))?;
        match response.status() {
            StatusCode::OK | StatusCode::CREATED => Ok(()),
            status => Err(ContentError::UnexpectedStatus(format!(
                "content RW returned an unexpected HTTP status code in write operation: {}",
                status.as_u16()
            ))),
        }
    }
}

#[async_trait]
impl ExternalService for HttpDraftContentRw {
    fn endpoint(&self) -> &str {
        self.service.endpoint()
    }

    async fn gtg(&self) -> Result<(), GtgError> {
        self.service.gtg().await
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Adds `lastModified` and `draftReference` to a native draft object.
fn stamp_native_draft(body: &[u8], headers: &HeaderMap) -> Result<Vec<u8>, ContentError> {
    let mut document: Value = serde_json::from_slice(body)
        .map_err(|err| ContentError::InvalidDocument(format!("invalid draft body: {err}")))?;
    let Some(object) = document.as_object_mut() else {
        return Err(ContentError::InvalidDocument(
            "invalid draft body: expected a JSON object".to_string(),
        ));
    };
    object.insert(
        "lastModified".to_string(),
        Value::String(header_text(headers, LAST_MODIFIED_HEADER)),
    );
    object.insert(
        "draftReference".to_string(),
        Value::String(header_text(headers, WRITE_REQUEST_ID_HEADER)),
    );
    serde_json::to_vec(&document)
        .map_err(|err| ContentError::InvalidDocument(format!("invalid draft body: {err}")))
}

/// Returns a header value as text, empty when absent or not visible ASCII.
fn header_text(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
        .unwrap_or_default()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
