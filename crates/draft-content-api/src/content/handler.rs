// crates/draft-content-api/src/content/handler.rs
// ============================================================================
// Module: Content Handler
// Description: Read and write operations behind the content routes.
// Purpose: Map upstream outcomes onto HTTP responses.
// Dependencies: axum, tokio, uuid, serde_json, draft-content-config
// ============================================================================

//! ## Overview
//! Reads try the draft store first and fall back to published content when
//! no draft exists; the fallback shares the original request deadline.
//! Writes pass admission checks (uuid, origin system, media type) before the
//! native body is forwarded to the store. Every failure is answered with a
//! `{"message": ...}` JSON body.
//!
//! Status mapping for reads:
//! - draft timeout: 504
//! - draft rejected by its validator: 422
//! - draft missing: published content, or the published status code
//! - published 504: 500
//! - anything else: 500

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use draft_content_config::ContentPolicyConfig;
use serde_json::Value;
use serde_json::json;
use tokio::time::Instant;
use tokio::time::timeout_at;

use super::ContentError;
use super::ORIGIN_SYSTEM_ID_HEADER;
use super::api::ContentApi;
use super::resolver::strip_media_type_parameters;
use super::rw::DraftContentRw;
use super::rw::DraftWriteHeaders;
use super::transform::transform_upp_content;
use crate::log::LogEvent;
use crate::log::LogSink;
use crate::transaction_id::RequestContext;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Media type of every handler response body.
const APPLICATION_JSON: &str = "application/json";

// ============================================================================
// SECTION: Write Policy
// ============================================================================

/// Admission rules for native draft writes.
#[derive(Debug, Clone, Default)]
pub struct WritePolicy {
    /// Accepted `X-Origin-System-Id` values.
    allowed_origin_system_ids: BTreeSet<String>,
    /// Accepted media types, without parameters.
    allowed_content_types: BTreeSet<String>,
}

impl WritePolicy {
    /// Creates a policy from explicit allow lists.
    #[must_use]
    pub fn new(
        allowed_origin_system_ids: impl IntoIterator<Item = String>,
        allowed_content_types: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            allowed_origin_system_ids: allowed_origin_system_ids.into_iter().collect(),
            allowed_content_types: allowed_content_types.into_iter().collect(),
        }
    }

    /// Creates a policy from configuration.
    #[must_use]
    pub fn from_config(config: &ContentPolicyConfig) -> Self {
        Self::new(
            config.allowed_origin_system_ids.iter().cloned(),
            config.allowed_content_types.iter().cloned(),
        )
    }

    /// Returns true when the origin system id is accepted.
    #[must_use]
    pub fn allows_origin(&self, origin_system_id: &str) -> bool {
        self.allowed_origin_system_ids.contains(origin_system_id)
    }

    /// Returns true when the media type (parameters ignored) is accepted.
    #[must_use]
    pub fn allows_content_type(&self, content_type: &str) -> bool {
        self.allowed_content_types.contains(strip_media_type_parameters(content_type))
    }
}

// ============================================================================
// SECTION: Handler
// ============================================================================

/// Content read and write operations.
pub struct ContentHandler {
    /// Published content fallback.
    content_api: Arc<dyn ContentApi>,
    /// Draft content store.
    draft_rw: Arc<dyn DraftContentRw>,
    /// Deadline applied to each request.
    timeout: Duration,
    /// Write admission rules.
    policy: WritePolicy,
    /// Structured log sink.
    log: Arc<dyn LogSink>,
}

impl ContentHandler {
    /// Creates a handler.
    #[must_use]
    pub fn new(
        content_api: Arc<dyn ContentApi>,
        draft_rw: Arc<dyn DraftContentRw>,
        timeout: Duration,
        policy: WritePolicy,
        log: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            content_api,
            draft_rw,
            timeout,
            policy,
            log,
        }
    }

    /// Reads the draft for `uuid`, falling back to published content.
    pub async fn read(&self, context: &RequestContext, uuid: &str) -> Response {
        let deadline = Instant::now() + self.timeout;
        let result = timeout_at(deadline, self.draft_rw.read(context, uuid))
            .await
            .unwrap_or_else(|_| Err(ContentError::Timeout("draft content read".to_string())));

        match result {
            Ok(body) => {
                self.log.record(
                    &LogEvent::info("draft_read", "draft content served")
                        .with_transaction_id(context.transaction_id())
                        .with_uuid(uuid),
                );
                json_response(StatusCode::OK, body)
            }
            Err(err) if err.is_timeout() => {
                self.log_read_failure(context, uuid, &err);
                read_failure(StatusCode::GATEWAY_TIMEOUT)
            }
            Err(ContentError::DraftNotValid | ContentError::DraftContentTypeNotSupported) => {
                read_failure(StatusCode::UNPROCESSABLE_ENTITY)
            }
            Err(ContentError::DraftNotFound) => self.read_published(context, uuid, deadline).await,
            Err(err) => {
                self.log_read_failure(context, uuid, &err);
                read_failure(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    /// Serves published content for `uuid` within the original deadline.
    async fn read_published(
        &self,
        context: &RequestContext,
        uuid: &str,
        deadline: Instant,
    ) -> Response {
        self.log.record(
            &LogEvent::warn("draft_fallback", "draft not found in PAC, trying UPP")
                .with_transaction_id(context.transaction_id())
                .with_uuid(uuid),
        );
        let upstream = timeout_at(deadline, self.content_api.get(context, uuid))
            .await
            .unwrap_or_else(|_| Err(ContentError::Timeout("content API read".to_string())));
        let upstream = match upstream {
            Ok(upstream) => upstream,
            Err(err) => {
                self.log_fallback_failure(context, uuid, "error in calling Content API", &err);
                let status = if err.is_timeout() {
                    StatusCode::GATEWAY_TIMEOUT
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                return message_response(status, &err.to_string());
            }
        };

        match upstream.status {
            200 => {}
            504 => {
                return message_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    read_message(StatusCode::GATEWAY_TIMEOUT),
                );
            }
            other => {
                let status =
                    StatusCode::from_u16(other).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                return read_failure(status);
            }
        }

        match reshape_published(&upstream.body) {
            Ok(body) => json_response(StatusCode::OK, body),
            Err(err) => {
                self.log_fallback_failure(context, uuid, "failed transforming UPP response", &err);
                message_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
            }
        }
    }

    /// Validates and forwards a native draft write.
    pub async fn write(
        &self,
        context: &RequestContext,
        uuid: &str,
        headers: &HeaderMap,
        body: Vec<u8>,
    ) -> Response {
        if let Err(err) = uuid::Uuid::parse_str(uuid) {
            self.log_write_rejection(context, uuid, "invalid content UUID", &err);
            return message_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid content UUID: {uuid}"),
            );
        }

        let origin_system_id = header_text(headers, ORIGIN_SYSTEM_ID_HEADER);
        if !self.policy.allows_origin(&origin_system_id) {
            let reason = format!(
                "unsupported or missing value for X-Origin-System-Id: {origin_system_id}"
            );
            self.log_write_rejection(context, uuid, "invalid origin system id", &reason);
            return message_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid origin system id: {origin_system_id}"),
            );
        }

        let content_type = header_text(headers, CONTENT_TYPE.as_str());
        if !self.policy.allows_content_type(&content_type) {
            let reason = format!("unsupported or missing value for Content-Type: {content_type}");
            self.log_write_rejection(context, uuid, "invalid content type", &reason);
            return message_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid content type: {content_type}"),
            );
        }

        self.log.record(
            &LogEvent::info("draft_write", "write native content to content RW")
                .with_transaction_id(context.transaction_id())
                .with_uuid(uuid)
                .with_field("content_type", content_type.as_str()),
        );
        let draft_headers = DraftWriteHeaders {
            origin_system_id,
            content_type,
        };
        let deadline = Instant::now() + self.timeout;
        let result = timeout_at(deadline, self.draft_rw.write(context, uuid, body, &draft_headers))
            .await
            .unwrap_or_else(|_| Err(ContentError::Timeout("draft content write".to_string())));

        match result {
            Ok(()) => StatusCode::OK.into_response(),
            Err(err) => {
                self.log.record(
                    &LogEvent::error("draft_write_failed", "error in writing draft content")
                        .with_transaction_id(context.transaction_id())
                        .with_uuid(uuid)
                        .with_error(&err),
                );
                let status = if err.is_timeout() {
                    StatusCode::GATEWAY_TIMEOUT
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                message_response(status, &format!("Error in writing draft content: {err}"))
            }
        }
    }

    /// Logs a failed draft read.
    fn log_read_failure(&self, context: &RequestContext, uuid: &str, err: &ContentError) {
        self.log.record(
            &LogEvent::error("draft_read_failed", "error reading draft content")
                .with_transaction_id(context.transaction_id())
                .with_uuid(uuid)
                .with_error(err),
        );
    }

    /// Logs a failed published-content fallback.
    fn log_fallback_failure(
        &self,
        context: &RequestContext,
        uuid: &str,
        message: &str,
        err: &impl std::fmt::Display,
    ) {
        self.log.record(
            &LogEvent::error("draft_fallback_failed", message)
                .with_transaction_id(context.transaction_id())
                .with_uuid(uuid)
                .with_error(err),
        );
    }

    /// Logs a rejected write.
    fn log_write_rejection(
        &self,
        context: &RequestContext,
        uuid: &str,
        message: &str,
        err: &impl std::fmt::Display,
    ) {
        self.log.record(
            &LogEvent::error("draft_write_rejected", message)
                .with_transaction_id(context.transaction_id())
                .with_uuid(uuid)
                .with_error(err),
        );
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes, transforms and re-encodes published content.
fn reshape_published(body: &[u8]) -> Result<Vec<u8>, ContentError> {
    let mut document: Value = serde_json::from_slice(body)
        .map_err(|err| ContentError::InvalidDocument(err.to_string()))?;
    let Some(object) = document.as_object_mut() else {
        return Err(ContentError::InvalidDocument(
            "published content is not a JSON object".to_string(),
        ));
    };
    transform_upp_content(object).map_err(|err| ContentError::InvalidDocument(err.to_string()))?;
    serde_json::to_vec(&document).map_err(|err| ContentError::InvalidDocument(err.to_string()))
}

/// Returns the read failure message for a status.
const fn read_message(status: StatusCode) -> &'static str {
    match status.as_u16() {
        404 => "Draft not found",
        422 => "Draft cannot be mapped into UPP format",
        504 => "Draft content request processing has timed out",
        _ => "Error reading draft content",
    }
}

/// Builds a read failure response for a status.
fn read_failure(status: StatusCode) -> Response {
    message_response(status, read_message(status))
}

/// Builds a `{"message": ...}` response.
pub(crate) fn message_response(status: StatusCode, message: &str) -> Response {
    let body = json!({ "message": message }).to_string();
    json_response(status, body.into_bytes())
}

/// Builds a JSON response from raw bytes.
fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    (status, [(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))], body).into_response()
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
