// crates/draft-content-api/src/platform.rs
// ============================================================================
// Module: Platform Services
// Description: Shared HTTP plumbing for upstream platform services.
// Purpose: Build the upstream client and probe services for good-to-go.
// Dependencies: reqwest, async-trait, draft-content-config
// ============================================================================

//! ## Overview
//! Every upstream (draft content store, Content API, validators) is reached
//! through a [`PlatformService`]: a normalized base URL plus the shared async
//! HTTP client. Services expose a good-to-go probe through
//! [`ExternalService`], which health checks consume.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use draft_content_config::HttpClientConfig;
use reqwest::Client;
use reqwest::Method;
use reqwest::RequestBuilder;
use reqwest::Response;
use reqwest::StatusCode;
use thiserror::Error;

use crate::transaction_id::RequestContext;
use crate::transaction_id::TRANSACTION_ID_HEADER;

// ============================================================================
// SECTION: Traits
// ============================================================================

/// Upstream service that can be probed for readiness.
#[async_trait]
pub trait ExternalService: Send + Sync {
    /// Returns the service base URL.
    fn endpoint(&self) -> &str;

    /// Probes the service for readiness.
    ///
    /// # Errors
    ///
    /// Returns [`GtgError`] when the service is not good-to-go.
    async fn gtg(&self) -> Result<(), GtgError>;
}

// ============================================================================
// SECTION: Platform Service
// ============================================================================

/// Base URL and client for a single upstream.
///
/// # Invariants
/// - Endpoint is normalized without a trailing slash.
#[derive(Debug, Clone)]
pub struct PlatformService {
    /// Upstream base URL (no trailing slash).
    endpoint: String,
    /// Shared HTTP client.
    client: Client,
}

impl PlatformService {
    /// Creates a platform service for the endpoint.
    #[must_use]
    pub fn new(endpoint: &str, client: Client) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Returns the upstream base URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Starts a request to `url` tagged with the request's transaction id.
    pub(crate) fn request(
        &self,
        method: Method,
        url: &str,
        context: &RequestContext,
    ) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(TRANSACTION_ID_HEADER, context.transaction_id())
    }

    /// Starts an untagged request to `url`.
    pub(crate) fn probe(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    /// Probes `<endpoint>/__gtg`.
    ///
    /// # Errors
    ///
    /// Returns [`GtgError`] when the probe fails or returns non-200.
    pub async fn gtg(&self) -> Result<(), GtgError> {
        let url = format!("{}/__gtg", self.endpoint);
        check_gtg(self.probe(&url)).await
    }
}

#[async_trait]
impl ExternalService for PlatformService {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn gtg(&self) -> Result<(), GtgError> {
        Self::gtg(self).await
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Good-to-go probe failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GtgError {
    /// The probe could not be delivered.
    #[error("gtg call error: {0}")]
    Request(String),
    /// The probe returned a non-200 status.
    #[error("gtg returned a non-200 HTTP status: {status} - {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },
    /// The probe returned a non-200 status and its body was unreadable.
    #[error("gtg returned a non-200 HTTP status: {0}")]
    UnreadableStatus(u16),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Sends a probe request and interprets the response.
///
/// # Errors
///
/// Returns [`GtgError`] for transport failures and non-200 responses.
pub(crate) async fn check_gtg(request: RequestBuilder) -> Result<(), GtgError> {
    let response = request.send().await.map_err(|err| GtgError::Request(err.to_string()))?;
    gtg_from_response(response).await
}

/// Maps a probe response to a readiness result.
async fn gtg_from_response(response: Response) -> Result<(), GtgError> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(());
    }
    match response.text().await {
        Ok(body) => Err(GtgError::Status {
            status: status.as_u16(),
            body,
        }),
        Err(_) => Err(GtgError::UnreadableStatus(status.as_u16())),
    }
}

/// Builds the shared upstream HTTP client.
///
/// # Errors
///
/// Returns [`reqwest::Error`] when the client cannot be constructed.
pub fn build_http_client(config: &HttpClientConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
        .timeout(Duration::from_millis(config.timeout_ms))
        .user_agent(config.user_agent.clone())
        .build()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
