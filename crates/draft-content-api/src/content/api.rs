// crates/draft-content-api/src/content/api.rs
// ============================================================================
// Module: Content API Client
// Description: HTTP client for published content.
// Purpose: Fetch published content when no draft exists.
// Dependencies: reqwest, async-trait, draft-content-config
// ============================================================================

//! ## Overview
//! The Content API serves published content at `<endpoint>/<uuid>` behind
//! basic auth. Configured policies are sent as repeated `x-policy` headers.
//! Readiness is probed by fetching a well-known piece of synthetic content.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use draft_content_config::ContentApiConfig;
use reqwest::Method;

use super::ContentError;
use super::UpstreamResponse;
use crate::platform::ExternalService;
use crate::platform::GtgError;
use crate::platform::PlatformService;
use crate::platform::check_gtg;
use crate::transaction_id::RequestContext;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Uuid of the synthetic content used for readiness probes.
pub const SYNTHETIC_CONTENT_UUID: &str = "4f2f97ea-b8ec-11e4-b8e6-00144feab7de";

/// Header carrying a content access policy.
const X_POLICY_HEADER: &str = "x-policy";

// ============================================================================
// SECTION: Traits
// ============================================================================

/// Published content source.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Fetches published content for `uuid`, whatever the upstream status.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] only for transport failures.
    async fn get(
        &self,
        context: &RequestContext,
        uuid: &str,
    ) -> Result<UpstreamResponse, ContentError>;
}

// ============================================================================
// SECTION: HTTP Client
// ============================================================================

/// Content API reached over HTTP.
pub struct HttpContentApi {
    /// Upstream plumbing.
    service: PlatformService,
    /// Basic auth username.
    username: String,
    /// Basic auth password.
    password: String,
    /// Policies sent as `x-policy` headers.
    x_policies: Vec<String>,
}

impl HttpContentApi {
    /// Creates a Content API client from configuration.
    #[must_use]
    pub fn new(config: &ContentApiConfig, service: PlatformService) -> Self {
        Self {
            service,
            username: config.username.clone(),
            password: config.password.clone(),
            x_policies: config.x_policies.clone(),
        }
    }

    /// Returns the URL of the content with `uuid`.
    fn content_url(&self, uuid: &str) -> String {
        format!("{}/{uuid}", self.service.endpoint())
    }
}

#[async_trait]
impl ContentApi for HttpContentApi {
    async fn get(
        &self,
        context: &RequestContext,
        uuid: &str,
    ) -> Result<UpstreamResponse, ContentError> {
        let url = self.content_url(uuid);
        let mut request = self
            .service
            .request(Method::GET, &url, context)
            .basic_auth(&self.username, Some(&self.password));
        for policy in &self.x_policies {
            request = request.header(X_POLICY_HEADER, policy.as_str());
        }
        let response = request.send().await.map_err(|err| ContentError::from_transport(&err))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|err| ContentError::from_transport(&err))?;
        Ok(UpstreamResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[async_trait]
impl ExternalService for HttpContentApi {
    fn endpoint(&self) -> &str {
        self.service.endpoint()
    }

    async fn gtg(&self) -> Result<(), GtgError> {
        let url = self.content_url(SYNTHETIC_CONTENT_UUID);
        check_gtg(self.service.probe(&url).basic_auth(&self.username, Some(&self.password))).await
    }
}
