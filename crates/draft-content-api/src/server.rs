// crates/draft-content-api/src/server.rs
// ============================================================================
// Module: Draft Content Server
// Description: HTTP router and server bootstrap for the draft content service.
// Purpose: Wire configuration into clients, handlers, and health checks.
// Dependencies: axum, tokio, reqwest, draft-content-config
// ============================================================================

//! ## Overview
//! [`DraftContentServer`] builds every upstream client from configuration,
//! binds them into the content handler and health service, and serves the
//! routes over HTTP:
//! - `GET /drafts/content/{uuid}`
//! - `PUT /drafts/nativecontent/{uuid}`
//! - `GET /__health`, `GET /__gtg`, `GET /__build-info`
//!
//! Every response carries the request's `X-Request-Id`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::put;
use draft_content_config::DraftContentApiConfig;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::content::ContentHandler;
use crate::content::DraftContentValidator;
use crate::content::HttpContentApi;
use crate::content::HttpDraftContentRw;
use crate::content::HttpDraftContentValidator;
use crate::content::ValidatorResolver;
use crate::content::WritePolicy;
use crate::health::BuildInfo;
use crate::health::GtgStatus;
use crate::health::HealthService;
use crate::log::LogEvent;
use crate::log::LogSink;
use crate::log::build_log_sink;
use crate::platform::ExternalService;
use crate::platform::PlatformService;
use crate::platform::build_http_client;
use crate::transaction_id::RequestContext;
use crate::transaction_id::TRANSACTION_ID_HEADER;

// ============================================================================
// SECTION: Server
// ============================================================================

/// Draft content HTTP server.
pub struct DraftContentServer {
    /// Address to bind when serving.
    bind: SocketAddr,
    /// Request body limit in bytes.
    max_body_bytes: usize,
    /// Shared handler state.
    state: Arc<AppState>,
}

impl DraftContentServer {
    /// Builds the server from configuration, logging to the configured sink.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration is invalid or a component
    /// cannot be initialized.
    pub fn from_config(config: &DraftContentApiConfig) -> Result<Self, ServerError> {
        let log =
            build_log_sink(&config.logging).map_err(|err| ServerError::Init(err.to_string()))?;
        Self::with_log_sink(config, log)
    }

    /// Builds the server from configuration with an explicit log sink.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration is invalid or a component
    /// cannot be initialized.
    pub fn with_log_sink(
        config: &DraftContentApiConfig,
        log: Arc<dyn LogSink>,
    ) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let bind = config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let client = build_http_client(&config.http_client)
            .map_err(|err| ServerError::Init(err.to_string()))?;

        let mut by_endpoint: BTreeMap<String, Arc<HttpDraftContentValidator>> = BTreeMap::new();
        let mut by_content_type: BTreeMap<String, Arc<dyn DraftContentValidator>> =
            BTreeMap::new();
        for (content_type, validator) in &config.validators {
            let service = PlatformService::new(&validator.endpoint, client.clone());
            let shared = Arc::clone(
                by_endpoint.entry(service.endpoint().to_string()).or_insert_with(|| {
                    Arc::new(HttpDraftContentValidator::new(validator.validator, service))
                }),
            );
            by_content_type.insert(content_type.clone(), shared);
        }
        let validator_services: Vec<Arc<dyn ExternalService>> = by_endpoint
            .into_values()
            .map(|validator| validator as Arc<dyn ExternalService>)
            .collect();

        let draft_rw = Arc::new(HttpDraftContentRw::new(
            PlatformService::new(&config.content_rw.endpoint, client.clone()),
            ValidatorResolver::new(by_content_type),
            Arc::clone(&log),
        ));
        let content_api = Arc::new(HttpContentApi::new(
            &config.content_api,
            PlatformService::new(&config.content_api.endpoint, client),
        ));

        let health = HealthService::new(
            &config.app,
            Arc::clone(&draft_rw) as Arc<dyn ExternalService>,
            Arc::clone(&content_api) as Arc<dyn ExternalService>,
            &config.health_checks,
            &validator_services,
            Arc::clone(&log),
        )
        .map_err(|err| ServerError::Init(err.to_string()))?;

        let handler = ContentHandler::new(
            content_api,
            draft_rw,
            Duration::from_millis(config.server.timeout_ms),
            WritePolicy::from_config(&config.content),
            Arc::clone(&log),
        );

        Ok(Self {
            bind,
            max_body_bytes: config.server.max_body_bytes,
            state: Arc::new(AppState {
                handler,
                health,
                log,
            }),
        })
    }

    /// Returns the configured bind address.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind
    }

    /// Overrides the bind address.
    #[must_use]
    pub const fn with_bind_addr(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    /// Builds the HTTP router.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.state), self.max_body_bytes)
    }

    /// Binds the configured address and serves until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when binding or serving fails.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.bind)
            .await
            .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))?;
        self.serve_listener(listener, shutdown).await
    }

    /// Serves on an already bound listener until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when serving fails.
    pub async fn serve_listener(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let local = listener
            .local_addr()
            .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))?;
        self.state.log.record(
            &LogEvent::info("server_listening", "draft content api listening")
                .with_field("bind", local.to_string()),
        );
        let app = self.router();
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|_| ServerError::Transport("http server failed".to_string()))
    }
}

// ============================================================================
// SECTION: Routing
// ============================================================================

/// Shared state for route handlers.
struct AppState {
    /// Content read and write operations.
    handler: ContentHandler,
    /// Health checks.
    health: HealthService,
    /// Structured log sink.
    log: Arc<dyn LogSink>,
}

/// Builds the router over shared state.
fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/drafts/content/{uuid}", get(read_content))
        .route("/drafts/nativecontent/{uuid}", put(write_native_content))
        .route("/__health", get(health))
        .route("/__gtg", get(gtg))
        .route("/__build-info", get(build_info))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Handles `GET /drafts/content/{uuid}`.
async fn read_content(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
) -> Response {
    let context = RequestContext::from_headers(&headers);
    let response = state.handler.read(&context, &uuid).await;
    with_transaction_id(response, &context)
}

/// Handles `PUT /drafts/nativecontent/{uuid}`.
async fn write_native_content(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let context = RequestContext::from_headers(&headers);
    let response = state.handler.write(&context, &uuid, &headers, body.to_vec()).await;
    with_transaction_id(response, &context)
}

/// Handles `GET /__health`.
async fn health(State(state): State<Arc<AppState>>) -> Response {
    Json(state.health.report().await).into_response()
}

/// Handles `GET /__gtg`.
async fn gtg(State(state): State<Arc<AppState>>) -> Response {
    let (status, message) = match state.health.gtg().await {
        GtgStatus::Ok => (StatusCode::OK, "OK".to_string()),
        GtgStatus::Failed(message) => (StatusCode::SERVICE_UNAVAILABLE, message),
    };
    (status, [(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=US-ASCII"))], message)
        .into_response()
}

/// Handles `GET /__build-info`.
async fn build_info() -> Response {
    Json(BuildInfo::current()).into_response()
}

/// Echoes the transaction id on a response.
fn with_transaction_id(mut response: Response, context: &RequestContext) -> Response {
    if let Ok(value) = HeaderValue::from_str(context.transaction_id()) {
        response.headers_mut().insert(TRANSACTION_ID_HEADER, value);
    }
    response
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server bootstrap and transport failures.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
