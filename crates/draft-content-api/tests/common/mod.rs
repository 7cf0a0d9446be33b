// crates/draft-content-api/tests/common/mod.rs
// =============================================================================
// Module: Service Test Helpers
// Description: Upstream stubs, configs, and a locally served service.
// Purpose: Share fixtures across draft-content-api integration suites.
// =============================================================================

#![allow(
    dead_code,
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test helpers are selectively used across suites and fail loudly."
)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::response::Response;
use draft_content_api::DraftContentServer;
use draft_content_api::LogSink;
use draft_content_api::MemoryLogSink;
use draft_content_config::DraftContentApiConfig;
use tokio::sync::oneshot;

// ============================================================================
// SECTION: Upstream Stubs
// ============================================================================

/// Request captured by a stub upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Headers keyed by lowercase name; repeated headers are joined by ", ".
    pub headers: BTreeMap<String, String>,
    /// Request body as text.
    pub body: String,
}

impl RecordedRequest {
    /// Returns a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// Reply served by a stub upstream.
#[derive(Debug, Clone)]
pub struct StubReply {
    /// HTTP status code.
    pub status: u16,
    /// Extra response headers.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: String,
    /// Delay before replying.
    pub delay: Duration,
}

impl StubReply {
    /// Reply with a status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    /// Adds a response header.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Delays the reply.
    pub const fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Decides the reply for each captured request.
type Responder = Arc<dyn Fn(&RecordedRequest) -> StubReply + Send + Sync>;

/// Shared stub state.
struct StubState {
    /// Reply function.
    responder: Responder,
    /// Captured requests.
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Upstream stub served on an ephemeral port.
pub struct StubUpstream {
    /// Base URL of the stub.
    pub base_url: String,
    /// Captured requests.
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Shutdown trigger.
    shutdown: Option<oneshot::Sender<()>>,
}

impl StubUpstream {
    /// Returns every captured request.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Returns captured requests whose path equals `path`.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|request| request.path == path).collect()
    }
}

impl Drop for StubUpstream {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Captures a request and answers with the responder's reply.
async fn stub_handler(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut captured: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in &headers {
        let value = value.to_str().unwrap_or_default().to_string();
        captured
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    let request = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers: captured,
        body: String::from_utf8_lossy(&body).to_string(),
    };
    state.requests.lock().unwrap().push(request.clone());
    let reply = (state.responder)(&request);
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    let mut response =
        (StatusCode::from_u16(reply.status).unwrap(), reply.body).into_response();
    for (name, value) in reply.headers {
        response.headers_mut().insert(
            axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
            axum::http::HeaderValue::from_str(&value).unwrap(),
        );
    }
    response
}

/// Spawns a stub upstream answering every request with `responder`.
pub async fn spawn_stub(
    responder: impl Fn(&RecordedRequest) -> StubReply + Send + Sync + 'static,
) -> StubUpstream {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = Arc::new(StubState {
        responder: Arc::new(responder),
        requests: Arc::clone(&requests),
    });
    let app = Router::new().fallback(stub_handler).with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await;
    });
    StubUpstream {
        base_url: format!("http://{addr}"),
        requests,
        shutdown: Some(shutdown_tx),
    }
}

/// Spawns a stub that answers every request with the same status and body.
pub async fn spawn_static_stub(status: u16, body: &str) -> StubUpstream {
    let body = body.to_string();
    spawn_stub(move |_| StubReply::new(status, body.clone())).await
}

// ============================================================================
// SECTION: Config
// ============================================================================

/// Media type used by the test validator binding.
pub const ARTICLE_TYPE: &str = "application/vnd.ft-upp-article+json";

/// Origin system accepted by default configuration.
pub const CCT_ORIGIN: &str = "http://cmdb.ft.com/systems/cct";

/// Builds a config pointing at the given upstreams.
pub fn service_config(
    rw: &str,
    content_api: &str,
    validator: &str,
    timeout_ms: u64,
) -> DraftContentApiConfig {
    let toml = format!(
        r#"
[server]
bind = "127.0.0.1:0"
timeout_ms = {timeout_ms}
max_body_bytes = 4096

[content_rw]
endpoint = "{rw}"

[content_api]
endpoint = "{content_api}/content"
username = "capi-user"
password = "capi-pass"
x_policies = ["INTERNAL_UNSTABLE", "EXPAND_IMAGES"]

[http_client]
timeout_ms = 5000
connect_timeout_ms = 500

[validators."{ARTICLE_TYPE}"]
validator = "spark"
endpoint = "{validator}"

[[health_checks]]
endpoint = "{validator}"
id = "check-article-validator"
business_impact = "Articles cannot be validated"
name = "Article validator"
panic_guide = "https://runbooks.in.ft.com/draft-content-api"
severity = 2
technical_summary = "Validator is not available at {{endpoint}}"
checker_name = "Article validator"

[logging]
sink = "none"
"#
    );
    toml::from_str(&toml).expect("service config")
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Locally served draft content service.
pub struct ServiceHandle {
    /// Base URL of the service.
    pub base_url: String,
    /// Captured service log events.
    pub log: Arc<MemoryLogSink>,
    /// Shutdown trigger.
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for ServiceHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Serves the service for `config` on an ephemeral port.
pub async fn spawn_service(config: &DraftContentApiConfig) -> ServiceHandle {
    let log = Arc::new(MemoryLogSink::new());
    let server = DraftContentServer::with_log_sink(config, Arc::clone(&log) as Arc<dyn LogSink>)
        .expect("server");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr: SocketAddr = listener.local_addr().expect("addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let _ = server
            .serve_listener(listener, async move {
                let _ = shutdown_rx.await;
            })
            .await;
    });
    ServiceHandle {
        base_url: format!("http://{addr}"),
        log,
        shutdown: Some(shutdown_tx),
    }
}

/// HTTP client for calling the service under test.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().timeout(Duration::from_secs(10)).build().expect("client")
}
