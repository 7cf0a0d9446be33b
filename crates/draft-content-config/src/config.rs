// crates/draft-content-config/src/config.rs
// ============================================================================
// Module: Draft Content API Configuration
// Description: Configuration loading and validation for the Draft Content API.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Upstream endpoints have no defaults: a config without them is rejected
//! rather than pointed at a guessed host.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "draft-content-api.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "DRAFT_CONTENT_API_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Minimum request processing timeout in milliseconds.
pub(crate) const MIN_REQUEST_TIMEOUT_MS: u64 = 10;
/// Maximum request processing timeout in milliseconds.
pub(crate) const MAX_REQUEST_TIMEOUT_MS: u64 = 60_000;
/// Maximum accepted request body size in bytes.
pub(crate) const MAX_BODY_BYTES_LIMIT: usize = 16 * 1024 * 1024;
/// Minimum outbound connect timeout in milliseconds.
pub(crate) const MIN_CONNECT_TIMEOUT_MS: u64 = 10;
/// Maximum outbound timeout in milliseconds.
pub(crate) const MAX_CLIENT_TIMEOUT_MS: u64 = 120_000;
/// Highest health check severity accepted.
pub(crate) const MAX_HEALTH_SEVERITY: u8 = 3;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Draft Content API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DraftContentApiConfig {
    /// Application identity.
    #[serde(default)]
    pub app: AppConfig,
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Draft content read/write store.
    #[serde(default)]
    pub content_rw: UpstreamConfig,
    /// Published Content API used as read fallback.
    #[serde(default)]
    pub content_api: ContentApiConfig,
    /// Outbound HTTP client settings.
    #[serde(default)]
    pub http_client: HttpClientConfig,
    /// Write admission policy.
    #[serde(default)]
    pub content: ContentPolicyConfig,
    /// Validators keyed by content type (without media-type parameters).
    #[serde(default)]
    pub validators: BTreeMap<String, ValidatorConfig>,
    /// Extra health checks bound to validator endpoints.
    #[serde(default)]
    pub health_checks: Vec<HealthCheckConfig>,
    /// Structured log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DraftContentApiConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.app.validate()?;
        self.server.validate()?;
        validate_endpoint("content_rw.endpoint", &self.content_rw.endpoint)?;
        self.content_api.validate()?;
        self.http_client.validate()?;
        self.content.validate()?;
        if self.validators.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one validator must be configured".to_string(),
            ));
        }
        for (content_type, validator) in &self.validators {
            validate_content_type_key(content_type)?;
            validate_endpoint(&format!("validators.{content_type}.endpoint"), &validator.endpoint)?;
        }
        let endpoints = self.validator_endpoints();
        for check in &self.health_checks {
            check.validate()?;
            if !endpoints.contains(&check.endpoint.trim_end_matches('/')) {
                return Err(ConfigError::Invalid(format!(
                    "health check {} references unknown endpoint {}",
                    check.id, check.endpoint
                )));
            }
        }
        self.logging.validate()
    }

    /// Returns the distinct validator endpoints, without trailing `/`, in a
    /// stable order. Health checks bind to validators through these.
    #[must_use]
    pub fn validator_endpoints(&self) -> Vec<&str> {
        let mut endpoints: Vec<&str> = self
            .validators
            .values()
            .map(|validator| validator.endpoint.trim_end_matches('/'))
            .collect();
        endpoints.sort_unstable();
        endpoints.dedup();
        endpoints
    }
}

/// Application identity reported by health endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// System code of the application.
    #[serde(default = "default_system_code")]
    pub system_code: String,
    /// Human-readable application name.
    #[serde(default = "default_app_name")]
    pub name: String,
    /// Short description.
    #[serde(default = "default_app_description")]
    pub description: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            system_code: default_system_code(),
            name: default_app_name(),
            description: default_app_description(),
        }
    }
}

impl AppConfig {
    /// Validates application identity.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.system_code.trim().is_empty() {
            return Err(ConfigError::Invalid("app.system_code must be set".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("app.name must be set".to_string()));
        }
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Deadline applied to each request's upstream work, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            timeout_ms: default_request_timeout_ms(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Validates server configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid("invalid bind address".to_string()))?;
        if !(MIN_REQUEST_TIMEOUT_MS ..= MAX_REQUEST_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "server.timeout_ms must be between {MIN_REQUEST_TIMEOUT_MS} and \
                 {MAX_REQUEST_TIMEOUT_MS}"
            )));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_body_bytes > MAX_BODY_BYTES_LIMIT {
            return Err(ConfigError::Invalid("max_body_bytes too large".to_string()));
        }
        Ok(())
    }

    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bind address is invalid.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("invalid bind address".to_string()))
    }
}

/// Plain upstream service location.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Base URL of the service.
    #[serde(default)]
    pub endpoint: String,
}

/// Published Content API location and credentials.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContentApiConfig {
    /// Base URL of the content collection, e.g. `https://api.example/content`.
    #[serde(default)]
    pub endpoint: String,
    /// Basic auth username.
    #[serde(default)]
    pub username: String,
    /// Basic auth password.
    #[serde(default)]
    pub password: String,
    /// Values sent as repeated `x-policy` headers.
    #[serde(default)]
    pub x_policies: Vec<String>,
}

impl ContentApiConfig {
    /// Validates Content API configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_endpoint("content_api.endpoint", &self.endpoint)?;
        if self.x_policies.iter().any(|policy| policy.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "content_api.x_policies entries must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outbound HTTP client settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpClientConfig {
    /// Overall request timeout in milliseconds.
    #[serde(default = "default_client_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// User agent sent on every outbound request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_client_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpClientConfig {
    /// Validates client configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.connect_timeout_ms < MIN_CONNECT_TIMEOUT_MS
            || self.connect_timeout_ms > MAX_CLIENT_TIMEOUT_MS
        {
            return Err(ConfigError::Invalid(
                "http_client.connect_timeout_ms out of range".to_string(),
            ));
        }
        if self.timeout_ms < self.connect_timeout_ms || self.timeout_ms > MAX_CLIENT_TIMEOUT_MS {
            return Err(ConfigError::Invalid("http_client.timeout_ms out of range".to_string()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("http_client.user_agent must be set".to_string()));
        }
        Ok(())
    }
}

/// Which origins and content types may write drafts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentPolicyConfig {
    /// Accepted `X-Origin-System-Id` values.
    #[serde(default = "default_allowed_origin_system_ids")]
    pub allowed_origin_system_ids: Vec<String>,
    /// Accepted `Content-Type` values, without media-type parameters.
    #[serde(default = "default_allowed_content_types")]
    pub allowed_content_types: Vec<String>,
}

impl Default for ContentPolicyConfig {
    fn default() -> Self {
        Self {
            allowed_origin_system_ids: default_allowed_origin_system_ids(),
            allowed_content_types: default_allowed_content_types(),
        }
    }
}

impl ContentPolicyConfig {
    /// Validates the write admission lists.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_origin_system_ids.is_empty() {
            return Err(ConfigError::Invalid(
                "content.allowed_origin_system_ids must not be empty".to_string(),
            ));
        }
        if self.allowed_content_types.is_empty() {
            return Err(ConfigError::Invalid(
                "content.allowed_content_types must not be empty".to_string(),
            ));
        }
        for content_type in &self.allowed_content_types {
            validate_content_type_key(content_type)?;
        }
        Ok(())
    }
}

/// Validator flavours. Both speak the same `/validate` contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKind {
    /// Spark content validator.
    Spark,
    /// Generic UPP validator.
    Upp,
}

impl ValidatorKind {
    /// Returns the configuration name of the flavour.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spark => "spark",
            Self::Upp => "upp",
        }
    }
}

/// Validator bound to one content type.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidatorConfig {
    /// Validator flavour.
    pub validator: ValidatorKind,
    /// Base URL of the validator.
    pub endpoint: String,
}

/// Extra health check probing a validator endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthCheckConfig {
    /// Endpoint of the validator this check probes.
    pub endpoint: String,
    /// Check identifier.
    pub id: String,
    /// Impact statement shown when failing.
    pub business_impact: String,
    /// Check name.
    pub name: String,
    /// Runbook URL.
    pub panic_guide: String,
    /// Severity, 1 (highest) to 3.
    pub severity: u8,
    /// Summary; `{endpoint}` is replaced with the endpoint.
    pub technical_summary: String,
    /// Service name used in check output.
    pub checker_name: String,
}

impl HealthCheckConfig {
    /// Validates a single health check entry.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::Invalid("health check id must be set".to_string()));
        }
        if self.severity == 0 || self.severity > MAX_HEALTH_SEVERITY {
            return Err(ConfigError::Invalid(format!(
                "health check {} severity must be between 1 and {MAX_HEALTH_SEVERITY}",
                self.id
            )));
        }
        Ok(())
    }

    /// Returns the technical summary with the endpoint substituted.
    #[must_use]
    pub fn rendered_technical_summary(&self) -> String {
        self.technical_summary.replace("{endpoint}", &self.endpoint)
    }
}

/// Log sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSinkType {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard log events.
    None,
}

/// Structured log configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Sink type.
    #[serde(default)]
    pub sink: LogSinkType,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl LoggingConfig {
    /// Validates log sink configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (LogSinkType::File, None) => {
                Err(ConfigError::Invalid("logging.sink=file requires logging.path".to_string()))
            }
            (LogSinkType::File, Some(path)) => validate_path(path),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Requires an absolute http(s) URL.
fn validate_endpoint(field: &str, endpoint: &str) -> Result<(), ConfigError> {
    if endpoint.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be set")));
    }
    let url = Url::parse(endpoint)
        .map_err(|_| ConfigError::Invalid(format!("{field} is not a valid url")))?;
    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(ConfigError::Invalid(format!("{field} must use http or https"))),
    }
    if url.host_str().is_none() {
        return Err(ConfigError::Invalid(format!("{field} requires a host")));
    }
    Ok(())
}

/// Content types are matched without parameters, so keys must not carry them.
fn validate_content_type_key(content_type: &str) -> Result<(), ConfigError> {
    if content_type.trim().is_empty() || content_type.contains(';') {
        return Err(ConfigError::Invalid(format!(
            "content type '{content_type}' must be a bare media type"
        )));
    }
    Ok(())
}

/// Default system code.
fn default_system_code() -> String {
    "draft-content-api".to_string()
}

/// Default application name.
fn default_app_name() -> String {
    "Draft Content API".to_string()
}

/// Default application description.
fn default_app_description() -> String {
    "Serves draft content for suggestions, falling back to published content".to_string()
}

/// Default bind address.
fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

/// Default request processing timeout.
const fn default_request_timeout_ms() -> u64 {
    8_000
}

/// Default maximum request body size.
const fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Default outbound request timeout.
const fn default_client_timeout_ms() -> u64 {
    10_000
}

/// Default outbound connect timeout.
const fn default_connect_timeout_ms() -> u64 {
    2_000
}

/// Default outbound user agent.
fn default_user_agent() -> String {
    format!("PAC-draft-content-api/{}", env!("CARGO_PKG_VERSION"))
}

/// Default accepted origin system ids.
fn default_allowed_origin_system_ids() -> Vec<String> {
    vec![
        "http://cmdb.ft.com/systems/cct".to_string(),
        "http://cmdb.ft.com/systems/spark-lists".to_string(),
        "http://cmdb.ft.com/systems/spark-clips".to_string(),
    ]
}

/// Default accepted content types.
fn default_allowed_content_types() -> Vec<String> {
    vec![
        "application/vnd.ft-upp-article+json".to_string(),
        "application/vnd.ft-upp-content-package+json".to_string(),
        "application/vnd.ft-upp-live-blog-post+json".to_string(),
        "application/vnd.ft-upp-live-blog-package+json".to_string(),
        "application/vnd.ft-upp-list+json".to_string(),
        "application/vnd.ft-upp-clip+json".to_string(),
        "application/vnd.ft-upp-clip-set+json".to_string(),
        "application/vnd.ft-upp-audio+json".to_string(),
    ]
}
