// crates/draft-content-api/src/health.rs
// ============================================================================
// Module: Health
// Description: Health report, good-to-go and build-info for the service.
// Purpose: Report upstream readiness in the FT health check format.
// Dependencies: tokio, serde, time, draft-content-config
// ============================================================================

//! ## Overview
//! Health is made of checks, each probing one upstream through
//! [`ExternalService::gtg`]. Two checks are built in (draft content store and
//! Content API); configured checks bind to validators by endpoint. The health
//! report runs every check concurrently under a deadline, while good-to-go
//! stops at the first failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use draft_content_config::AppConfig;
use draft_content_config::HealthCheckConfig;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio::time::timeout_at;

use crate::log::LogEvent;
use crate::log::LogSink;
use crate::platform::ExternalService;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Deadline for a full health report.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Runbook for the built-in checks.
const PANIC_GUIDE: &str = "https://runbooks.in.ft.com/draft-content-api";

/// Health report schema version.
const SCHEMA_VERSION: u8 = 1;

// ============================================================================
// SECTION: Checks
// ============================================================================

/// A single readiness check against an upstream.
pub struct HealthCheck {
    /// Stable check id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Impact of a failure.
    pub business_impact: String,
    /// Runbook URL.
    pub panic_guide: String,
    /// Severity (1 is most severe).
    pub severity: u8,
    /// Technical summary of a failure.
    pub technical_summary: String,
    /// Name used in check output.
    checker_name: String,
    /// Probed upstream.
    service: Arc<dyn ExternalService>,
}

impl HealthCheck {
    /// Runs the check.
    async fn run(&self, log: &dyn LogSink) -> CheckOutcome {
        match self.service.gtg().await {
            Ok(()) => CheckOutcome {
                ok: true,
                output: format!("{} is good-to-go", self.checker_name),
            },
            Err(err) => {
                log.record(
                    &LogEvent::error("health_check_failed", "external service healthcheck failed")
                        .with_field("check", self.id.as_str())
                        .with_field("url", self.service.endpoint())
                        .with_error(&err),
                );
                CheckOutcome {
                    ok: false,
                    output: err.to_string(),
                }
            }
        }
    }
}

/// Result of running one check.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CheckOutcome {
    /// Whether the upstream is good-to-go.
    ok: bool,
    /// Check output text.
    output: String,
}

impl CheckOutcome {
    /// Outcome for a check that missed the report deadline.
    fn timed_out() -> Self {
        Self {
            ok: false,
            output: "health check timed out".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Health report body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Report schema version.
    pub schema_version: u8,
    /// Owning system code.
    pub system_code: String,
    /// Application name.
    pub name: String,
    /// Application description.
    pub description: String,
    /// Individual check results.
    pub checks: Vec<CheckReport>,
    /// True when every check passed.
    pub ok: bool,
    /// Most severe failing severity, when any check failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<u8>,
}

/// Single check entry in a health report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    /// Stable check id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the check passed.
    pub ok: bool,
    /// Check severity.
    pub severity: u8,
    /// Impact of a failure.
    pub business_impact: String,
    /// Technical summary of a failure.
    pub technical_summary: String,
    /// Runbook URL.
    pub panic_guide: String,
    /// Check output text.
    pub check_output: String,
    /// RFC 3339 time the check ran.
    pub last_updated: String,
}

/// Good-to-go verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GtgStatus {
    /// Every upstream is good-to-go.
    Ok,
    /// An upstream failed; carries its failure message.
    Failed(String),
}

/// Build information body.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    /// Package name.
    pub name: &'static str,
    /// Package version.
    pub version: &'static str,
}

impl BuildInfo {
    /// Returns build information for this crate.
    #[must_use]
    pub const fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Health checks for the service and its upstreams.
pub struct HealthService {
    /// Owning system code.
    system_code: String,
    /// Application name.
    name: String,
    /// Application description.
    description: String,
    /// Registered checks in report order.
    checks: Vec<Arc<HealthCheck>>,
    /// Deadline for a full run.
    timeout: Duration,
    /// Structured log sink.
    log: Arc<dyn LogSink>,
}

impl HealthService {
    /// Creates the health service.
    ///
    /// `validators` are the upstreams configured checks may bind to.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::UnknownEndpoint`] when a configured check names
    /// an endpoint no validator serves.
    pub fn new(
        app: &AppConfig,
        draft_rw: Arc<dyn ExternalService>,
        content_api: Arc<dyn ExternalService>,
        configured: &[HealthCheckConfig],
        validators: &[Arc<dyn ExternalService>],
        log: Arc<dyn LogSink>,
    ) -> Result<Self, HealthError> {
        let mut checks = vec![
            Arc::new(HealthCheck {
                id: "check-draft-content-rw".to_string(),
                name: "Check draft content RW service".to_string(),
                business_impact: "Draft content cannot be provided for suggestions".to_string(),
                panic_guide: PANIC_GUIDE.to_string(),
                severity: 1,
                technical_summary: format!(
                    "Draft content RW is not available at {}",
                    draft_rw.endpoint()
                ),
                checker_name: "Draft content RW".to_string(),
                service: draft_rw,
            }),
            Arc::new(HealthCheck {
                id: "check-content-api-health".to_string(),
                name: "Check Content API Health".to_string(),
                business_impact: "Impossible to serve content through PAC".to_string(),
                panic_guide: PANIC_GUIDE.to_string(),
                severity: 1,
                technical_summary: format!(
                    "Content API is not available at {}",
                    content_api.endpoint()
                ),
                checker_name: "Content API".to_string(),
                service: content_api,
            }),
        ];

        for config in configured {
            let endpoint = config.endpoint.trim_end_matches('/');
            let service = validators
                .iter()
                .find(|service| service.endpoint() == endpoint)
                .cloned()
                .ok_or_else(|| HealthError::UnknownEndpoint(config.endpoint.clone()))?;
            checks.push(Arc::new(HealthCheck {
                id: config.id.clone(),
                name: config.name.clone(),
                business_impact: config.business_impact.clone(),
                panic_guide: config.panic_guide.clone(),
                severity: config.severity,
                technical_summary: config.rendered_technical_summary(),
                checker_name: config.checker_name.clone(),
                service,
            }));
        }

        Ok(Self {
            system_code: app.system_code.clone(),
            name: app.name.clone(),
            description: app.description.clone(),
            checks,
            timeout: HEALTH_TIMEOUT,
            log,
        })
    }

    /// Overrides the report deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the registered check ids in report order.
    #[must_use]
    pub fn check_ids(&self) -> Vec<&str> {
        self.checks.iter().map(|check| check.id.as_str()).collect()
    }

    /// Runs every check concurrently and builds the health report.
    pub async fn report(&self) -> HealthReport {
        let outcomes = self.run_all().await;
        let last_updated =
            OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| String::new());
        let checks: Vec<CheckReport> = self
            .checks
            .iter()
            .zip(outcomes)
            .map(|(check, outcome)| CheckReport {
                id: check.id.clone(),
                name: check.name.clone(),
                ok: outcome.ok,
                severity: check.severity,
                business_impact: check.business_impact.clone(),
                technical_summary: check.technical_summary.clone(),
                panic_guide: check.panic_guide.clone(),
                check_output: outcome.output,
                last_updated: last_updated.clone(),
            })
            .collect();
        let ok = checks.iter().all(|check| check.ok);
        let severity = checks.iter().filter(|check| !check.ok).map(|check| check.severity).min();
        HealthReport {
            schema_version: SCHEMA_VERSION,
            system_code: self.system_code.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            checks,
            ok,
            severity,
        }
    }

    /// Runs every check in parallel, stopping at the first failure.
    pub async fn gtg(&self) -> GtgStatus {
        let mut tasks = self.spawn_checks();
        let deadline = Instant::now() + self.timeout;
        loop {
            match timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok((_, outcome)))) if !outcome.ok => {
                    tasks.abort_all();
                    return GtgStatus::Failed(outcome.output);
                }
                Ok(Some(Ok(_))) => {}
                Ok(Some(Err(err))) => {
                    tasks.abort_all();
                    return GtgStatus::Failed(format!("health check aborted: {err}"));
                }
                Ok(None) => return GtgStatus::Ok,
                Err(_) => {
                    tasks.abort_all();
                    return GtgStatus::Failed(CheckOutcome::timed_out().output);
                }
            }
        }
    }

    /// Runs every check and returns outcomes in check order.
    async fn run_all(&self) -> Vec<CheckOutcome> {
        let mut tasks = self.spawn_checks();
        let mut outcomes: Vec<Option<CheckOutcome>> = vec![None; self.checks.len()];
        let deadline = Instant::now() + self.timeout;
        loop {
            match timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok((index, outcome)))) => {
                    if let Some(slot) = outcomes.get_mut(index) {
                        *slot = Some(outcome);
                    }
                }
                Ok(Some(Err(_))) => {}
                Ok(None) => break,
                Err(_) => {
                    tasks.abort_all();
                    break;
                }
            }
        }
        outcomes
            .into_iter()
            .map(|outcome| outcome.unwrap_or_else(CheckOutcome::timed_out))
            .collect()
    }

    /// Spawns every check, tagged with its position.
    fn spawn_checks(&self) -> JoinSet<(usize, CheckOutcome)> {
        let mut tasks = JoinSet::new();
        for (index, check) in self.checks.iter().enumerate() {
            let check = Arc::clone(check);
            let log = Arc::clone(&self.log);
            tasks.spawn(async move { (index, check.run(log.as_ref()).await) });
        }
        tasks
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Health service construction failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HealthError {
    /// A configured check names an endpoint no validator serves.
    #[error("unable to find service with endpoint {0}")]
    UnknownEndpoint(String),
}
