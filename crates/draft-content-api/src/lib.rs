// crates/draft-content-api/src/lib.rs
// ============================================================================
// Module: Draft Content API
// Description: HTTP service serving draft content with published fallback.
// Purpose: Read, validate, and write drafts on behalf of suggestion clients.
// Dependencies: draft-content-config, axum, reqwest, tokio
// ============================================================================

//! ## Overview
//! Draft Content API reads drafts from the draft content store, runs them
//! through the validator configured for their content type, and falls back to
//! the published Content API when no draft exists. Native drafts are written
//! straight through to the store after admission checks. Health, good-to-go
//! and build-info endpoints report on every upstream.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod content;
pub mod health;
pub mod log;
pub mod platform;
pub mod server;
pub mod transaction_id;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use content::ContentApi;
pub use content::ContentError;
pub use content::ContentHandler;
pub use content::DraftContentRw;
pub use content::DraftContentValidator;
pub use content::HttpContentApi;
pub use content::HttpDraftContentRw;
pub use content::HttpDraftContentValidator;
pub use content::ValidatorError;
pub use content::ValidatorResolver;
pub use health::HealthService;
pub use log::FileLogSink;
pub use log::LogEvent;
pub use log::LogLevel;
pub use log::LogSink;
pub use log::MemoryLogSink;
pub use log::NoopLogSink;
pub use log::StderrLogSink;
pub use platform::ExternalService;
pub use platform::GtgError;
pub use platform::PlatformService;
pub use server::DraftContentServer;
pub use server::ServerError;
pub use transaction_id::RequestContext;
