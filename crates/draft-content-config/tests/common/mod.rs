// crates/draft-content-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for draft-content-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use draft_content_config::DraftContentApiConfig;

/// Parses a TOML string into a `DraftContentApiConfig` for tests.
pub fn config_from_toml(toml_str: &str) -> Result<DraftContentApiConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns the smallest config that passes validation.
pub fn minimal_config() -> Result<DraftContentApiConfig, toml::de::Error> {
    config_from_toml(
        r#"
[content_rw]
endpoint = "http://localhost:9001"

[content_api]
endpoint = "http://localhost:9002/content"

[validators."application/vnd.ft-upp-article+json"]
validator = "spark"
endpoint = "http://localhost:9003"
"#,
    )
}
