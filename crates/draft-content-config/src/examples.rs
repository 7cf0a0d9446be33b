// crates/draft-content-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration for the Draft Content API.
// Purpose: Give operators a starting point that passes validation.
// Dependencies: none
// ============================================================================

/// Returns a complete example `draft-content-api.toml`.
#[must_use]
pub const fn config_toml_example() -> &'static str {
    r#"[app]
system_code = "draft-content-api"
name = "Draft Content API"

[server]
bind = "0.0.0.0:8080"
timeout_ms = 8000

[content_rw]
endpoint = "http://draft-content-rw:8080"

[content_api]
endpoint = "https://api.ft.com/content"
username = "draft-content-api"
password = "change-me"
x_policies = ["INTERNAL_UNSTABLE"]

[http_client]
timeout_ms = 10000
connect_timeout_ms = 2000

[content]
allowed_origin_system_ids = ["http://cmdb.ft.com/systems/cct"]
allowed_content_types = ["application/vnd.ft-upp-article+json"]

[validators."application/vnd.ft-upp-article+json"]
validator = "spark"
endpoint = "http://upp-article-validator:8080"

[[health_checks]]
endpoint = "http://upp-article-validator:8080"
id = "check-upp-article-validator"
business_impact = "Draft articles cannot be validated for suggestions"
name = "Check UPP article validator"
panic_guide = "https://runbooks.in.ft.com/draft-content-api"
severity = 1
technical_summary = "UPP article validator is not available at {endpoint}"
checker_name = "UPP article validator"

[logging]
sink = "stderr"
"#
}
