// crates/draft-content-api/tests/http_service.rs
// ============================================================================
// Module: HTTP Service Tests
// Description: End-to-end draft reads and writes against stub upstreams.
// Purpose: Validate upstream contracts, header propagation, and routing.
// Dependencies: draft-content-api, axum, reqwest, tokio, base64
// ============================================================================

//! ## Overview
//! Serves the full router on an ephemeral port with the draft store,
//! validator, and Content API replaced by recording stubs, then exercises the
//! public routes over HTTP.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

mod common;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use serde_json::json;

use common::ARTICLE_TYPE;
use common::CCT_ORIGIN;
use common::StubReply;
use common::client;
use common::service_config;
use common::spawn_service;
use common::spawn_static_stub;
use common::spawn_stub;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Content uuid used across tests.
const UUID: &str = "0b6b8d5e-6c1a-4b0e-9a4e-2f1f7a0e2b11";

// ============================================================================
// SECTION: Read Tests
// ============================================================================

#[tokio::test]
async fn read_stamps_and_validates_draft() {
    let rw = spawn_stub(|_| {
        StubReply::new(200, r#"{"title":"native"}"#)
            .header("Content-Type", &format!("{ARTICLE_TYPE}; version=1.0"))
            .header("Last-Modified-RFC3339", "2026-03-04T05:06:07Z")
            .header("Write-Request-Id", "tid_writer")
    })
    .await;
    let validator = spawn_stub(|request| {
        let mut native: Value = serde_json::from_str(&request.body).unwrap();
        native["validated"] = json!(true);
        StubReply::new(200, native.to_string())
    })
    .await;
    let capi = spawn_static_stub(500, "").await;
    let service =
        spawn_service(&service_config(&rw.base_url, &capi.base_url, &validator.base_url, 2_000))
            .await;

    let response = client()
        .get(format!("{}/drafts/content/{UUID}", service.base_url))
        .header("X-Request-Id", "tid_e2e")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.headers()["x-request-id"], "tid_e2e");
    assert_eq!(response.headers()["content-type"], "application/json");
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "title": "native",
            "lastModified": "2026-03-04T05:06:07Z",
            "draftReference": "tid_writer",
            "validated": true
        })
    );

    let reads = rw.requests_to(&format!("/drafts/content/{UUID}"));
    assert_eq!(reads.len(), 1);
    assert_eq!(reads[0].method, "GET");
    assert_eq!(reads[0].header("X-Request-Id"), Some("tid_e2e"));
    let validations = validator.requests_to("/validate");
    assert_eq!(validations.len(), 1);
    assert_eq!(validations[0].method, "POST");
    assert_eq!(
        validations[0].header("Content-Type"),
        Some(format!("{ARTICLE_TYPE}; version=1.0").as_str())
    );
    assert_eq!(validations[0].header("X-Request-Id"), Some("tid_e2e"));
    assert!(capi.requests().is_empty());
}

#[tokio::test]
async fn validator_rejections_are_unprocessable() {
    for status in [404_u16, 415, 422] {
        let rw = spawn_stub(|_| {
            StubReply::new(200, "{}").header("Content-Type", ARTICLE_TYPE)
        })
        .await;
        let validator = spawn_stub(move |_| {
            StubReply::new(status, r#"{"error":"cannot map"}"#)
        })
        .await;
        let capi = spawn_static_stub(200, "{}").await;
        let service = spawn_service(&service_config(
            &rw.base_url,
            &capi.base_url,
            &validator.base_url,
            2_000,
        ))
        .await;

        let response = client()
            .get(format!("{}/drafts/content/{UUID}", service.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 422, "validator status {status}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Draft cannot be mapped into UPP format");
        assert!(capi.requests().is_empty());
    }
}

#[tokio::test]
async fn validator_bad_request_is_internal_error() {
    let rw = spawn_stub(|_| StubReply::new(200, "{}").header("Content-Type", ARTICLE_TYPE)).await;
    let validator = spawn_static_stub(400, r#"{"error":"bad"}"#).await;
    let capi = spawn_static_stub(200, "{}").await;
    let service =
        spawn_service(&service_config(&rw.base_url, &capi.base_url, &validator.base_url, 2_000))
            .await;
    let response =
        client().get(format!("{}/drafts/content/{UUID}", service.base_url)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Error reading draft content");
    let rejected = service.log.named("draft_validation_failed");
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].fields["validator"], "spark");
    assert_eq!(rejected[0].fields["status"], 400);
}

#[tokio::test]
async fn draft_without_validator_is_internal_error() {
    let rw =
        spawn_stub(|_| StubReply::new(200, "{}").header("Content-Type", "application/unknown"))
            .await;
    let validator = spawn_static_stub(200, "{}").await;
    let capi = spawn_static_stub(200, "{}").await;
    let service =
        spawn_service(&service_config(&rw.base_url, &capi.base_url, &validator.base_url, 2_000))
            .await;
    let response =
        client().get(format!("{}/drafts/content/{UUID}", service.base_url)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 500);
    assert!(validator.requests().is_empty());
    assert_eq!(service.log.named("draft_validator_missing").len(), 1);
}

#[tokio::test]
async fn missing_draft_is_served_from_content_api() {
    let rw = spawn_static_stub(404, "").await;
    let validator = spawn_static_stub(200, "{}").await;
    let capi = spawn_stub(|_| {
        StubReply::new(
            200,
            json!({
                "id": format!("http://www.ft.com/thing/{UUID}"),
                "bodyXML": "<body>published</body>",
                "type": "http://www.ft.com/ontology/content/Article"
            })
            .to_string(),
        )
    })
    .await;
    let service =
        spawn_service(&service_config(&rw.base_url, &capi.base_url, &validator.base_url, 2_000))
            .await;

    let response = client()
        .get(format!("{}/drafts/content/{UUID}", service.base_url))
        .header("X-Request-Id", "tid_fallback")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "uuid": UUID, "body": "<body>published</body>", "type": "Article" })
    );

    let fetches = capi.requests_to(&format!("/content/{UUID}"));
    assert_eq!(fetches.len(), 1);
    let expected_auth = format!("Basic {}", STANDARD.encode("capi-user:capi-pass"));
    assert_eq!(fetches[0].header("Authorization"), Some(expected_auth.as_str()));
    assert_eq!(fetches[0].header("x-policy"), Some("INTERNAL_UNSTABLE, EXPAND_IMAGES"));
    assert_eq!(fetches[0].header("X-Request-Id"), Some("tid_fallback"));
    assert!(validator.requests().is_empty());
}

#[tokio::test]
async fn missing_everywhere_is_not_found() {
    let rw = spawn_static_stub(404, "").await;
    let validator = spawn_static_stub(200, "{}").await;
    let capi = spawn_static_stub(404, r#"{"message":"Content not found"}"#).await;
    let service =
        spawn_service(&service_config(&rw.base_url, &capi.base_url, &validator.base_url, 2_000))
            .await;
    let response =
        client().get(format!("{}/drafts/content/{UUID}", service.base_url)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Draft not found");
}

#[tokio::test]
async fn content_api_gateway_timeout_is_internal_error() {
    let rw = spawn_static_stub(404, "").await;
    let validator = spawn_static_stub(200, "{}").await;
    let capi = spawn_static_stub(504, "").await;
    let service =
        spawn_service(&service_config(&rw.base_url, &capi.base_url, &validator.base_url, 2_000))
            .await;
    let response =
        client().get(format!("{}/drafts/content/{UUID}", service.base_url)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Draft content request processing has timed out");
}

#[tokio::test]
async fn unexpected_draft_store_status_is_internal_error() {
    let rw = spawn_static_stub(503, "").await;
    let validator = spawn_static_stub(200, "{}").await;
    let capi = spawn_static_stub(200, "{}").await;
    let service =
        spawn_service(&service_config(&rw.base_url, &capi.base_url, &validator.base_url, 2_000))
            .await;
    let response =
        client().get(format!("{}/drafts/content/{UUID}", service.base_url)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Error reading draft content");
    assert!(capi.requests().is_empty());
}

#[tokio::test]
async fn slow_draft_store_times_out() {
    let rw = spawn_stub(|_| StubReply::new(200, "{}").delayed(Duration::from_secs(3))).await;
    let validator = spawn_static_stub(200, "{}").await;
    let capi = spawn_static_stub(200, "{}").await;
    let service =
        spawn_service(&service_config(&rw.base_url, &capi.base_url, &validator.base_url, 200))
            .await;
    let response =
        client().get(format!("{}/drafts/content/{UUID}", service.base_url)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 504);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Draft content request processing has timed out");
    assert!(capi.requests().is_empty());
}

#[tokio::test]
async fn generated_transaction_id_is_echoed_and_forwarded() {
    let rw = spawn_static_stub(404, "").await;
    let validator = spawn_static_stub(200, "{}").await;
    let capi = spawn_static_stub(404, "").await;
    let service =
        spawn_service(&service_config(&rw.base_url, &capi.base_url, &validator.base_url, 2_000))
            .await;
    let response =
        client().get(format!("{}/drafts/content/{UUID}", service.base_url)).send().await.unwrap();
    let echoed = response.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(echoed.starts_with("tid_"));
    assert_eq!(echoed.len(), 14);
    assert_eq!(rw.requests()[0].header("X-Request-Id"), Some(echoed.as_str()));
    assert_eq!(capi.requests()[0].header("X-Request-Id"), Some(echoed.as_str()));
}

// ============================================================================
// SECTION: Write Tests
// ============================================================================

#[tokio::test]
async fn write_forwards_native_draft_to_store() {
    let rw = spawn_static_stub(201, "").await;
    let validator = spawn_static_stub(200, "{}").await;
    let capi = spawn_static_stub(200, "{}").await;
    let service =
        spawn_service(&service_config(&rw.base_url, &capi.base_url, &validator.base_url, 2_000))
            .await;
    let content_type = format!("{ARTICLE_TYPE}; version=1.0");
    let response = client()
        .put(format!("{}/drafts/nativecontent/{UUID}", service.base_url))
        .header("X-Request-Id", "tid_write")
        .header("X-Origin-System-Id", CCT_ORIGIN)
        .header("Content-Type", content_type.as_str())
        .body(r#"{"title":"native"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.headers()["x-request-id"], "tid_write");

    let writes = rw.requests_to(&format!("/drafts/content/{UUID}"));
    assert_eq!(writes.len(), 1);
    assert!(rw.requests_to(&format!("/drafts/nativecontent/{UUID}")).is_empty());
    assert_eq!(writes[0].method, "PUT");
    assert_eq!(writes[0].body, r#"{"title":"native"}"#);
    assert_eq!(writes[0].header("X-Origin-System-Id"), Some(CCT_ORIGIN));
    assert_eq!(writes[0].header("Content-Type"), Some(content_type.as_str()));
    assert_eq!(writes[0].header("X-Request-Id"), Some("tid_write"));
}

#[tokio::test]
async fn write_reports_store_failures() {
    let rw = spawn_static_stub(500, "").await;
    let validator = spawn_static_stub(200, "{}").await;
    let capi = spawn_static_stub(200, "{}").await;
    let service =
        spawn_service(&service_config(&rw.base_url, &capi.base_url, &validator.base_url, 2_000))
            .await;
    let response = client()
        .put(format!("{}/drafts/nativecontent/{UUID}", service.base_url))
        .header("X-Origin-System-Id", CCT_ORIGIN)
        .header("Content-Type", ARTICLE_TYPE)
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Error in writing draft content: content RW returned an unexpected HTTP status code in \
         write operation: 500"
    );
}

#[tokio::test]
async fn write_rejects_bad_requests_before_the_store() {
    let rw = spawn_static_stub(200, "").await;
    let validator = spawn_static_stub(200, "{}").await;
    let capi = spawn_static_stub(200, "{}").await;
    let service =
        spawn_service(&service_config(&rw.base_url, &capi.base_url, &validator.base_url, 2_000))
            .await;
    let response = client()
        .put(format!("{}/drafts/nativecontent/not-a-uuid", service.base_url))
        .header("X-Origin-System-Id", CCT_ORIGIN)
        .header("Content-Type", ARTICLE_TYPE)
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid content UUID: not-a-uuid");
    assert!(rw.requests().is_empty());
}

#[tokio::test]
async fn oversized_write_is_refused() {
    let rw = spawn_static_stub(200, "").await;
    let validator = spawn_static_stub(200, "{}").await;
    let capi = spawn_static_stub(200, "{}").await;
    let service =
        spawn_service(&service_config(&rw.base_url, &capi.base_url, &validator.base_url, 2_000))
            .await;
    let response = client()
        .put(format!("{}/drafts/nativecontent/{UUID}", service.base_url))
        .header("X-Origin-System-Id", CCT_ORIGIN)
        .header("Content-Type", ARTICLE_TYPE)
        .body("x".repeat(8 * 1024))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 413);
    assert!(rw.requests().is_empty());
}
