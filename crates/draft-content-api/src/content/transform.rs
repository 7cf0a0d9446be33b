// crates/draft-content-api/src/content/transform.rs
// ============================================================================
// Module: Published Content Transform
// Description: Reshapes published content into the draft response format.
// Purpose: Let fallback responses look like validated drafts.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Published content uses full URIs and a different field layout. The
//! transform rewrites it in place: `id` becomes a bare `uuid`, `bodyXML`
//! becomes `body`, `type` loses its ontology prefix, brands become id objects,
//! and (alongside brands) `mainImage` collapses to the image uuid.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix stripped from content ids.
const ID_PREFIX: &str = "http://www.ft.com/thing/";

/// Prefix stripped from content types.
const TYPE_PREFIX: &str = "http://www.ft.com/ontology/content/";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Published content did not have the expected shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransformError {
    /// `id` was not a string.
    #[error("invalid id value, was expecting string")]
    Id,
    /// `type` was not a string.
    #[error("invalid type value, was expecting string")]
    Type,
    /// `brands` was not an array.
    #[error("invalid brands value, was expecting array")]
    Brands,
    /// A brand entry was not a string.
    #[error("invalid brand entry, was expecting string")]
    Brand,
    /// `mainImage` was not an object.
    #[error("invalid mainImage entry, was expecting a map, got: {0}")]
    MainImage(String),
    /// `mainImage` had no string `id`.
    #[error("invalid mainImage entry, was expecting an id-value pair")]
    MainImageId,
}

// ============================================================================
// SECTION: Transform
// ============================================================================

/// Rewrites published content in place.
///
/// # Errors
///
/// Returns [`TransformError`] when a field has an unexpected JSON type. The
/// content may be partially rewritten when an error is returned.
pub fn transform_upp_content(content: &mut Map<String, Value>) -> Result<(), TransformError> {
    if let Some(id) = content.remove("id") {
        let Value::String(id) = id else {
            return Err(TransformError::Id);
        };
        content.insert("uuid".to_string(), Value::String(id.replacen(ID_PREFIX, "", 1)));
    }

    if let Some(body) = content.remove("bodyXML") {
        content.insert("body".to_string(), body);
    }

    if let Some(kind) = content.get_mut("type") {
        let Value::String(kind) = kind else {
            return Err(TransformError::Type);
        };
        *kind = kind.replacen(TYPE_PREFIX, "", 1);
    }

    if let Some(brands) = content.get("brands") {
        let Value::Array(brands) = brands else {
            return Err(TransformError::Brands);
        };
        let wrapped = brands
            .iter()
            .map(|brand| brand.as_str().map(|id| json!({ "id": id })).ok_or(TransformError::Brand))
            .collect::<Result<Vec<_>, _>>()?;
        content.insert("brands".to_string(), Value::Array(wrapped));

        if let Some(main_image) = content.get("mainImage") {
            let Value::Object(image) = main_image else {
                return Err(TransformError::MainImage(main_image.to_string()));
            };
            let image_id =
                image.get("id").and_then(Value::as_str).ok_or(TransformError::MainImageId)?;
            let image_uuid = image_id.rsplit('/').next().unwrap_or(image_id).to_string();
            content.insert("mainImage".to_string(), Value::String(image_uuid));
        }
    }

    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
