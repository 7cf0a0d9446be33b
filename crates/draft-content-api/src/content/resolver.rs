// crates/draft-content-api/src/content/resolver.rs
// ============================================================================
// Module: Validator Resolver
// Description: Content-type to validator lookup.
// Purpose: Pick the validator responsible for a draft's media type.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Drafts are validated by the validator registered for their media type.
//! Lookup ignores media-type parameters, so `application/x; charset=utf-8`
//! resolves like `application/x`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use super::ContentError;
use super::validator::DraftContentValidator;

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Maps media types to validators.
#[derive(Clone, Default)]
pub struct ValidatorResolver {
    /// Validators keyed by parameter-free media type.
    validators: BTreeMap<String, Arc<dyn DraftContentValidator>>,
}

impl ValidatorResolver {
    /// Creates a resolver from a media-type map.
    #[must_use]
    pub fn new(validators: BTreeMap<String, Arc<dyn DraftContentValidator>>) -> Self {
        Self {
            validators,
        }
    }

    /// Returns the validator for `content_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::NoValidator`] when no validator is registered.
    pub fn validator_for(
        &self,
        content_type: &str,
    ) -> Result<Arc<dyn DraftContentValidator>, ContentError> {
        let media_type = strip_media_type_parameters(content_type);
        self.validators
            .get(media_type)
            .cloned()
            .ok_or_else(|| ContentError::NoValidator(media_type.to_string()))
    }

    /// Returns the number of registered media types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns true when no media type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

/// Returns the media type without parameters.
#[must_use]
pub fn strip_media_type_parameters(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or(content_type).trim()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
