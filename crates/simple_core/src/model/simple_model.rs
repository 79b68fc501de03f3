//! SimpleModel domain record.
//!
//! # Responsibility
//! - Define the canonical entity shape published to downstream consumers.
//! - Parse wire identifiers into typed ids at the boundary.
//!
//! # Invariants
//! - `id` is `None` only before the first save.
//! - The nil UUID is never a valid identifier.
//! - `name` is non-blank.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a `SimpleModel`.
pub type SimpleModelId = Uuid;

/// Validation failures for `SimpleModel` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleModelValidationError {
    /// `id` was set to the nil UUID.
    NilId,
    /// `name` is empty or whitespace only.
    BlankName,
}

impl Display for SimpleModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "id must not be the nil uuid"),
            Self::BlankName => write!(f, "name must not be blank"),
        }
    }
}

impl Error for SimpleModelValidationError {}

/// The single entity managed by the service.
///
/// Equality compares every field; use [`SimpleModel::same_identity`] for
/// identity comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleModel {
    /// Assigned by the store on first save when absent.
    pub id: Option<SimpleModelId>,
    pub name: String,
    pub description: Option<String>,
}

impl SimpleModel {
    /// Creates an unsaved model. The store assigns `id` on save.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
        }
    }

    /// Creates a model with a caller-provided id.
    ///
    /// # Errors
    /// - `NilId` when `id` is the nil UUID.
    /// - `BlankName` when `name` is blank.
    pub fn with_id(
        id: SimpleModelId,
        name: impl Into<String>,
    ) -> Result<Self, SimpleModelValidationError> {
        let model = Self {
            id: Some(id),
            name: name.into(),
            description: None,
        };
        model.validate()?;
        Ok(model)
    }

    /// Builder-style setter for `description`.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks field-level invariants.
    pub fn validate(&self) -> Result<(), SimpleModelValidationError> {
        if self.id.is_some_and(|id| id.is_nil()) {
            return Err(SimpleModelValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(SimpleModelValidationError::BlankName);
        }
        Ok(())
    }

    /// Returns whether both values refer to the same saved entity.
    ///
    /// Unsaved models never share identity.
    pub fn same_identity(&self, other: &SimpleModel) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

/// Parses a wire identifier into a `SimpleModelId`.
///
/// Accepts any textual UUID form `uuid` understands (hyphenated, simple,
/// braced, urn). Surrounding whitespace is ignored. Returns `None` for
/// malformed input and for the nil UUID.
pub fn parse_simple_model_id(value: &str) -> Option<SimpleModelId> {
    Uuid::parse_str(value.trim()).ok().filter(|id| !id.is_nil())
}

#[cfg(test)]
mod tests {
    use super::{parse_simple_model_id, SimpleModel, SimpleModelValidationError};
    use uuid::Uuid;

    #[test]
    fn parse_accepts_hyphenated_and_trims() {
        let id = Uuid::new_v4();
        assert_eq!(parse_simple_model_id(&format!(" {id} ")), Some(id));
    }

    #[test]
    fn parse_rejects_garbage_and_nil() {
        assert_eq!(parse_simple_model_id("not-a-uuid"), None);
        assert_eq!(parse_simple_model_id(""), None);
        assert_eq!(parse_simple_model_id(&Uuid::nil().to_string()), None);
    }

    #[test]
    fn validate_rejects_blank_name() {
        let model = SimpleModel::new("   ");
        assert_eq!(model.validate(), Err(SimpleModelValidationError::BlankName));
    }

    #[test]
    fn same_identity_ignores_descriptive_fields() {
        let id = Uuid::new_v4();
        let left = SimpleModel::with_id(id, "x").unwrap();
        let right = SimpleModel::with_id(id, "y").unwrap().describe("other");
        assert!(left.same_identity(&right));
        assert_ne!(left, right);
        assert!(!SimpleModel::new("a").same_identity(&SimpleModel::new("a")));
    }
}
