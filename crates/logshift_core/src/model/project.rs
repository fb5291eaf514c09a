//! Project domain model.
//!
//! # Invariants
//! - `id` is caller supplied, unique, and used as the primary key.
//! - `name` is unique across all projects.
//! - Both fields are non-blank and within their character limits.

use super::validation::{require_max_chars, require_not_blank, ValidationError};
use std::fmt::{Display, Formatter};

pub const PROJECT_ID_MAX_CHARS: usize = 20;
pub const PROJECT_NAME_MAX_CHARS: usize = 50;

/// Caller-supplied project key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A unit of work hours can be booked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ProjectId::new(id),
            name: name.into(),
        }
    }

    /// Checks id and name limits.
    ///
    /// # Errors
    /// - `Blank` when id or name is empty or whitespace-only.
    /// - `TooLong` when id exceeds `PROJECT_ID_MAX_CHARS` or name exceeds
    ///   `PROJECT_NAME_MAX_CHARS`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_not_blank("project id", self.id.as_str())?;
        require_max_chars("project id", self.id.as_str(), PROJECT_ID_MAX_CHARS)?;
        require_not_blank("project name", &self.name)?;
        require_max_chars("project name", &self.name, PROJECT_NAME_MAX_CHARS)
    }
}

#[cfg(test)]
mod tests {
    use super::{Project, PROJECT_ID_MAX_CHARS};
    use crate::model::validation::ValidationError;

    #[test]
    fn validate_accepts_regular_project() {
        assert!(Project::new("P1", "Website").validate().is_ok());
    }

    #[test]
    fn validate_rejects_long_id_before_name() {
        let project = Project::new("x".repeat(PROJECT_ID_MAX_CHARS + 1), "");
        let err = project.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TooLong {
                field: "project id",
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_blank_name() {
        let err = Project::new("P1", " ").validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::Blank {
                field: "project name"
            }
        );
    }
}
