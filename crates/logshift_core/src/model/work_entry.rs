//! Work entry domain model.
//!
//! # Responsibility
//! - Define the write shape (`NewWorkEntry`, references by key) and the read
//!   shape (`WorkEntry`, related records resolved).
//!
//! # Invariants
//! - Entries are append-only; there is no update or delete path.
//! - `hours_worked` is finite; `hours_worked >= 0` is checked at the input
//!   boundary, not here.
//! - `description` is at most `DESCRIPTION_MAX_CHARS` characters.

use super::project::{Project, ProjectId};
use super::user::{User, UserId};
use super::validation::{require_finite, require_max_chars, ValidationError};
use chrono::NaiveDate;
use std::fmt::{Display, Formatter};

pub const DESCRIPTION_MAX_CHARS: usize = 250;

/// Surrogate work entry identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkEntryId(pub i64);

impl Display for WorkEntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Insert shape for a work entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkEntry {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub project_id: ProjectId,
    pub hours_worked: f64,
    pub description: String,
}

impl NewWorkEntry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_finite("hours_worked", self.hours_worked)?;
        require_max_chars("description", &self.description, DESCRIPTION_MAX_CHARS)
    }
}

/// Read model with user and project eagerly resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkEntry {
    pub id: WorkEntryId,
    pub user: User,
    pub date: NaiveDate,
    pub project: Project,
    pub hours_worked: f64,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::{NewWorkEntry, DESCRIPTION_MAX_CHARS};
    use crate::model::validation::ValidationError;
    use crate::model::project::ProjectId;
    use crate::model::user::UserId;
    use chrono::NaiveDate;

    fn entry(description: String) -> NewWorkEntry {
        NewWorkEntry {
            user_id: UserId(1),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            project_id: ProjectId::new("P1"),
            hours_worked: 1.0,
            description,
        }
    }

    #[test]
    fn empty_description_is_allowed() {
        assert!(entry(String::new()).validate().is_ok());
    }

    #[test]
    fn description_over_limit_is_rejected() {
        assert!(entry("d".repeat(DESCRIPTION_MAX_CHARS)).validate().is_ok());
        assert!(entry("d".repeat(DESCRIPTION_MAX_CHARS + 1))
            .validate()
            .is_err());
    }

    #[test]
    fn non_finite_hours_are_rejected() {
        let mut new_entry = entry(String::new());
        new_entry.hours_worked = f64::INFINITY;
        assert_eq!(
            new_entry.validate(),
            Err(ValidationError::NotFinite {
                field: "hours_worked"
            })
        );
    }
}
