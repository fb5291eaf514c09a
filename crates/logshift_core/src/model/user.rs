//! User domain model.
//!
//! # Invariants
//! - `username` is unique across all users and compared case-sensitively.
//! - `username` is non-blank and at most `USERNAME_MAX_CHARS` characters.

use super::validation::{require_max_chars, require_not_blank, ValidationError};
use std::fmt::{Display, Formatter};

pub const USERNAME_MAX_CHARS: usize = 50;

/// Surrogate user identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person logging hours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

/// Checks a candidate username before it is written.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    require_not_blank("username", username)?;
    require_max_chars("username", username, USERNAME_MAX_CHARS)
}

#[cfg(test)]
mod tests {
    use super::{validate_username, USERNAME_MAX_CHARS};
    use crate::model::validation::ValidationError;

    #[test]
    fn username_at_limit_is_accepted() {
        assert!(validate_username(&"a".repeat(USERNAME_MAX_CHARS)).is_ok());
    }

    #[test]
    fn username_over_limit_is_rejected() {
        let err = validate_username(&"a".repeat(USERNAME_MAX_CHARS + 1)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { field: "username", .. }));
    }
}
