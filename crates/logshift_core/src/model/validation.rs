//! Field validation shared by entity write paths.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level constraint violation detected before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty or whitespace-only.
    Blank { field: &'static str },
    /// Field exceeds its maximum length in characters.
    TooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
    /// Numeric field is NaN or infinite.
    NotFinite { field: &'static str },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "{field} cannot be blank"),
            Self::TooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "{field} is {actual_chars} characters long; maximum is {max_chars}"
            ),
            Self::NotFinite { field } => write!(f, "{field} must be a finite number"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(())
}

pub(crate) fn require_max_chars(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    let actual_chars = value.chars().count();
    if actual_chars > max_chars {
        return Err(ValidationError::TooLong {
            field,
            max_chars,
            actual_chars,
        });
    }
    Ok(())
}

pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{require_finite, require_max_chars, require_not_blank, ValidationError};

    #[test]
    fn blank_values_are_rejected() {
        assert_eq!(
            require_not_blank("username", "   "),
            Err(ValidationError::Blank { field: "username" })
        );
        assert!(require_not_blank("username", "alice").is_ok());
    }

    #[test]
    fn max_chars_counts_characters_not_bytes() {
        assert!(require_max_chars("name", "äöü", 3).is_ok());
        let err = require_max_chars("name", "äöüß", 3).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLong {
                field: "name",
                max_chars: 3,
                actual_chars: 4,
            }
        );
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        assert!(require_finite("hours_worked", 0.0).is_ok());
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                require_finite("hours_worked", value),
                Err(ValidationError::NotFinite {
                    field: "hours_worked"
                })
            );
        }
    }
}
