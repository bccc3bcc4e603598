//! Shared validation utilities
//!
//! All request validation happens at the HTTP boundary, before a command or
//! query is built. The rules here cover every text field the API accepts:
//! required, bounded length, and restricted to letters, numbers, spaces,
//! and hyphens.

use serde::Serialize;
use thiserror::Error;

/// Maximum length for brand and product names
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length for product descriptions
pub const MAX_DESCRIPTION_LENGTH: usize = 100;

/// Maximum length for usernames and passwords
pub const MAX_CREDENTIAL_LENGTH: usize = 50;

/// Errors that can occur during text field validation
///
/// `field` is the human-readable label used in the message ("brand name",
/// "username", ...), not the JSON property name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextValidationError {
    #[error("The {field} is required.")]
    Required { field: &'static str },

    #[error("The {field} cannot exceed {max_length} characters.")]
    TooLong {
        field: &'static str,
        max_length: usize,
    },

    #[error("The {field} can only contain letters, numbers, spaces, and hyphens.")]
    InvalidFormat { field: &'static str },
}

/// Validate a required text field
///
/// # Rules
/// - Must not be empty
/// - Must not exceed `max_length` characters
/// - Must not be whitespace-only
/// - Must contain only letters, numbers, spaces, and hyphens
///
/// # Arguments
/// * `field` - Label used in error messages (e.g. "brand name")
/// * `value` - The value to validate
/// * `max_length` - Maximum allowed length in characters
pub fn validate_text(
    field: &'static str,
    value: &str,
    max_length: usize,
) -> Result<(), TextValidationError> {
    if value.is_empty() {
        return Err(TextValidationError::Required { field });
    }

    if value.chars().count() > max_length {
        return Err(TextValidationError::TooLong { field, max_length });
    }

    // Whitespace-only values pass the required check but not the format
    // check, mirroring how the charset rule is stated to callers.
    if value.trim().is_empty() || !value.chars().all(is_allowed_char) {
        return Err(TextValidationError::InvalidFormat { field });
    }

    Ok(())
}

/// Characters permitted in every validated text field
#[inline]
fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || c == '-'
}

/// A single field failure reported back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// JSON property the violation applies to
    pub field: String,
    /// Human-readable message
    pub message: String,
}

impl FieldViolation {
    /// Build a violation from a field name and any displayable error
    pub fn new(field: &str, error: impl std::fmt::Display) -> Self {
        Self {
            field: field.to_string(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_values() {
        let valid = vec![
            "Acme",
            "Acme Corp",
            "Acme-Corp",
            "Widget 3000",
            "a",
            "12345",
            "Two  Spaces",
        ];

        for value in valid {
            assert!(
                validate_text("brand name", value, MAX_NAME_LENGTH).is_ok(),
                "'{}' should be valid",
                value
            );
        }
    }

    #[test]
    fn test_empty_value_is_required() {
        assert_eq!(
            validate_text("brand name", "", MAX_NAME_LENGTH),
            Err(TextValidationError::Required {
                field: "brand name"
            })
        );
    }

    #[test]
    fn test_whitespace_only_fails_format() {
        assert_eq!(
            validate_text("brand name", "   ", MAX_NAME_LENGTH),
            Err(TextValidationError::InvalidFormat {
                field: "brand name"
            })
        );
    }

    #[test]
    fn test_value_too_long() {
        let value = "a".repeat(MAX_NAME_LENGTH + 1);

        assert_eq!(
            validate_text("brand name", &value, MAX_NAME_LENGTH),
            Err(TextValidationError::TooLong {
                field: "brand name",
                max_length: MAX_NAME_LENGTH,
            })
        );
    }

    #[test]
    fn test_value_at_maximum_length() {
        let value = "a".repeat(MAX_NAME_LENGTH);

        assert!(validate_text("brand name", &value, MAX_NAME_LENGTH).is_ok());
    }

    #[test]
    fn test_invalid_characters() {
        let invalid = vec![
            "has_underscore",
            "has@symbol",
            "has.dot",
            "has/slash",
            "quote\"inside",
            "semi;colon",
        ];

        for value in invalid {
            assert_eq!(
                validate_text("product name", value, MAX_NAME_LENGTH),
                Err(TextValidationError::InvalidFormat {
                    field: "product name"
                }),
                "'{}' should fail the format check",
                value
            );
        }
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 50 two-byte characters; within the character bound even though the
        // byte length exceeds it. The format check rejects it afterwards.
        let value = "é".repeat(MAX_CREDENTIAL_LENGTH);

        assert_eq!(
            validate_text("username", &value, MAX_CREDENTIAL_LENGTH),
            Err(TextValidationError::InvalidFormat { field: "username" })
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TextValidationError::Required { field: "username" }.to_string(),
            "The username is required."
        );
        assert_eq!(
            TextValidationError::TooLong {
                field: "username",
                max_length: 50
            }
            .to_string(),
            "The username cannot exceed 50 characters."
        );
        assert_eq!(
            TextValidationError::InvalidFormat {
                field: "brand name"
            }
            .to_string(),
            "The brand name can only contain letters, numbers, spaces, and hyphens."
        );
    }

    #[test]
    fn test_field_violation_carries_message() {
        let violation = FieldViolation::new(
            "name",
            TextValidationError::Required {
                field: "brand name",
            },
        );

        assert_eq!(violation.field, "name");
        assert_eq!(violation.message, "The brand name is required.");
    }
}
