//! Input validation for incoming resource payloads.
//!
//! Validation rules run before any repository call, so a rejected payload
//! never reaches storage. Each rule carries the exact message reported back
//! to the client:
//! 1. Required-field checks return the first missing field's message
//! 2. A present-but-empty string counts as missing
//!
//! The create-user rule set is configurable: deployments can demand an email
//! alongside the name via [`CreatePolicy`].

use thiserror::Error;

/// Message for a user create payload without a name.
pub const NAME_REQUIRED: &str = "Name is required";
/// Message for a user create payload without an email (email policy only).
pub const EMAIL_REQUIRED: &str = "Email is required";
/// Message for a user update payload without a name.
pub const NAME_REQUIRED_FOR_UPDATE: &str = "Name is required for update";
/// Message for a task create payload without a title.
pub const TITLE_REQUIRED: &str = "Title is required";
/// Message for a task status update without a status.
pub const STATUS_REQUIRED_FOR_UPDATE: &str = "Status is required for update";

/// A named validation failure.
///
/// Raised at the point a payload rule fails; the HTTP layer reports the
/// carried message to the client verbatim with a 400 status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Check that a required text field is present and non-empty.
///
/// # Arguments
/// * `value` - The field as extracted from the request payload
/// * `message` - Message reported when the check fails
///
/// # Returns
/// * `Ok(&str)` with the field value if present and non-empty
/// * `Err(ValidationError)` carrying `message` otherwise
pub fn require_field<'a>(
    value: Option<&'a str>,
    message: &str,
) -> Result<&'a str, ValidationError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::new(message)),
    }
}

/// Policy deciding which fields a user create payload must carry.
///
/// The two policies are mutually exclusive alternatives chosen once per
/// deployment; both store an email when one is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreatePolicy {
    /// Only `name` is required (the default)
    #[default]
    NameOnly,
    /// `name` and `email` are both required
    RequireEmail,
}

impl CreatePolicy {
    /// Read the creation policy from the `REQUIRE_EMAIL` environment variable.
    ///
    /// Accepts `1`, `true`, or `yes` (case-insensitive); anything else keeps
    /// the default name-only policy.
    pub fn from_env() -> Self {
        match std::env::var("REQUIRE_EMAIL") {
            Ok(val) if matches!(val.to_lowercase().as_str(), "1" | "true" | "yes") => {
                Self::RequireEmail
            }
            _ => Self::NameOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_field_present() {
        let result = require_field(Some("Charlie"), NAME_REQUIRED);
        assert_eq!(result.unwrap(), "Charlie");
    }

    #[test]
    fn test_require_field_missing() {
        let result = require_field(None, NAME_REQUIRED);
        assert_eq!(result.unwrap_err().message, "Name is required");
    }

    #[test]
    fn test_require_field_empty_counts_as_missing() {
        let result = require_field(Some(""), TITLE_REQUIRED);
        assert_eq!(result.unwrap_err().message, "Title is required");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("Invalid email format.");
        assert_eq!(err.to_string(), "Invalid email format.");
    }

    #[test]
    fn test_create_policy_default() {
        assert_eq!(CreatePolicy::default(), CreatePolicy::NameOnly);
    }
}
