//! Local form validation for the auth screens
//!
//! These checks run before any provider call; a failure blocks submission.

use thiserror::Error;

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validation failures, displayed verbatim in the blocking alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is empty
    #[error("Please fill in all fields")]
    MissingFields,

    /// Email field is empty
    #[error("Please enter your email address")]
    MissingEmail,

    /// Password shorter than [`MIN_PASSWORD_LENGTH`]
    #[error("Password must be at least {min} characters")]
    PasswordTooShort {
        /// Required minimum length
        min: usize,
    },

    /// Password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Result type for validation
pub type Result<T> = std::result::Result<T, ValidationError>;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate the login form
pub fn validate_login(email: &str, password: &str) -> Result<()> {
    if is_blank(email) || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    Ok(())
}

/// Validate the registration form
///
/// Checks run in order: required fields, minimum length, confirmation.
pub fn validate_registration(email: &str, password: &str, confirm_password: &str) -> Result<()> {
    if is_blank(email) || password.is_empty() || confirm_password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort { min: MIN_PASSWORD_LENGTH });
    }
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Validate the password-reset form
pub fn validate_reset(email: &str) -> Result<()> {
    if is_blank(email) {
        return Err(ValidationError::MissingEmail);
    }
    Ok(())
}
