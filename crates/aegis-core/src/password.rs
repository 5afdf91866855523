// ── New-password rules ──
//
// Checked locally before `PUT /users/change-password` so the common
// mistakes come back as inline validation errors.

use secrecy::{ExposeSecret, SecretString};

use crate::error::CoreError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Which rules a candidate password satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordChecks {
    pub length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub number: bool,
}

impl PasswordChecks {
    pub fn of(candidate: &str) -> Self {
        Self {
            length: candidate.chars().count() >= MIN_PASSWORD_LEN,
            uppercase: candidate.chars().any(|c| c.is_ascii_uppercase()),
            lowercase: candidate.chars().any(|c| c.is_ascii_lowercase()),
            number: candidate.chars().any(|c| c.is_ascii_digit()),
        }
    }

    pub fn all(self) -> bool {
        self.length && self.uppercase && self.lowercase && self.number
    }
}

fn invalid(message: &str) -> CoreError {
    CoreError::Validation {
        message: message.to_owned(),
    }
}

/// Validate a password change: rules, confirmation, and difference from
/// the current password, in that order.
pub fn validate_new_password(
    current: &SecretString,
    new: &SecretString,
    confirm: &SecretString,
) -> Result<(), CoreError> {
    let new_plain = new.expose_secret();
    if !PasswordChecks::of(new_plain).all() {
        return Err(invalid("Password does not meet all requirements"));
    }
    if new_plain != confirm.expose_secret() {
        return Err(invalid("Passwords do not match"));
    }
    if new_plain == current.expose_secret() {
        return Err(invalid("New password must be different from current password"));
    }
    Ok(())
}
