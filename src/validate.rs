// Field checks shared by both stores.

use crate::error::ValidationError;

/// Longest accepted value for any stored field, counted in characters.
pub const MAX_FIELD_LEN: usize = 49;

/// Minimum password length accepted by [`is_strong_password`].
pub const MIN_PASSWORD_LEN: usize = 6;

/// A password is strong when it has at least [`MIN_PASSWORD_LEN`] characters
/// and at least one ASCII digit.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN && password.chars().any(|c| c.is_ascii_digit())
}

/// Reports the first empty field, in the order given.
pub fn check_present(fields: &[(&'static str, &str)]) -> Result<(), ValidationError> {
    match fields.iter().find(|(_, value)| value.is_empty()) {
        Some((field, _)) => Err(ValidationError::EmptyField { field: *field }),
        None => Ok(()),
    }
}

/// Non-empty and within [`MAX_FIELD_LEN`].
pub fn check_field(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_FIELD_LEN,
        });
    }
    Ok(())
}

/// Like [`check_field`], and the value must be a single token.
pub fn check_token(field: &'static str, value: &str) -> Result<(), ValidationError> {
    check_field(field, value)?;
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::ContainsWhitespace { field });
    }
    Ok(())
}

/// Full check for an account password: token rules, then strength.
pub fn check_password(value: &str) -> Result<(), ValidationError> {
    check_token("password", value)?;
    if !is_strong_password(value) {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}
