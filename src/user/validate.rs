use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ApiError;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 5;

/// Case-folds an email for storage and comparison. Uniqueness is enforced on
/// the normalized form, so "Test@Example.com" and "test@example.com" collide.
/// Normalization is case-folding only; nothing else is rewritten.
pub fn normalize_email(raw: &str) -> String {
    raw.to_lowercase()
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Normalizes and syntactically checks an email address.
pub fn validate_email(raw: &str) -> Result<String, ApiError> {
    let email = normalize_email(raw);
    if !is_valid_email(&email) {
        return Err(ApiError::InvalidEmail);
    }
    Ok(email)
}

pub fn validate_password(plain: &str) -> Result<(), ApiError> {
    if plain.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::PasswordTooShort);
    }
    Ok(())
}
