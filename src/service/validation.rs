use crate::error::ApiError;
use regex::Regex;
use std::sync::LazyLock;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid name regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub const MIN_PASSWORD_LEN: usize = 4;

/// Registration field rules, checked in the same order the sign-up form checks them.
pub fn validate_registration(email: &str, name: &str, password: &str) -> Result<(), ApiError> {
    if email.trim().is_empty() || name.trim().is_empty() || password.trim().is_empty() {
        return Err(ApiError::IncorrectForm);
    }
    if !NAME_RE.is_match(name) {
        return Err(ApiError::Validation(
            "Name must contain letters and spaces only.".to_string(),
        ));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ApiError::Validation("Invalid email format.".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long."
        )));
    }
    Ok(())
}
