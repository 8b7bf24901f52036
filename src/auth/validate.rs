use lazy_static::lazy_static;
use regex::Regex;

use crate::auth::dto::{LoginPayload, LoginRequest, RegisterPayload, RegisterRequest};
use crate::error::AppError;

pub(crate) const PASSWORD_REQUIREMENTS: &str = "Poor password strength. Password must contain \
    at least 8 characters, an upper-case letter, and a lower-case letter, a number, and a \
    non-alphanumeric character.";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_alphanumeric())
}

/// Shape-check the registration body, reporting the first missing field in
/// declaration order, then the email format. Emails are normalized
/// (trimmed, lowercased) before the format check.
pub(crate) fn validate_register_body(body: RegisterRequest) -> Result<RegisterPayload, AppError> {
    let first_name = require(body.first_name, "first_name")?;
    let last_name = require(body.last_name, "last_name")?;
    let email = require(body.email, "email")?;
    let password = require(body.password, "password")?;

    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Bad email format".into()));
    }

    Ok(RegisterPayload {
        first_name,
        last_name,
        email,
        password,
    })
}

/// Shape-check the login body the same way: email first, then password.
pub(crate) fn validate_login_body(body: LoginRequest) -> Result<LoginPayload, AppError> {
    let email = require(body.email, "email")?;
    let password = require(body.password, "password")?;

    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Bad email format".into()));
    }

    Ok(LoginPayload { email, password })
}

fn require(field: Option<String>, name: &str) -> Result<String, AppError> {
    field.ok_or_else(|| AppError::Validation(format!("'{name}' is required")))
}
