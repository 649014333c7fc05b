//! Input normalization and field checks used by the auth service.
//!
//! The HTTP layer runs `validator`-derived checks first; these functions
//! are the service-level backstop so the rules hold for every caller.

use crate::{AuthError, Result};

/// Normalize an email address: trim and lower-case.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalize a phone number: strip spaces and dashes.
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Check that an email address is plausibly valid.
pub fn check_email(email: &str) -> Result<()> {
    let at = email.find('@');
    let valid = match at {
        Some(pos) => {
            pos > 0 && email[pos + 1..].contains('.') && !email.ends_with('.') && pos < email.len() - 1
        }
        None => false,
    };
    if !valid {
        return Err(AuthError::Validation("invalid email address".to_string()));
    }
    Ok(())
}

/// Check that a phone number is ten digits.
pub fn check_phone(phone: &str) -> Result<()> {
    if phone.len() != 10 || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(AuthError::Validation(
            "phone number must be 10 digits".to_string(),
        ));
    }
    Ok(())
}

/// Check that a required text field is non-empty after trimming.
pub fn check_required(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AuthError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Check that a password and its confirmation match.
pub fn check_passwords_match(password: &str, confirm: &str) -> Result<()> {
    if password != confirm {
        return Err(AuthError::Validation("passwords do not match".to_string()));
    }
    Ok(())
}
