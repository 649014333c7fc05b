//! One-time codes and reset tokens.

use rand::Rng;
use uuid::Uuid;

/// Generate a six-digit OTP, zero-padded.
pub fn generate_otp() -> String {
    let code: u32 = rand::rng().random_range(100_000..=999_999);
    format!("{code:06}")
}

/// Generate an unguessable password-reset token.
pub fn generate_reset_token() -> String {
    Uuid::new_v4().to_string()
}

/// Compare a stored OTP against user input.
///
/// Input is trimmed; a missing stored OTP never matches.
pub fn otp_matches(stored: Option<&str>, provided: &str) -> bool {
    match stored {
        Some(stored) => stored == provided.trim(),
        None => false,
    }
}
