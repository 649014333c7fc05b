//! Error types for Stayhub.

use thiserror::Error;

/// Common error type for all auth operations.
///
/// Every business-rule failure maps to a distinct variant so callers
/// (and the HTTP layer) can react without string matching.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Malformed or missing input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Duplicate email or phone number.
    #[error("{0} already registered")]
    Conflict(String),

    /// Unknown account or token.
    #[error("{0} not found")]
    NotFound(String),

    /// Wrong password. The message never reveals whether the email exists.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account is locked out after repeated credential failures.
    #[error("account temporarily locked")]
    Locked,

    /// Account is deactivated or otherwise not allowed to proceed.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// OTP mismatch or expiry.
    #[error("invalid or expired OTP")]
    InvalidOtp,

    /// Too many OTP requests in a short window.
    #[error("too many requests, wait before retrying")]
    RateLimited,

    /// Forged, malformed or expired bearer/reset token.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Optimistic-version check failed; the caller must re-read and retry.
    #[error("account was modified concurrently")]
    ConcurrencyConflict,

    /// Account store unavailable or misbehaving.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure (token encoding, hashing).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        AuthError::Database(e.to_string())
    }
}

/// Result type alias for Stayhub operations.
pub type Result<T> = std::result::Result<T, AuthError>;
