//! Response DTOs for the auth API.

use serde::Serialize;

use crate::auth::AuthOutcome;
use crate::db::Principal;

/// Response for login, registration and OTP verification.
///
/// Token fields are present only once the email is verified.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Always true; error responses use the error envelope instead.
    pub success: bool,
    /// Human-readable status message.
    pub message: String,
    /// Bearer access token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Refresh token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token type for the Authorization header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Access-token lifetime in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    /// Account ID.
    pub account_id: i64,
    /// Email address.
    pub email: String,
    /// Property display name.
    pub property_name: String,
    /// Owner display name.
    pub owner_name: String,
    /// Whether the email address is verified.
    pub email_verified: bool,
    /// Manual verification status of the property.
    pub verification_status: String,
    /// Set when the caller must complete OTP verification first.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub requires_otp_verification: bool,
}

impl AuthResponse {
    /// Build a response from a service outcome.
    pub fn from_outcome(message: impl Into<String>, outcome: &AuthOutcome) -> Self {
        let account = &outcome.account;
        let tokens = outcome.tokens.as_ref();
        Self {
            success: true,
            message: message.into(),
            access_token: tokens.map(|t| t.access_token.clone()),
            refresh_token: tokens.map(|t| t.refresh_token.clone()),
            token_type: tokens.map(|_| "Bearer".to_string()),
            expires_in: tokens.map(|t| t.expires_in),
            account_id: account.id,
            email: account.email.clone(),
            property_name: account.property_name.clone(),
            owner_name: account.owner_name.clone(),
            email_verified: account.email_verified,
            verification_status: account.status().to_string(),
            requires_otp_verification: outcome.requires_otp_verification,
        }
    }
}

/// Response for token refresh.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Bearer access token.
    pub access_token: String,
    /// Refresh token (unchanged).
    pub refresh_token: String,
    /// Token type for the Authorization header.
    pub token_type: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
}

/// Response confirming an OTP was sent.
#[derive(Debug, Serialize)]
pub struct OtpResponse {
    /// Always true; error responses use the error envelope instead.
    pub success: bool,
    /// Human-readable status message.
    pub message: String,
    /// Email address the OTP was sent to.
    pub email: String,
    /// When the OTP expires (RFC 3339).
    pub expires_at: String,
}

/// Response for availability checks.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    /// Whether the identifier is free to register.
    pub available: bool,
}

/// Generic message-only response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Always true; error responses use the error envelope instead.
    pub success: bool,
    /// Human-readable status message.
    pub message: String,
}

impl MessageResponse {
    /// Build a success message response.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Authenticated account profile.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// Account ID.
    pub account_id: i64,
    /// Email address.
    pub email: String,
    /// Owner display name.
    pub owner_name: String,
    /// Property display name.
    pub property_name: String,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether the email address is verified.
    pub email_verified: bool,
    /// Manual verification status of the property.
    pub verification_status: String,
}

impl From<Principal> for MeResponse {
    fn from(p: Principal) -> Self {
        Self {
            account_id: p.id,
            email: p.email,
            owner_name: p.owner_name,
            property_name: p.property_name,
            is_active: p.is_active,
            email_verified: p.email_verified,
            verification_status: p.verification_status.to_string(),
        }
    }
}
