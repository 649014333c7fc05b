//! Request DTOs for the auth API.

use serde::Deserialize;
use validator::Validate;

/// Account registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name of the property.
    #[validate(length(min = 1, max = 120, message = "Property name is required"))]
    pub property_name: String,
    /// Display name of the owner.
    #[validate(length(min = 1, max = 120, message = "Owner name is required"))]
    pub owner_name: String,
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Phone number (10 digits).
    #[validate(length(min = 10, max = 14, message = "Invalid phone number"))]
    pub phone: String,
    /// Password.
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
    /// Password confirmation.
    pub confirm_password: String,
    /// City.
    pub city: Option<String>,
    /// State.
    pub state: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Postal code.
    pub pincode: Option<String>,
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Email OTP verification request.
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    /// Email address the OTP was sent to.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Six-digit code.
    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
}

/// OTP resend request.
#[derive(Debug, Deserialize, Validate)]
pub struct ResendOtpRequest {
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Password-reset initiation request.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Password-reset completion request.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// Token from the reset email.
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,
    /// New password.
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub new_password: String,
    /// Password confirmation.
    pub confirm_password: String,
}

/// Token refresh request.
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    /// Refresh token from login.
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Email availability query.
#[derive(Debug, Deserialize)]
pub struct EmailAvailabilityQuery {
    /// Email address to check.
    pub email: String,
}

/// Mobile-number availability query.
#[derive(Debug, Deserialize)]
pub struct MobileAvailabilityQuery {
    /// Mobile number to check.
    pub mobile: String,
}
