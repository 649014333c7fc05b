//! Account model for Stayhub.
//!
//! The `Account` aggregate owns all verification, throttling and reset
//! state; it is mutated only by the auth service.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};

/// Manual verification state of a property-owner account.
///
/// Orthogonal to email verification: `email_verified` proves control of the
/// mailbox, this status tracks back-office vetting of the property itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerificationStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Approved.
    Verified,
    /// Rejected.
    Rejected,
}

impl VerificationStatus {
    /// Convert to the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VerificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(VerificationStatus::Pending),
            "verified" => Ok(VerificationStatus::Verified),
            "rejected" => Ok(VerificationStatus::Rejected),
            _ => Err(format!("unknown verification status: {s}")),
        }
    }
}

/// Property-owner account record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID.
    pub id: i64,
    /// Display name of the property.
    pub property_name: String,
    /// Display name of the owner.
    pub owner_name: String,
    /// Email address (unique, stored lower-cased).
    pub email: String,
    /// Phone number (unique).
    pub phone: String,
    /// Password hash (Argon2 PHC string). Never serialized outward.
    pub password_hash: String,
    /// City (optional profile field).
    pub city: Option<String>,
    /// State (optional profile field).
    pub state: Option<String>,
    /// Country (optional profile field).
    pub country: Option<String>,
    /// Postal code (optional profile field).
    pub pincode: Option<String>,
    /// Whether the account is active. Deactivation is a flag flip,
    /// records are never hard-deleted.
    pub is_active: bool,
    /// Whether the email address has been verified via OTP.
    pub email_verified: bool,
    /// Manual verification status as stored (see [`Account::status`]).
    pub verification_status: String,
    /// Outstanding email OTP, if any.
    pub email_otp: Option<String>,
    /// Expiry of the outstanding OTP.
    pub otp_expiry: Option<DateTime<Utc>>,
    /// Failed OTP verification attempts since the last success.
    pub otp_attempts: i64,
    /// When an OTP was last requested (resend throttling).
    pub last_otp_request: Option<DateTime<Utc>>,
    /// Consecutive failed login attempts.
    pub login_attempts: i64,
    /// Login suspended until this time, if set.
    pub locked_until: Option<DateTime<Utc>>,
    /// Outstanding password-reset token, if any.
    pub reset_token: Option<String>,
    /// Expiry of the outstanding reset token.
    pub reset_expiry: Option<DateTime<Utc>>,
    /// Last successful login.
    pub last_login: Option<DateTime<Utc>>,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
    /// Optimistic-concurrency token, bumped on every save.
    pub version: i64,
}

impl Account {
    /// Get the verification status as an enum.
    ///
    /// Unknown database values fall back to `Pending`.
    pub fn status(&self) -> VerificationStatus {
        self.verification_status.parse().unwrap_or_default()
    }

    /// Check whether login is currently locked out.
    pub fn is_locked(&self) -> bool {
        matches!(self.locked_until, Some(until) if Utc::now() < until)
    }

    /// Check whether the outstanding OTP has expired.
    ///
    /// No OTP counts as expired: there is nothing left to verify.
    pub fn is_otp_expired(&self) -> bool {
        match self.otp_expiry {
            Some(expiry) => Utc::now() > expiry,
            None => true,
        }
    }

    /// Check whether the outstanding reset token has expired.
    pub fn is_reset_token_expired(&self) -> bool {
        match self.reset_expiry {
            Some(expiry) => Utc::now() > expiry,
            None => true,
        }
    }

    /// Store a fresh OTP with the given validity window.
    pub fn set_otp(&mut self, otp: String, validity: Duration) {
        self.email_otp = Some(otp);
        self.otp_expiry = Some(Utc::now() + validity);
    }

    /// Clear all OTP state after a successful verification.
    pub fn clear_otp(&mut self) {
        self.email_otp = None;
        self.otp_expiry = None;
        self.otp_attempts = 0;
    }

    /// Count a failed OTP verification.
    pub fn record_failed_otp(&mut self) {
        self.otp_attempts += 1;
    }

    /// Count a failed login, locking the account once the threshold is hit.
    pub fn record_failed_login(&mut self, threshold: i64, lock_duration: Duration) {
        self.login_attempts += 1;
        if self.login_attempts >= threshold {
            self.locked_until = Some(Utc::now() + lock_duration);
        }
    }

    /// Reset the login counter and clear any lockout.
    pub fn clear_login_failures(&mut self) {
        self.login_attempts = 0;
        self.locked_until = None;
    }

    /// Build the read-only principal view for this account.
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            email: self.email.clone(),
            owner_name: self.owner_name.clone(),
            property_name: self.property_name.clone(),
            is_active: self.is_active,
            email_verified: self.email_verified,
            verification_status: self.status(),
        }
    }
}

/// Data for creating a new account.
///
/// The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Display name of the property.
    pub property_name: String,
    /// Display name of the owner.
    pub owner_name: String,
    /// Email address (lower-cased by the caller).
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Password hash (Argon2 PHC string).
    pub password_hash: String,
    /// City.
    pub city: Option<String>,
    /// State.
    pub state: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Postal code.
    pub pincode: Option<String>,
}

impl NewAccount {
    /// Create a new account with the required fields.
    pub fn new(
        property_name: impl Into<String>,
        owner_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            owner_name: owner_name.into(),
            email: email.into(),
            phone: phone.into(),
            password_hash: password_hash.into(),
            city: None,
            state: None,
            country: None,
            pincode: None,
        }
    }

    /// Set the location profile fields.
    pub fn with_location(
        mut self,
        city: Option<String>,
        state: Option<String>,
        country: Option<String>,
        pincode: Option<String>,
    ) -> Self {
        self.city = city;
        self.state = state;
        self.country = country;
        self.pincode = pincode;
        self
    }
}

/// Narrow read-only view of an account, built fresh per request.
///
/// This is what authenticated handlers see; it never carries credential
/// or counter state.
#[derive(Debug, Clone)]
pub struct Principal {
    /// Account ID.
    pub id: i64,
    /// Email address.
    pub email: String,
    /// Owner display name.
    pub owner_name: String,
    /// Property display name.
    pub property_name: String,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether the email has been verified.
    pub email_verified: bool,
    /// Manual verification status.
    pub verification_status: VerificationStatus,
}
