//! Account authentication and verification lifecycle.
//!
//! All state transitions for registration, email verification, login
//! throttling, password reset and token refresh happen here. The HTTP
//! layer only translates requests and responses.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::auth::{otp, password, token::TokenIssuer, validation};
use crate::config::AuthPolicyConfig;
use crate::db::{Account, AccountStore, NewAccount, Principal};
use crate::notify::Notifier;
use crate::{AuthError, Result};

/// Throttling and expiry policy, resolved from configuration.
#[derive(Debug, Clone)]
pub struct AuthPolicy {
    /// How long an OTP stays valid.
    pub otp_validity: Duration,
    /// Recorded ceiling for OTP attempts.
    pub otp_max_attempts: i64,
    /// Minimum gap between OTP sends for one account.
    pub otp_resend_cooldown: Duration,
    /// Failed logins before lockout.
    pub lockout_threshold: i64,
    /// How long a lockout lasts.
    pub lockout_duration: Duration,
    /// How long a password-reset token stays valid.
    pub reset_token_validity: Duration,
}

impl From<&AuthPolicyConfig> for AuthPolicy {
    fn from(config: &AuthPolicyConfig) -> Self {
        Self {
            otp_validity: Duration::seconds(config.otp_validity_secs as i64),
            otp_max_attempts: config.otp_max_attempts,
            otp_resend_cooldown: Duration::seconds(config.otp_resend_cooldown_secs as i64),
            lockout_threshold: config.lockout_threshold,
            lockout_duration: Duration::seconds(config.lockout_duration_secs as i64),
            reset_token_validity: Duration::seconds(config.reset_token_validity_secs as i64),
        }
    }
}

/// Input for account registration.
#[derive(Debug, Clone)]
pub struct RegisterData {
    pub property_name: String,
    pub owner_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
}

/// A freshly issued access/refresh token pair.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
}

/// Result of an operation that may or may not yield tokens.
///
/// Tokens are withheld until the email is verified; in that case
/// `requires_otp_verification` is set and a fresh OTP has been dispatched.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub account: Account,
    pub tokens: Option<IssuedTokens>,
    pub requires_otp_verification: bool,
}

/// Confirmation that an OTP was (re)issued.
#[derive(Debug, Clone)]
pub struct OtpIssued {
    pub email: String,
    pub expires_at: chrono::DateTime<Utc>,
}

/// The authentication service.
pub struct AuthService {
    store: Arc<dyn AccountStore>,
    notifier: Arc<dyn Notifier>,
    tokens: TokenIssuer,
    policy: AuthPolicy,
}

impl AuthService {
    /// Build the service over a store and notifier.
    pub fn new(
        store: Arc<dyn AccountStore>,
        notifier: Arc<dyn Notifier>,
        tokens: TokenIssuer,
        policy: AuthPolicy,
    ) -> Self {
        Self {
            store,
            notifier,
            tokens,
            policy,
        }
    }

    /// Register a new property-owner account.
    ///
    /// The account starts unverified; an OTP is dispatched to the email
    /// address and no tokens are issued until it is confirmed.
    pub async fn register(&self, data: RegisterData) -> Result<AuthOutcome> {
        validation::check_required(&data.property_name, "property name")?;
        validation::check_required(&data.owner_name, "owner name")?;
        let email = validation::normalize_email(&data.email);
        validation::check_email(&email)?;
        let phone = validation::normalize_phone(&data.phone);
        validation::check_phone(&phone)?;
        validation::check_passwords_match(&data.password, &data.confirm_password)?;

        if self.store.exists_by_email(&email).await? {
            return Err(AuthError::Conflict("email address".to_string()));
        }
        if self.store.exists_by_phone(&phone).await? {
            return Err(AuthError::Conflict("phone number".to_string()));
        }

        let password_hash = password::hash_password(&data.password)?;
        let new_account = NewAccount::new(
            data.property_name.trim(),
            data.owner_name.trim(),
            email,
            phone,
            password_hash,
        )
        .with_location(data.city, data.state, data.country, data.pincode);

        let mut account = self.store.create(new_account).await?;
        info!(account_id = account.id, "account registered");

        self.issue_otp(&mut account).await?;

        Ok(AuthOutcome {
            account,
            tokens: None,
            requires_otp_verification: true,
        })
    }

    /// Authenticate with email and password.
    pub async fn login(&self, email: &str, provided_password: &str) -> Result<AuthOutcome> {
        let email = validation::normalize_email(email);
        let mut account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AuthError::NotFound("account".to_string()))?;

        if !account.is_active {
            return Err(AuthError::Forbidden("account is deactivated".to_string()));
        }
        if account.is_locked() {
            warn!(account_id = account.id, "login attempt on locked account");
            return Err(AuthError::Locked);
        }

        if !password::verify_password(provided_password, &account.password_hash) {
            account.record_failed_login(self.policy.lockout_threshold, self.policy.lockout_duration);
            if account.is_locked() {
                warn!(account_id = account.id, "account locked after repeated failures");
            }
            self.store.save(&mut account).await?;
            return Err(AuthError::InvalidCredentials);
        }

        account.clear_login_failures();
        account.last_login = Some(Utc::now());

        if !account.email_verified {
            // Still unverified: renew the OTP instead of issuing tokens.
            self.set_fresh_otp(&mut account);
            self.store.save(&mut account).await?;
            self.dispatch_otp(&account);
            info!(account_id = account.id, "login deferred pending email verification");
            return Ok(AuthOutcome {
                account,
                tokens: None,
                requires_otp_verification: true,
            });
        }

        self.store.save(&mut account).await?;
        let tokens = self.issue_tokens(&account)?;
        info!(account_id = account.id, "login succeeded");
        Ok(AuthOutcome {
            account,
            tokens: Some(tokens),
            requires_otp_verification: false,
        })
    }

    /// Confirm an email address with the OTP that was sent to it.
    ///
    /// On success the OTP is consumed, the email is marked verified and a
    /// token pair is issued.
    pub async fn verify_otp(&self, email: &str, provided_otp: &str) -> Result<AuthOutcome> {
        let email = validation::normalize_email(email);
        let mut account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AuthError::NotFound("account".to_string()))?;

        if account.is_otp_expired() || !otp::otp_matches(account.email_otp.as_deref(), provided_otp)
        {
            account.record_failed_otp();
            self.store.save(&mut account).await?;
            return Err(AuthError::InvalidOtp);
        }

        account.clear_otp();
        account.email_verified = true;
        account.last_login = Some(Utc::now());
        self.store.save(&mut account).await?;
        info!(account_id = account.id, "email verified");

        let tokens = self.issue_tokens(&account)?;
        Ok(AuthOutcome {
            account,
            tokens: Some(tokens),
            requires_otp_verification: false,
        })
    }

    /// Re-send the verification OTP, subject to the resend cooldown.
    pub async fn resend_otp(&self, email: &str) -> Result<OtpIssued> {
        let email = validation::normalize_email(email);
        let mut account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AuthError::NotFound("account".to_string()))?;

        if account.email_verified {
            return Err(AuthError::Validation(
                "email is already verified".to_string(),
            ));
        }
        if let Some(last) = account.last_otp_request {
            if Utc::now() - last < self.policy.otp_resend_cooldown {
                return Err(AuthError::RateLimited);
            }
        }

        self.issue_otp(&mut account).await
    }

    /// Issue a verification OTP for an existing account, bypassing the
    /// resend cooldown. Intended for operator-triggered re-verification.
    pub async fn send_verification_email(&self, email: &str) -> Result<OtpIssued> {
        let email = validation::normalize_email(email);
        let mut account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AuthError::NotFound("account".to_string()))?;
        self.issue_otp(&mut account).await
    }

    /// Issue a fresh verification OTP for an account and dispatch it.
    pub async fn issue_otp(&self, account: &mut Account) -> Result<OtpIssued> {
        self.set_fresh_otp(account);
        self.store.save(account).await?;
        self.dispatch_otp(account);

        Ok(OtpIssued {
            email: account.email.clone(),
            // set_fresh_otp always populates otp_expiry
            expires_at: account.otp_expiry.unwrap_or_else(Utc::now),
        })
    }

    /// Start a password reset.
    ///
    /// Always reports success so callers cannot probe which emails are
    /// registered; a reset email goes out only for known accounts.
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let email = validation::normalize_email(email);
        let Some(mut account) = self.store.find_by_email(&email).await? else {
            info!("password reset requested for unknown email");
            return Ok(());
        };

        let reset_token = otp::generate_reset_token();
        account.reset_token = Some(reset_token.clone());
        account.reset_expiry = Some(Utc::now() + self.policy.reset_token_validity);
        self.store.save(&mut account).await?;

        self.notifier
            .send_password_reset_email(&account.email, &account.owner_name, &reset_token);
        info!(account_id = account.id, "password reset token issued");
        Ok(())
    }

    /// Complete a password reset with a token from the reset email.
    ///
    /// Tokens are single-use; a successful reset also clears any lockout.
    pub async fn reset_password(
        &self,
        reset_token: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<()> {
        validation::check_passwords_match(new_password, confirm_password)?;

        let mut account = self
            .store
            .find_by_reset_token(reset_token.trim())
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if account.is_reset_token_expired() {
            account.reset_token = None;
            account.reset_expiry = None;
            self.store.save(&mut account).await?;
            return Err(AuthError::InvalidToken);
        }

        account.password_hash = password::hash_password(new_password)?;
        account.reset_token = None;
        account.reset_expiry = None;
        account.clear_login_failures();
        self.store.save(&mut account).await?;
        info!(account_id = account.id, "password reset completed");
        Ok(())
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The refresh token itself is returned unchanged and stays valid
    /// until it expires.
    pub async fn refresh(&self, refresh_token: &str) -> Result<IssuedTokens> {
        let claims = self.tokens.verify_refresh(refresh_token)?;
        let account = self
            .store
            .find_by_id(claims.account_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !account.is_active {
            return Err(AuthError::Forbidden("account is deactivated".to_string()));
        }

        let access_token = self.tokens.issue_access_token(&account.email, account.id)?;
        Ok(IssuedTokens {
            access_token,
            refresh_token: refresh_token.to_string(),
            expires_in: self.tokens.access_ttl_secs(),
        })
    }

    /// Log out.
    ///
    /// Tokens are stateless and not tracked server-side, so this is a
    /// client-side discard; the short access-token lifetime bounds the
    /// exposure window.
    pub fn logout(&self) {
        info!("logout acknowledged");
    }

    /// Check whether an email address is free to register.
    pub async fn is_email_available(&self, email: &str) -> Result<bool> {
        let email = validation::normalize_email(email);
        Ok(!self.store.exists_by_email(&email).await?)
    }

    /// Check whether a mobile number is free to register.
    pub async fn is_mobile_available(&self, mobile: &str) -> Result<bool> {
        let mobile = validation::normalize_phone(mobile);
        Ok(!self.store.exists_by_phone(&mobile).await?)
    }

    /// Load the principal view for an authenticated account.
    pub async fn principal(&self, account_id: i64) -> Result<Principal> {
        let account = self
            .store
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AuthError::NotFound("account".to_string()))?;
        Ok(account.principal())
    }

    /// Access the token issuer (shared with the HTTP auth middleware).
    pub fn token_issuer(&self) -> &TokenIssuer {
        &self.tokens
    }

    fn set_fresh_otp(&self, account: &mut Account) {
        account.set_otp(otp::generate_otp(), self.policy.otp_validity);
        account.last_otp_request = Some(Utc::now());
    }

    fn dispatch_otp(&self, account: &Account) {
        if let Some(code) = account.email_otp.as_deref() {
            self.notifier.send_otp_email(
                &account.email,
                &account.owner_name,
                code,
                self.policy.otp_validity.num_minutes(),
            );
        }
    }

    fn issue_tokens(&self, account: &Account) -> Result<IssuedTokens> {
        Ok(IssuedTokens {
            access_token: self.tokens.issue_access_token(&account.email, account.id)?,
            refresh_token: self.tokens.issue_refresh_token(&account.email, account.id)?,
            expires_in: self.tokens.access_ttl_secs(),
        })
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::db::{Database, SqliteAccountStore};
    use std::sync::Mutex;

    /// Notifier stub that records every dispatched message.
    #[derive(Debug, Default)]
    struct RecordingNotifier {
        otps: Mutex<Vec<(String, String)>>,
        resets: Mutex<Vec<(String, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn send_otp_email(&self, to: &str, _owner_name: &str, otp: &str, _validity_minutes: i64) {
            self.otps
                .lock()
                .unwrap()
                .push((to.to_string(), otp.to_string()));
        }

        fn send_password_reset_email(&self, to: &str, _owner_name: &str, reset_token: &str) {
            self.resets
                .lock()
                .unwrap()
                .push((to.to_string(), reset_token.to_string()));
        }
    }

    impl RecordingNotifier {
        fn last_otp(&self) -> Option<String> {
            self.otps.lock().unwrap().last().map(|(_, otp)| otp.clone())
        }

        fn last_reset_token(&self) -> Option<String> {
            self.resets
                .lock()
                .unwrap()
                .last()
                .map(|(_, token)| token.clone())
        }

        fn otp_count(&self) -> usize {
            self.otps.lock().unwrap().len()
        }

        fn reset_count(&self) -> usize {
            self.resets.lock().unwrap().len()
        }
    }

    async fn test_service() -> (AuthService, Arc<RecordingNotifier>) {
        let db = Database::open_in_memory().await.unwrap();
        let store = Arc::new(SqliteAccountStore::new(db.pool().clone()));
        let notifier = Arc::new(RecordingNotifier::default());
        let tokens = TokenIssuer::new(&JwtConfig::default());
        let policy = AuthPolicy::from(&AuthPolicyConfig::default());
        let service = AuthService::new(store, notifier.clone(), tokens, policy);
        (service, notifier)
    }

    fn sample_registration() -> RegisterData {
        RegisterData {
            property_name: "Green Nest PG".to_string(),
            owner_name: "Asha".to_string(),
            email: "Asha@Example.com".to_string(),
            phone: "9999999999".to_string(),
            password: "sunrise-gate-77".to_string(),
            confirm_password: "sunrise-gate-77".to_string(),
            city: Some("Pune".to_string()),
            state: None,
            country: None,
            pincode: None,
        }
    }

    #[tokio::test]
    async fn test_register_dispatches_otp_and_withholds_tokens() {
        let (service, notifier) = test_service().await;
        let outcome = service.register(sample_registration()).await.unwrap();
        assert!(outcome.tokens.is_none());
        assert!(outcome.requires_otp_verification);
        assert_eq!(outcome.account.email, "asha@example.com");
        assert_eq!(notifier.otp_count(), 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (service, _) = test_service().await;
        service.register(sample_registration()).await.unwrap();

        let mut dup = sample_registration();
        dup.phone = "8888888888".to_string();
        let result = service.register(dup).await;
        assert!(matches!(result, Err(AuthError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_password_mismatch() {
        let (service, _) = test_service().await;
        let mut data = sample_registration();
        data.confirm_password = "different-pass".to_string();
        assert!(matches!(
            service.register(data).await,
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_otp_issues_tokens() {
        let (service, notifier) = test_service().await;
        service.register(sample_registration()).await.unwrap();
        let code = notifier.last_otp().unwrap();

        let outcome = service.verify_otp("asha@example.com", &code).await.unwrap();
        assert!(outcome.account.email_verified);
        assert!(outcome.tokens.is_some());
        assert!(outcome.account.email_otp.is_none());
    }

    #[tokio::test]
    async fn test_otp_is_single_use() {
        let (service, notifier) = test_service().await;
        service.register(sample_registration()).await.unwrap();
        let code = notifier.last_otp().unwrap();

        service.verify_otp("asha@example.com", &code).await.unwrap();
        let replay = service.verify_otp("asha@example.com", &code).await;
        assert!(matches!(replay, Err(AuthError::InvalidOtp)));
    }

    #[tokio::test]
    async fn test_wrong_otp_counts_attempt() {
        let (service, _) = test_service().await;
        let outcome = service.register(sample_registration()).await.unwrap();

        let result = service.verify_otp("asha@example.com", "000000").await;
        assert!(matches!(result, Err(AuthError::InvalidOtp)));

        let principal_source = service.store.find_by_id(outcome.account.id).await.unwrap();
        assert_eq!(principal_source.unwrap().otp_attempts, 1);
    }

    #[tokio::test]
    async fn test_login_before_verification_renews_otp() {
        let (service, notifier) = test_service().await;
        service.register(sample_registration()).await.unwrap();

        let outcome = service
            .login("asha@example.com", "sunrise-gate-77")
            .await
            .unwrap();
        assert!(outcome.tokens.is_none());
        assert!(outcome.requires_otp_verification);
        assert_eq!(notifier.otp_count(), 2); // registration + login renewal
    }

    #[tokio::test]
    async fn test_lockout_after_repeated_failures() {
        let (service, notifier) = test_service().await;
        service.register(sample_registration()).await.unwrap();
        let code = notifier.last_otp().unwrap();
        service.verify_otp("asha@example.com", &code).await.unwrap();

        for _ in 0..5 {
            let result = service.login("asha@example.com", "wrong-password").await;
            assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        }

        // Even the correct password is refused while locked.
        let locked = service.login("asha@example.com", "sunrise-gate-77").await;
        assert!(matches!(locked, Err(AuthError::Locked)));
    }

    #[tokio::test]
    async fn test_successful_login_resets_counter() {
        let (service, notifier) = test_service().await;
        service.register(sample_registration()).await.unwrap();
        let code = notifier.last_otp().unwrap();
        service.verify_otp("asha@example.com", &code).await.unwrap();

        for _ in 0..3 {
            let _ = service.login("asha@example.com", "wrong-password").await;
        }
        let outcome = service
            .login("asha@example.com", "sunrise-gate-77")
            .await
            .unwrap();
        assert_eq!(outcome.account.login_attempts, 0);
        assert!(outcome.account.last_login.is_some());
        assert!(outcome.tokens.is_some());
    }

    #[tokio::test]
    async fn test_resend_otp_cooldown() {
        let (service, _) = test_service().await;
        service.register(sample_registration()).await.unwrap();

        // Registration just sent one; an immediate resend is throttled.
        let result = service.resend_otp("asha@example.com").await;
        assert!(matches!(result, Err(AuthError::RateLimited)));
    }

    #[tokio::test]
    async fn test_send_verification_email_bypasses_cooldown() {
        let (service, notifier) = test_service().await;
        service.register(sample_registration()).await.unwrap();

        let issued = service
            .send_verification_email("asha@example.com")
            .await
            .unwrap();
        assert_eq!(issued.email, "asha@example.com");
        assert_eq!(notifier.otp_count(), 2);
    }

    #[tokio::test]
    async fn test_resend_otp_after_verification_rejected() {
        let (service, notifier) = test_service().await;
        service.register(sample_registration()).await.unwrap();
        let code = notifier.last_otp().unwrap();
        service.verify_otp("asha@example.com", &code).await.unwrap();

        let result = service.resend_otp("asha@example.com").await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_forgot_password_unknown_email_is_silent() {
        let (service, notifier) = test_service().await;
        service.forgot_password("nobody@example.com").await.unwrap();
        assert_eq!(notifier.reset_count(), 0);
    }

    #[tokio::test]
    async fn test_password_reset_round_trip() {
        let (service, notifier) = test_service().await;
        service.register(sample_registration()).await.unwrap();
        let code = notifier.last_otp().unwrap();
        service.verify_otp("asha@example.com", &code).await.unwrap();

        service.forgot_password("asha@example.com").await.unwrap();
        let token = notifier.last_reset_token().unwrap();

        service
            .reset_password(&token, "new-password-99", "new-password-99")
            .await
            .unwrap();

        // Old password no longer works, new one does.
        assert!(matches!(
            service.login("asha@example.com", "sunrise-gate-77").await,
            Err(AuthError::InvalidCredentials)
        ));
        let outcome = service
            .login("asha@example.com", "new-password-99")
            .await
            .unwrap();
        assert!(outcome.tokens.is_some());
    }

    #[tokio::test]
    async fn test_reset_token_is_single_use() {
        let (service, notifier) = test_service().await;
        service.register(sample_registration()).await.unwrap();
        service.forgot_password("asha@example.com").await.unwrap();
        let token = notifier.last_reset_token().unwrap();

        service
            .reset_password(&token, "new-password-99", "new-password-99")
            .await
            .unwrap();
        let replay = service
            .reset_password(&token, "another-pass-11", "another-pass-11")
            .await;
        assert!(matches!(replay, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_refresh_reuses_refresh_token() {
        let (service, notifier) = test_service().await;
        service.register(sample_registration()).await.unwrap();
        let code = notifier.last_otp().unwrap();
        let outcome = service.verify_otp("asha@example.com", &code).await.unwrap();
        let tokens = outcome.tokens.unwrap();

        let refreshed = service.refresh(&tokens.refresh_token).await.unwrap();
        assert_eq!(refreshed.refresh_token, tokens.refresh_token);
        assert_eq!(refreshed.expires_in, 3600);
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let (service, notifier) = test_service().await;
        service.register(sample_registration()).await.unwrap();
        let code = notifier.last_otp().unwrap();
        let outcome = service.verify_otp("asha@example.com", &code).await.unwrap();
        let tokens = outcome.tokens.unwrap();

        let result = service.refresh(&tokens.access_token).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_availability_checks() {
        let (service, _) = test_service().await;
        assert!(service.is_email_available("asha@example.com").await.unwrap());
        service.register(sample_registration()).await.unwrap();
        assert!(!service.is_email_available("ASHA@example.com").await.unwrap());
        assert!(!service.is_mobile_available("9999999999").await.unwrap());
        assert!(service.is_mobile_available("1234567890").await.unwrap());
    }
}
