//! Test helpers for integration tests.
//!
//! Provides a recording notifier, service builders and an HTTP test
//! server over an in-memory database.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum_test::TestServer;

use stayhub::auth::{AuthPolicy, AuthService, TokenIssuer};
use stayhub::config::{AuthPolicyConfig, JwtConfig};
use stayhub::db::{Database, SqliteAccountStore};
use stayhub::notify::Notifier;
use stayhub::web::{create_health_router, create_router, AppState};

/// Notifier stub that records every dispatched message instead of
/// sending anything.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
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
    /// Last OTP code dispatched, if any.
    pub fn last_otp(&self) -> Option<String> {
        self.otps.lock().unwrap().last().map(|(_, otp)| otp.clone())
    }

    /// Last reset token dispatched, if any.
    pub fn last_reset_token(&self) -> Option<String> {
        self.resets
            .lock()
            .unwrap()
            .last()
            .map(|(_, token)| token.clone())
    }

    /// Number of OTP emails dispatched.
    pub fn otp_count(&self) -> usize {
        self.otps.lock().unwrap().len()
    }

    /// Number of reset emails dispatched.
    pub fn reset_count(&self) -> usize {
        self.resets.lock().unwrap().len()
    }
}

/// Everything a test needs to drive the service directly.
pub struct TestContext {
    pub service: Arc<AuthService>,
    pub notifier: Arc<RecordingNotifier>,
    pub store: Arc<SqliteAccountStore>,
}

/// Default test policy: short-ish but realistic knobs.
pub fn test_policy() -> AuthPolicyConfig {
    AuthPolicyConfig::default()
}

/// JWT config used across tests.
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-for-testing-only".to_string(),
        access_token_ttl_secs: 900,
        refresh_token_ttl_secs: 604_800,
    }
}

/// Build an auth service over a fresh in-memory database.
pub async fn test_context_with_policy(policy: AuthPolicyConfig) -> TestContext {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let store = Arc::new(SqliteAccountStore::new(db.pool().clone()));
    let notifier = Arc::new(RecordingNotifier::default());
    let tokens = TokenIssuer::new(&test_jwt_config());
    let service = Arc::new(AuthService::new(
        store.clone(),
        notifier.clone(),
        tokens,
        AuthPolicy::from(&policy),
    ));
    TestContext {
        service,
        notifier,
        store,
    }
}

/// Build an auth service with the default test policy.
pub async fn test_context() -> TestContext {
    test_context_with_policy(test_policy()).await
}

/// Create an HTTP test server with an in-memory database.
pub async fn create_test_server() -> (TestServer, Arc<RecordingNotifier>) {
    let context = test_context().await;
    let issuer = Arc::new(context.service.token_issuer().clone());
    let router = create_router(
        AppState {
            auth: context.service.clone(),
        },
        issuer,
        &[],
    )
    .merge(create_health_router());

    let server = TestServer::new(router).expect("Failed to create test server");
    (server, context.notifier)
}
