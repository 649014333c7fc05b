//! Configuration module for Stayhub.

use serde::Deserialize;
use std::path::Path;

use crate::{AuthError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins (empty = allow any).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/stayhub.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Bearer-token configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Symmetric signing secret. Must be overridden in production.
    #[serde(default = "default_jwt_secret")]
    pub secret: String,
    /// Access token time-to-live in seconds.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: u64,
    /// Refresh token time-to-live in seconds.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_secs: u64,
}

fn default_jwt_secret() -> String {
    "change-me-stayhub-development-secret".to_string()
}

fn default_access_ttl() -> u64 {
    3600
}

fn default_refresh_ttl() -> u64 {
    604_800
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_jwt_secret(),
            access_token_ttl_secs: default_access_ttl(),
            refresh_token_ttl_secs: default_refresh_ttl(),
        }
    }
}

/// Authentication policy knobs.
///
/// These are deployment policy, not business logic, so they live in the
/// config file rather than in code.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPolicyConfig {
    /// OTP validity window in seconds.
    #[serde(default = "default_otp_validity")]
    pub otp_validity_secs: u64,
    /// Maximum OTP verification attempts (recorded per account).
    #[serde(default = "default_otp_max_attempts")]
    pub otp_max_attempts: i64,
    /// Minimum seconds between OTP resend requests.
    #[serde(default = "default_otp_resend_cooldown")]
    pub otp_resend_cooldown_secs: u64,
    /// Failed logins before the account is locked.
    #[serde(default = "default_lockout_threshold")]
    pub lockout_threshold: i64,
    /// Lockout duration in seconds.
    #[serde(default = "default_lockout_duration")]
    pub lockout_duration_secs: u64,
    /// Password-reset token validity in seconds.
    #[serde(default = "default_reset_token_validity")]
    pub reset_token_validity_secs: u64,
}

fn default_otp_validity() -> u64 {
    300
}

fn default_otp_max_attempts() -> i64 {
    3
}

fn default_otp_resend_cooldown() -> u64 {
    60
}

fn default_lockout_threshold() -> i64 {
    5
}

fn default_lockout_duration() -> u64 {
    1800
}

fn default_reset_token_validity() -> u64 {
    3600
}

impl Default for AuthPolicyConfig {
    fn default() -> Self {
        Self {
            otp_validity_secs: default_otp_validity(),
            otp_max_attempts: default_otp_max_attempts(),
            otp_resend_cooldown_secs: default_otp_resend_cooldown(),
            lockout_threshold: default_lockout_threshold(),
            lockout_duration_secs: default_lockout_duration(),
            reset_token_validity_secs: default_reset_token_validity(),
        }
    }
}

/// Outbound mail configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MailerConfig {
    /// HTTP mail-API endpoint messages are POSTed to.
    #[serde(default = "default_mailer_endpoint")]
    pub endpoint: String,
    /// API key for the mail provider.
    #[serde(default)]
    pub api_key: String,
    /// From address.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// From display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Public website URL used in password-reset links.
    #[serde(default = "default_website_url")]
    pub website_url: String,
    /// Support contact shown in mail footers.
    #[serde(default = "default_support_email")]
    pub support_email: String,
}

fn default_mailer_endpoint() -> String {
    "http://localhost:8025/api/send".to_string()
}

fn default_from_email() -> String {
    "no-reply@stayhub.example".to_string()
}

fn default_from_name() -> String {
    "Stayhub Team".to_string()
}

fn default_website_url() -> String {
    "https://stayhub.example".to_string()
}

fn default_support_email() -> String {
    "support@stayhub.example".to_string()
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_mailer_endpoint(),
            api_key: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            website_url: default_website_url(),
            support_email: default_support_email(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file (empty = console only).
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Bearer-token settings.
    #[serde(default)]
    pub jwt: JwtConfig,
    /// Authentication policy.
    #[serde(default)]
    pub auth: AuthPolicyConfig,
    /// Outbound mail settings.
    #[serde(default)]
    pub mailer: MailerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AuthError::Config(e.to_string()))
    }
}
