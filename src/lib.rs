//! Stayhub - account authentication backend for property owners.
//!
//! Handles registration, OTP-based email verification, password login
//! with lockout, JWT bearer tokens and password resets for a multi-tenant
//! property-management platform.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod notify;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{AuthError, Result};
