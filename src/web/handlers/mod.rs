//! Handlers for the Web API.

use std::sync::Arc;

use crate::auth::AuthService;

pub mod auth;

/// Shared application state for handlers.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service.
    pub auth: Arc<AuthService>,
}
