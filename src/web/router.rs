//! Router configuration for the Web API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::auth::TokenIssuer;

use super::handlers::{auth, AppState};
use super::middleware::{create_cors_layer, jwt_auth};

/// Create the main API router.
pub fn create_router(
    app_state: AppState,
    issuer: Arc<TokenIssuer>,
    cors_origins: &[String],
) -> Router {
    // Auth routes (no authentication required)
    let auth_public_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/verify-otp", post(auth::verify_otp))
        .route("/resend-otp", post(auth::resend_otp))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route("/refresh-token", post(auth::refresh_token))
        .route("/check-email", get(auth::check_email))
        .route("/check-mobile", get(auth::check_mobile));

    // Auth routes (authentication required)
    let auth_protected_routes = Router::new().route("/me", get(auth::me));

    let auth_routes = Router::new()
        .merge(auth_public_routes)
        .merge(auth_protected_routes);

    let api_routes = Router::new().nest("/auth", auth_routes);

    // Clone the issuer for the middleware closure
    let issuer_for_middleware = issuer.clone();

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let issuer = issuer_for_middleware.clone();
                    jwt_auth(issuer, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
