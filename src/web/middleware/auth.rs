//! JWT authentication middleware.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{Claims, TokenIssuer};
use crate::web::error::ApiError;

/// Extractor for authenticated accounts.
///
/// Use this extractor to require authentication for a handler. The
/// handler receives the token claims if the bearer token is a valid
/// access token; refresh tokens are rejected at this boundary.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = parts
                .headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|header| header.strip_prefix("Bearer "))
                .ok_or_else(|| ApiError::unauthorized("Missing authorization"))?;

            // Issuer is injected into extensions by the jwt_auth middleware
            let issuer = parts
                .extensions
                .get::<Arc<TokenIssuer>>()
                .ok_or_else(|| ApiError::internal("Token issuer not configured"))?;

            let claims = issuer.verify(token).map_err(|e| {
                tracing::debug!("bearer token rejected: {}", e);
                ApiError::unauthorized("Invalid or expired token")
            })?;

            if claims.is_refresh() {
                return Err(ApiError::unauthorized(
                    "Refresh tokens cannot be used for API access",
                ));
            }

            Ok(AuthUser(claims))
        })
    }
}

/// Middleware function to inject the token issuer into request extensions.
pub async fn jwt_auth(
    issuer: Arc<TokenIssuer>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(issuer);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&JwtConfig {
            secret: "test-secret".to_string(),
            access_token_ttl_secs: 3600,
            refresh_token_ttl_secs: 604_800,
        })
    }

    #[test]
    fn test_access_token_accepted() {
        let issuer = issuer();
        let token = issuer.issue_access_token("a@x.com", 1).unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert!(!claims.is_refresh());
    }

    #[test]
    fn test_refresh_token_flagged() {
        let issuer = issuer();
        let token = issuer.issue_refresh_token("a@x.com", 1).unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert!(claims.is_refresh());
    }
}
