//! Bearer-token issuance and verification.
//!
//! Access and refresh tokens are both HS512 JWTs signed with the same
//! secret; refresh tokens carry a `token_type` marker so they cannot be
//! replayed at the access boundary (and vice versa).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::{AuthError, Result};

/// Marker value stored in refresh-token claims.
const REFRESH_TOKEN_TYPE: &str = "refresh";

/// JWT claims carried by Stayhub tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account's email address.
    pub sub: String,
    /// Account ID.
    pub account_id: i64,
    /// Token kind marker; present only on refresh tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

impl Claims {
    /// Whether these claims belong to a refresh token.
    pub fn is_refresh(&self) -> bool {
        self.token_type.as_deref() == Some(REFRESH_TOKEN_TYPE)
    }
}

/// Issues and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Build an issuer from configuration.
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_ttl: Duration::seconds(config.access_token_ttl_secs as i64),
            refresh_ttl: Duration::seconds(config.refresh_token_ttl_secs as i64),
        }
    }

    /// Access-token lifetime in seconds, as reported to clients.
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Issue a short-lived access token.
    pub fn issue_access_token(&self, email: &str, account_id: i64) -> Result<String> {
        self.issue(email, account_id, self.access_ttl, None)
    }

    /// Issue a long-lived refresh token.
    pub fn issue_refresh_token(&self, email: &str, account_id: i64) -> Result<String> {
        self.issue(
            email,
            account_id,
            self.refresh_ttl,
            Some(REFRESH_TOKEN_TYPE.to_string()),
        )
    }

    fn issue(
        &self,
        email: &str,
        account_id: i64,
        ttl: Duration,
        token_type: Option<String>,
    ) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            account_id,
            token_type,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token encoding failed: {e}")))
    }

    /// Verify a token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Verify a token and require it to be a refresh token.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims> {
        let claims = self.verify(token)?;
        if !claims.is_refresh() {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}
