//! Issuing, verifying and digesting signed tokens.
//!
//! Four token kinds exist, each signed with its own secret:
//!
//! | Kind | Claims | Lifetime |
//! |---|---|---|
//! | access | `sub`, `email` | `ACCESS_TOKEN_TTL_SECONDS` |
//! | refresh | `sub`, `email` | `REFRESH_TOKEN_TTL_SECONDS` |
//! | verification | `email` | 1 hour |
//! | password reset | `email` | 1 hour |
//!
//! Refresh, verification and reset tokens are also persisted on the user row,
//! but only as HMAC-SHA256 digests keyed by the secret of their kind.

use chrono::Utc;
use hmac::{Hmac, Mac};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use sha2::Sha256;

use crate::config::TokenSecrets;
use crate::error::AppError;
use crate::utils::code_generator::fill_random;

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of verification and password reset tokens.
pub const ACTION_TOKEN_TTL_SECONDS: i64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
    Verification,
    PasswordReset,
}

/// Claims carried by access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Claims carried by verification and password reset tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionClaims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Signs and verifies JWTs for every token kind.
pub struct TokenService {
    secrets: TokenSecrets,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl TokenService {
    pub fn new(secrets: TokenSecrets, access_ttl_seconds: i64, refresh_ttl_seconds: i64) -> Self {
        Self {
            secrets,
            access_ttl_seconds,
            refresh_ttl_seconds,
        }
    }

    fn secret(&self, kind: TokenKind) -> &str {
        match kind {
            TokenKind::Access => &self.secrets.access,
            TokenKind::Refresh => &self.secrets.refresh,
            TokenKind::Verification => &self.secrets.verification,
            TokenKind::PasswordReset => &self.secrets.password_reset,
        }
    }

    /// Returns the hex HMAC-SHA256 of `token`, keyed by the secret of `kind`.
    ///
    /// This is the only form in which tokens are stored or compared.
    pub fn digest(&self, kind: TokenKind, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret(kind).as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    pub fn issue_access(&self, user_id: i64, email: &str) -> Result<String, AppError> {
        self.issue_session(TokenKind::Access, user_id, email, self.access_ttl_seconds)
    }

    pub fn issue_refresh(&self, user_id: i64, email: &str) -> Result<String, AppError> {
        self.issue_session(TokenKind::Refresh, user_id, email, self.refresh_ttl_seconds)
    }

    pub fn issue_verification(&self, email: &str) -> Result<String, AppError> {
        self.issue_action(TokenKind::Verification, email)
    }

    pub fn issue_password_reset(&self, email: &str) -> Result<String, AppError> {
        self.issue_action(TokenKind::PasswordReset, email)
    }

    /// Verifies an access token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for a bad signature, an expired token
    /// or a token of another kind.
    pub fn verify_access(&self, token: &str) -> Result<SessionClaims, AppError> {
        self.decode(TokenKind::Access, token).map_err(|e| {
            tracing::debug!("Access token rejected: {}", e);
            AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid or expired token" }))
        })
    }

    /// Verifies a refresh token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for invalid or expired tokens.
    pub fn verify_refresh(&self, token: &str) -> Result<SessionClaims, AppError> {
        self.decode(TokenKind::Refresh, token)
            .map_err(|e| invalid_token(TokenKind::Refresh, e))
    }

    pub fn verify_verification(&self, token: &str) -> Result<ActionClaims, AppError> {
        self.decode(TokenKind::Verification, token)
            .map_err(|e| invalid_token(TokenKind::Verification, e))
    }

    pub fn verify_password_reset(&self, token: &str) -> Result<ActionClaims, AppError> {
        self.decode(TokenKind::PasswordReset, token)
            .map_err(|e| invalid_token(TokenKind::PasswordReset, e))
    }

    fn issue_session(
        &self,
        kind: TokenKind,
        user_id: i64,
        email: &str,
        ttl_seconds: i64,
    ) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user_id,
            email: email.to_string(),
            iat: now,
            exp: now + ttl_seconds,
            jti: token_id()?,
        };
        self.encode(kind, &claims)
    }

    fn issue_action(&self, kind: TokenKind, email: &str) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = ActionClaims {
            email: email.to_string(),
            iat: now,
            exp: now + ACTION_TOKEN_TTL_SECONDS,
            jti: token_id()?,
        };
        self.encode(kind, &claims)
    }

    fn encode<C: Serialize>(&self, kind: TokenKind, claims: &C) -> Result<String, AppError> {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.secret(kind).as_bytes()),
        )
        .map_err(|e| {
            tracing::error!("Failed to sign {:?} token: {}", kind, e);
            AppError::internal("Failed to issue token", json!({}))
        })
    }

    fn decode<C: DeserializeOwned>(
        &self,
        kind: TokenKind,
        token: &str,
    ) -> Result<C, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        jsonwebtoken::decode::<C>(
            token,
            &DecodingKey::from_secret(self.secret(kind).as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }
}

fn invalid_token(kind: TokenKind, e: jsonwebtoken::errors::Error) -> AppError {
    tracing::debug!("{:?} token rejected: {}", kind, e);
    AppError::bad_request("Invalid or expired token", json!({}))
}

/// Random token identifier so that two tokens issued in the same second differ.
fn token_id() -> Result<String, AppError> {
    let mut buffer = [0u8; 16];
    fill_random(&mut buffer)?;
    Ok(hex::encode(buffer))
}
