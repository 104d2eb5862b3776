// src/services/token.rs
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub id: Value,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("auth is not configured")]
    Disabled,

    #[error("token lifetime must be a finite number of hours")]
    InvalidLifetime,

    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Signs and checks HS256 tokens with the shared auth secret.
#[derive(Clone)]
pub struct TokenService {
    secret: Option<String>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret: secret.filter(|s| !s.is_empty()) }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Constant-time comparison of a caller-supplied key with the secret.
    /// An unset secret matches only the empty key.
    pub fn key_matches(&self, key: &str) -> bool {
        let secret = self.secret.as_deref().unwrap_or_default();
        bool::from(secret.as_bytes().ct_eq(key.as_bytes()))
    }

    /// Issue a token for `user_id` that expires `hours` from now.
    pub fn issue(&self, user_id: Value, hours: f64) -> Result<String, TokenError> {
        self.issue_at(user_id, hours, Utc::now().timestamp())
    }

    fn issue_at(&self, user_id: Value, hours: f64, issued_at: i64) -> Result<String, TokenError> {
        let secret = self.secret.as_deref().ok_or(TokenError::Disabled)?;
        let lifetime = (hours * 3600.0).round();
        if !lifetime.is_finite() || lifetime.abs() >= i64::MAX as f64 {
            return Err(TokenError::InvalidLifetime);
        }
        let exp = issued_at
            .checked_add(lifetime as i64)
            .ok_or(TokenError::InvalidLifetime)?;

        let claims = Claims { id: user_id, iat: issued_at, exp };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Check signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let secret = self.secret.as_deref().ok_or(TokenError::Disabled)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }
}
