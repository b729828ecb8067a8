use crate::config::Config;
use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims encoded within a bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: i32,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Issues and verifies bearer tokens.
///
/// Built once from [`Config`] at startup and shared as app data, so the
/// signing secret is never read from the environment inside request
/// handling.
#[derive(Clone)]
pub struct TokenManager {
    secret: String,
    expires_hours: i64,
}

impl TokenManager {
    pub fn new(secret: impl Into<String>, expires_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expires_hours,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret.clone(), config.jwt_expires_hours)
    }

    /// Signs a token bound to `user_id`, expiring after the configured
    /// window (default 24 hours).
    pub fn issue(&self, user_id: i32) -> Result<String, AppError> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(chrono::Duration::hours(self.expires_hours))
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: user_id,
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature and expiry, returning the embedded user id.
    /// Any failure (bad signature, malformed token, past expiry) is a 401.
    pub fn verify(&self, token: &str) -> Result<i32, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid token.".into()))
    }
}
