//! Bearer token issuance and verification
//!
//! Tokens are HS256 JWTs carrying the username as the subject. Verification
//! checks the signature, expiry, issuer, and audience; the signing secret
//! and both expected values come from [`crate::config::AuthConfig`].

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Claim set embedded in every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the authenticated user
    pub sub: String,
    pub iss: String,
    pub aud: String,
    /// Expiry as unix seconds
    pub exp: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Issue(#[source] jsonwebtoken::errors::Error),

    #[error("token rejected: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies bearer tokens with a shared symmetric secret
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    lifetime_minutes: i64,
}

impl TokenService {
    pub fn new(secret: &str, issuer: &str, audience: &str, lifetime_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            lifetime_minutes,
        }
    }

    /// Sign a token for `username` expiring `lifetime_minutes` from now
    pub fn issue(&self, username: &str) -> Result<String, TokenError> {
        let expires_at = Utc::now() + Duration::minutes(self.lifetime_minutes);
        let claims = Claims {
            sub: username.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: expires_at.timestamp().max(0) as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(TokenError::Issue)
    }

    /// Decode and validate a token, returning its claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

// ============================================================================
// Tests
// ============================================================================
