//! Bearer token issuance.
//!
//! # Design
//! Tokens are HS256 JWTs carrying the user id (`sub`) and email, stamped
//! with the configured issuer and audience and an expiry `ttl` after
//! issuance. The same `JwtSettings` feed whatever verifies tokens later, so
//! issuer and verifier never drift apart. There is no refresh or revocation:
//! a token is good until it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifetime of an issued token unless configured otherwise.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Claims embedded in every issued token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub iss: String,
    pub aud: String,
    /// Issued at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

/// Signing secret plus the identifiers stamped into tokens.
#[derive(Debug)]
pub struct JwtSettings {
    pub secret: SecretString,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl JwtSettings {
    pub fn new(secret: impl Into<String>, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            secret: SecretString::from(secret.into()),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("token expiry is out of range")]
    ExpiryOverflow,
}

/// Mints signed bearer tokens for verified identities.
pub struct TokenIssuer {
    key: EncodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            key: EncodingKey::from_secret(settings.secret.expose_secret().as_bytes()),
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            ttl: settings.ttl,
        }
    }

    /// Issue a token for `user_id` / `email`, valid from now.
    pub fn issue(&self, user_id: &str, email: &str) -> Result<String, AuthError> {
        self.issue_at(user_id, email, Utc::now())
    }

    pub fn issue_at(&self, user_id: &str, email: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let expires = now.checked_add_signed(self.ttl).ok_or(AuthError::ExpiryOverflow)?;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        Ok(jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.key)?)
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{DecodingKey, Validation};

    use super::*;

    const SECRET: &str = "your-test-secret-key-with-minimum-sixteen-characters";

    fn settings() -> JwtSettings {
        JwtSettings::new(SECRET, "test-issuer", "test-audience")
    }

    fn decode(token: &str) -> Claims {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&["test-issuer"]);
        validation.set_audience(&["test-audience"]);
        jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(SECRET.as_bytes()), &validation)
            .unwrap()
            .claims
    }

    #[test]
    fn token_carries_user_id_and_email() {
        let token = TokenIssuer::new(&settings()).issue("u1", "u1@x.com").unwrap();
        assert!(!token.is_empty());
        let claims = decode(&token);
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.email, "u1@x.com");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-audience");
    }

    #[test]
    fn token_expires_a_day_after_issuance() {
        let before = Utc::now().timestamp();
        let token = TokenIssuer::new(&settings()).issue("u1", "u1@x.com").unwrap();
        let claims = decode(&token);
        let day = Duration::hours(24).num_seconds();
        assert!((claims.iat - before).abs() <= 5);
        assert!((claims.exp - (before + day)).abs() <= 5);
    }

    #[test]
    fn same_instant_gives_same_token() {
        let issuer = TokenIssuer::new(&settings());
        let now = Utc::now();
        assert_eq!(
            issuer.issue_at("u1", "u1@x.com", now).unwrap(),
            issuer.issue_at("u1", "u1@x.com", now).unwrap()
        );
    }

    #[test]
    fn custom_ttl_is_applied() {
        let issuer = TokenIssuer::new(&settings().with_ttl(Duration::hours(1)));
        let now = Utc::now();
        let claims = decode(&issuer.issue_at("u1", "u1@x.com", now).unwrap());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn unrepresentable_expiry_is_an_error() {
        let ttl = Duration::try_hours(10_000_000_000).unwrap();
        let issuer = TokenIssuer::new(&settings().with_ttl(ttl));
        let err = issuer.issue("u1", "u1@x.com").unwrap_err();
        assert!(matches!(err, AuthError::ExpiryOverflow));
    }

    #[test]
    fn expired_token_fails_validation() {
        let issuer = TokenIssuer::new(&settings());
        let token = issuer
            .issue_at("u1", "u1@x.com", Utc::now() - Duration::hours(48))
            .unwrap();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&["test-issuer"]);
        validation.set_audience(&["test-audience"]);
        let result = jsonwebtoken::decode::<Claims>(&token, &DecodingKey::from_secret(SECRET.as_bytes()), &validation);
        assert!(result.is_err());
    }
}
