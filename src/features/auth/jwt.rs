use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};

/// Token payload. Deliberately carries no role or admin claim; authorization
/// is re-derived from the stored user row on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates the HS256 bearer tokens used by the API.
pub struct JwtValidator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: Duration,
    leeway: Duration,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            expiry: config.jwt_expiry,
            leeway: config.jwt_leeway,
        }
    }

    /// Sign a token for the given user id.
    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + self.expiry.as_secs() as i64,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Validate signature and expiry, returning the claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.leeway = self.leeway.as_secs();

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {}", e);
                AppError::Unauthorized("Invalid or expired token".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(expiry_secs: u64, leeway_secs: u64) -> JwtValidator {
        JwtValidator::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiry: Duration::from_secs(expiry_secs),
            jwt_leeway: Duration::from_secs(leeway_secs),
        })
    }

    #[test]
    fn issue_and_validate_round_trip() {
        let v = validator(3600, 0);
        let user_id = Uuid::new_v4();
        let token = v.issue(user_id).unwrap();
        let claims = v.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_expired_token() {
        let v = validator(3600, 0);
        let now = Utc::now().timestamp();
        let stale = Claims {
            sub: Uuid::new_v4(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &stale,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(v.validate_token(&token).is_err());
    }

    #[test]
    fn rejects_token_signed_with_different_secret() {
        let issuer = validator(3600, 0);
        let other = JwtValidator::new(&AuthConfig {
            jwt_secret: "another-secret".to_string(),
            jwt_expiry: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(0),
        });

        let token = issuer.issue(Uuid::new_v4()).unwrap();
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn rejects_garbage() {
        let v = validator(3600, 0);
        assert!(v.validate_token("not-a-token").is_err());
    }
}
