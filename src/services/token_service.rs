use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use thiserror::Error;

use crate::types::internal::{Claims, Role};

/// Errors from JWT generation and validation
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("invalid or malformed token")]
    Invalid,

    #[error("token has expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Manages JWT access-token generation and validation
pub struct TokenService {
    jwt_secret: String,
    jwt_expiration_minutes: i64,
}

impl TokenService {
    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            jwt_expiration_minutes: 15,
        }
    }

    /// Number of seconds an issued token stays valid.
    pub fn expires_in(&self) -> i64 {
        self.jwt_expiration_minutes * 60
    }

    /// Generate a JWT carrying the user's id and role.
    pub fn generate_jwt(&self, user_id: &str, role: Role) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            exp: now + self.expires_in(),
            iat: now,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate a JWT and return the claims.
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        Ok(token_data.claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const TEST_SECRET: &str = "test-secret-key-minimum-32-characters-long";

    #[test]
    fn test_generate_jwt_round_trips_claims() {
        let service = TokenService::new(TEST_SECRET.to_string());

        let token = service.generate_jwt("user-1", Role::Staff).unwrap();
        let claims = service.validate_jwt(&token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, "staff");
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_validate_jwt_rejects_wrong_secret() {
        let service = TokenService::new(TEST_SECRET.to_string());
        let other = TokenService::new("another-secret-key-minimum-32-chars".to_string());

        let token = service.generate_jwt("user-1", Role::Parent).unwrap();

        match other.validate_jwt(&token) {
            Err(TokenError::Invalid) => {}
            other => panic!("Expected Invalid, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_validate_jwt_rejects_expired_token() {
        let service = TokenService::new(TEST_SECRET.to_string());

        let now = Utc::now().timestamp();
        let expired_claims = Claims {
            sub: "user-1".to_string(),
            role: "parent".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };

        let expired_token = encode(
            &Header::new(Algorithm::HS256),
            &expired_claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        match service.validate_jwt(&expired_token) {
            Err(TokenError::Expired) => {}
            other => panic!("Expected Expired, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_validate_jwt_rejects_garbage() {
        let service = TokenService::new(TEST_SECRET.to_string());

        match service.validate_jwt("not-a-jwt") {
            Err(TokenError::Invalid) => {}
            other => panic!("Expected Invalid, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let service = TokenService::new("super-secret-value".to_string());
        let debug_output = format!("{:?}", service);

        assert!(debug_output.contains("<redacted>"));
        assert!(!debug_output.contains("super-secret-value"));
    }
}
