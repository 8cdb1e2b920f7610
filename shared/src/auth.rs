//! Password hashing and JWT issuance/verification

use crate::{config::AuthConfig, error::AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_ttl: Duration,
    bcrypt_cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub email: String,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
    pub jti: String, // JWT ID
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: String,
    pub email: String,
}

impl AuthService {
    pub fn new(config: &AuthConfig) -> Result<Self> {
        if config.jwt_secret.is_empty() {
            return Err(AppError::configuration("JWT secret must not be empty"));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_token_ttl: Duration::seconds(config.access_token_ttl_seconds as i64),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Lower bcrypt cost, for tests only.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Issue an access token for an authenticated user
    pub fn issue_token(&self, user_id: &str, email: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: (now + self.access_token_ttl).timestamp(),
            iat: now.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate access token: {}", e)))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(JWT_ALGORITHM);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::authentication("Invalid token")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid token signature")
                }
                _ => AppError::authentication(format!("Token validation failed: {}", e)),
            })?;

        Ok(token_data.claims)
    }

    /// Extract user context from token
    pub fn extract_user_context(&self, token: &str) -> Result<UserContext> {
        let claims = self.validate_token(token)?;
        if claims.sub.is_empty() {
            return Err(AppError::authentication("Token has no subject"));
        }

        Ok(UserContext {
            user_id: claims.sub,
            email: claims.email,
        })
    }

    /// Hash password
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.bcrypt_cost)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify password
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash)
            .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))
    }

    /// Extract token from Authorization header
    pub fn extract_token_from_header<'a>(&self, auth_header: &'a str) -> Result<&'a str> {
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::authentication("Invalid authorization header format"))?
            .trim();

        if token.is_empty() {
            return Err(AppError::authentication("Empty token"));
        }

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(ttl_seconds: u64) -> AuthService {
        AuthService::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            access_token_ttl_seconds: ttl_seconds,
        })
        .unwrap()
        .with_bcrypt_cost(4)
    }

    #[test]
    fn issued_token_round_trips() {
        let auth = service(3600);
        let token = auth.issue_token("user-1", "a@example.com").unwrap();

        let context = auth.extract_user_context(&token).unwrap();
        assert_eq!(context.user_id, "user-1");
        assert_eq!(context.email, "a@example.com");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = AuthService::new(&AuthConfig {
            jwt_secret: "other-secret".to_string(),
            access_token_ttl_seconds: 3600,
        })
        .unwrap();
        let token = other.issue_token("user-1", "a@example.com").unwrap();

        let err = service(3600).validate_token(&token).unwrap_err();
        assert!(matches!(err, AppError::Authentication { .. }));
    }

    #[test]
    fn password_hash_verifies() {
        let auth = service(3600);
        let digest = auth.hash_password("hunter2").unwrap();

        assert!(auth.verify_password("hunter2", &digest).unwrap());
        assert!(!auth.verify_password("hunter3", &digest).unwrap());
    }

    #[test]
    fn bearer_prefix_is_required() {
        let auth = service(3600);
        assert_eq!(auth.extract_token_from_header("Bearer abc").unwrap(), "abc");
        assert!(auth.extract_token_from_header("Bearer ").is_err());
        assert!(auth.extract_token_from_header("Basic abc").is_err());
    }

    #[test]
    fn empty_secret_is_a_configuration_error() {
        let result = AuthService::new(&AuthConfig {
            jwt_secret: String::new(),
            access_token_ttl_seconds: 60,
        });
        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }
}
