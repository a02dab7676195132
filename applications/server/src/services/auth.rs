/// Authentication service - JWT and password handling
use crate::error::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use openmusic_core::{Fault, UserId};
use serde::{Deserialize, Serialize};

/// Message for any access token that fails verification
pub const INVALID_TOKEN: &str = "Invalid token";

/// Message for any refresh token that fails verification
pub const INVALID_REFRESH_TOKEN: &str = "Refresh token is invalid";

#[derive(Debug, Clone)]
pub struct AuthService {
    access_key: String,
    refresh_key: String,
    access_token_expiration: Duration,
    refresh_token_expiration: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
    pub token_type: TokenType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl AuthService {
    pub fn new(
        access_key: String,
        refresh_key: String,
        access_age_secs: u64,
        refresh_age_days: u64,
    ) -> Self {
        Self {
            access_key,
            refresh_key,
            access_token_expiration: Duration::seconds(access_age_secs as i64),
            refresh_token_expiration: Duration::days(refresh_age_days as i64),
        }
    }

    /// Hash a password using bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        Ok(bcrypt::verify(password, hash)?)
    }

    /// Create an access token
    pub fn create_access_token(&self, user_id: &UserId) -> Result<String> {
        self.create_token(
            user_id,
            TokenType::Access,
            &self.access_key,
            self.access_token_expiration,
        )
    }

    /// Create a refresh token
    pub fn create_refresh_token(&self, user_id: &UserId) -> Result<String> {
        self.create_token(
            user_id,
            TokenType::Refresh,
            &self.refresh_key,
            self.refresh_token_expiration,
        )
    }

    /// Verify an access token; any failure is a 401
    pub fn verify_access_token(&self, token: &str) -> Result<UserId> {
        let claims = Self::verify_token(token, &self.access_key, TokenType::Access)
            .ok_or_else(|| Fault::unauthorized(INVALID_TOKEN))?;
        Ok(UserId::new(claims.sub))
    }

    /// Verify a refresh token; any failure is a 400
    pub fn verify_refresh_token(&self, token: &str) -> Result<UserId> {
        let claims = Self::verify_token(token, &self.refresh_key, TokenType::Refresh)
            .ok_or_else(|| Fault::bad_request(INVALID_REFRESH_TOKEN))?;
        Ok(UserId::new(claims.sub))
    }

    fn verify_token(token: &str, key: &str, expected: TokenType) -> Option<Claims> {
        let decoding_key = DecodingKey::from_secret(key.as_bytes());
        let validation = Validation::default();

        match decode::<Claims>(token, &decoding_key, &validation) {
            Ok(data) if data.claims.token_type == expected => Some(data.claims),
            Ok(_) => {
                tracing::warn!("Rejected token: expected {:?} token", expected);
                None
            }
            Err(e) => {
                tracing::warn!("Rejected {:?} token: {}", expected, e);
                None
            }
        }
    }

    fn create_token(
        &self,
        user_id: &UserId,
        token_type: TokenType,
        key: &str,
        expiration: Duration,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + expiration;

        let claims = Claims {
            sub: user_id.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type,
        };

        let encoding_key = EncodingKey::from_secret(key.as_bytes());
        Ok(encode(&Header::default(), &claims, &encoding_key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new("access-secret".into(), "refresh-secret".into(), 1800, 30)
    }

    #[test]
    fn test_password_hashing() {
        let auth = service();
        let password = "my_secure_password";

        let hash = auth.hash_password(password).unwrap();
        assert!(auth.verify_password(password, &hash).unwrap());
        assert!(!auth.verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_token_creation_and_verification() {
        let auth = service();
        let user_id = UserId::new("user-123");

        let access_token = auth.create_access_token(&user_id).unwrap();
        assert_eq!(auth.verify_access_token(&access_token).unwrap(), user_id);

        let refresh_token = auth.create_refresh_token(&user_id).unwrap();
        assert_eq!(auth.verify_refresh_token(&refresh_token).unwrap(), user_id);
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let auth = service();
        let user_id = UserId::new("user-123");

        let access_token = auth.create_access_token(&user_id).unwrap();
        let err = auth.verify_refresh_token(&access_token).unwrap_err();
        assert_eq!(err.fault(), &Fault::bad_request(INVALID_REFRESH_TOKEN));

        let refresh_token = auth.create_refresh_token(&user_id).unwrap();
        let err = auth.verify_access_token(&refresh_token).unwrap_err();
        assert_eq!(err.fault(), &Fault::unauthorized(INVALID_TOKEN));
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        let err = service().verify_access_token("not.a.jwt").unwrap_err();
        assert_eq!(err.fault().status_code(), 401);
    }
}
