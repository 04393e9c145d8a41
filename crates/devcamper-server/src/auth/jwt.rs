//! Signed session tokens

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::config::AuthConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a hex ObjectId
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Sign a token for `user_id` valid for the configured number of days
pub fn issue_token(user_id: &ObjectId, config: &AuthConfig) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_hex(),
        iat: now.timestamp(),
        exp: (now + Duration::days(config.jwt_expire_days)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(AuthError::TokenCreation)
}

/// Verify signature and expiry
pub fn verify_token(token: &str, config: &AuthConfig) -> Result<Claims, AuthError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(AuthError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_issue_and_verify() {
        let config = Config::default().auth;
        let id = ObjectId::new();

        let token = issue_token(&id, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, id.to_hex());
        assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let config = Config::default().auth;
        let token = issue_token(&ObjectId::new(), &config).unwrap();

        let mut other = config.clone();
        other.jwt_secret = "another-secret".to_string();
        assert!(matches!(
            verify_token(&token, &other),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut config = Config::default().auth;
        config.jwt_expire_days = -1;
        let token = issue_token(&ObjectId::new(), &config).unwrap();
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let config = Config::default().auth;
        assert!(verify_token("not.a.token", &config).is_err());
    }
}
