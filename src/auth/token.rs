//! Signed, expiring bearer tokens. Subject is the username.

use crate::config::AppConfig;
use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

pub fn issue_token(config: &AppConfig, username: &str) -> Result<String, AppError> {
    let expires = Utc::now() + Duration::minutes(config.token_ttl_minutes);
    let claims = Claims {
        sub: username.to_string(),
        exp: expires.timestamp(),
    };
    encode(
        &Header::new(config.algorithm),
        &claims,
        &EncodingKey::from_secret(config.secret_key.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))
}

/// Verify signature and expiry, return the subject. Any failure collapses to
/// `Unauthorized` so callers cannot probe which step rejected the token.
pub fn decode_subject(config: &AppConfig, token: &str) -> Result<String, AppError> {
    let validation = Validation::new(config.algorithm);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret_key.as_bytes()),
        &validation,
    )
    .map_err(|_| AppError::Unauthorized("could not validate credentials".into()))?;
    Ok(data.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;

    fn test_config() -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/unused".into(),
            bind_addr: "127.0.0.1:0".into(),
            secret_key: "unit-test-secret".into(),
            algorithm: Algorithm::HS256,
            token_ttl_minutes: 30,
            template_dir: "static/templates".into(),
        }
    }

    #[test]
    fn round_trip_recovers_the_subject() {
        let config = test_config();
        let token = issue_token(&config, "alice").unwrap();
        assert_eq!(decode_subject(&config, &token).unwrap(), "alice");
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();
        let claims = Claims {
            sub: "alice".into(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::new(config.algorithm),
            &claims,
            &EncodingKey::from_secret(config.secret_key.as_bytes()),
        )
        .unwrap();
        assert!(decode_subject(&config, &token).is_err());
    }

    #[test]
    fn token_signed_with_a_different_secret_is_rejected() {
        let config = test_config();
        let mut other = test_config();
        other.secret_key = "some-other-secret".into();
        let token = issue_token(&other, "alice").unwrap();
        assert!(decode_subject(&config, &token).is_err());
    }
}
