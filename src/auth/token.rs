use crate::config::Config;
use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Represents the claims encoded within a bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: i32,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
}

/// Generates a signed token for `user_id`.
///
/// The token expires after `config.token_ttl_hours` and is signed with
/// `config.jwt_secret` (HS256).
pub fn generate_token(user_id: i32, config: &Config) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expiration = chrono::Duration::try_hours(config.token_ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| {
            AppError::InternalServerError(format!(
                "Token lifetime of {} hours is out of range",
                config.token_ttl_hours
            ))
        })?;

    let claims = Claims {
        sub: user_id,
        exp: expiration.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a token string and decodes its claims.
///
/// Returns `AppError::Unauthorized` if the token is malformed, its signature is
/// invalid, or it has expired.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> Config {
        Config::for_tests("postgres://unused", secret)
    }

    #[test]
    fn test_token_generation_and_verification() {
        let config = config("test_secret_for_gen_verify");
        let token = generate_token(1, &config).unwrap();
        let claims = verify_token(&token, &config.jwt_secret).unwrap();
        assert_eq!(claims.sub, 1);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_expiration() {
        let secret = "test_secret_for_expiration";
        let issued = chrono::Utc::now() - chrono::Duration::hours(3);
        let claims_expired = Claims {
            sub: 2,
            exp: (issued + chrono::Duration::hours(1)).timestamp() as usize,
            iat: issued.timestamp() as usize,
        };
        let expired_token = encode(
            &Header::default(),
            &claims_expired,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        match verify_token(&expired_token, secret) {
            Err(AppError::Unauthorized(msg)) => {
                assert!(msg.contains("Invalid token: ExpiredSignature"), "{}", msg);
            }
            Ok(_) => panic!("Token should have been invalid due to expiration"),
            Err(e) => panic!("Unexpected error type for expired token: {:?}", e),
        }
    }

    #[test]
    fn test_invalid_token_signature() {
        let token = generate_token(3, &config("signing_secret")).unwrap();

        match verify_token(&token, "a_completely_different_secret") {
            Err(AppError::Unauthorized(msg)) => {
                assert!(msg.contains("Invalid token: InvalidSignature"), "{}", msg);
            }
            Ok(_) => panic!("Token should have been invalid due to signature mismatch"),
            Err(e) => panic!("Unexpected error type for invalid signature: {:?}", e),
        }
    }

    #[test]
    fn test_out_of_range_lifetime_is_an_error() {
        let mut config = config("ttl_secret");
        config.token_ttl_hours = 10_000_000_000_000;

        match generate_token(4, &config) {
            Err(AppError::InternalServerError(msg)) => assert!(msg.contains("out of range"), "{}", msg),
            other => panic!("expected an error for an oversized lifetime, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(
            verify_token("not-a-token", "secret"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
