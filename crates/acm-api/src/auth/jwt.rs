use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id as string
    pub username: String,
    pub exp: usize,
    pub iat: usize,
}

/// Generate a JWT token for a user
pub fn generate_jwt_token(
    user_id: Uuid,
    username: String,
    jwt_secret: &str,
    expiry_hours: i64,
) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        username,
        iat: now.timestamp() as usize,
        exp: (now + chrono::Duration::hours(expiry_hours)).timestamp() as usize,
    };

    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a JWT token
pub fn verify_jwt_token(token: &str, jwt_secret: &str) -> Result<Claims, ApiError> {
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| ApiError::Auth("Invalid or expired token".to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify_jwt_token() {
        let user_id = Uuid::new_v4();
        let username = "admin".to_string();
        let secret = "test_jwt_secret_minimum_32_characters_long";

        let token = generate_jwt_token(user_id, username.clone(), secret, 24)
            .expect("Failed to generate token");

        assert!(!token.is_empty(), "Token should not be empty");

        let claims = verify_jwt_token(&token, secret).expect("Failed to verify token");

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, username);
        assert!(
            claims.exp > claims.iat,
            "Expiration should be after issued at"
        );
    }

    #[test]
    fn test_verify_jwt_token_with_wrong_secret() {
        let user_id = Uuid::new_v4();
        let secret = "test_jwt_secret_minimum_32_characters_long";
        let wrong_secret = "wrong_jwt_secret_minimum_32_characters_long";

        let token = generate_jwt_token(user_id, "admin".to_string(), secret, 24)
            .expect("Failed to generate token");

        assert!(verify_jwt_token(&token, wrong_secret).is_err());
    }

    #[test]
    fn test_verify_garbage_token() {
        let secret = "test_jwt_secret_minimum_32_characters_long";
        assert!(verify_jwt_token("definitely.not.a.jwt", secret).is_err());
    }
}
