/// JWT token generation and validation.
/// Access tokens: 1-hour expiry. Refresh tokens: 30-day expiry.
///
/// The service issues and validates its own tokens, so a single HS256
/// secret configured at startup covers both sides.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 1;
const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 30;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: "access" or "refresh"
    pub token_type: String,
}

/// Token pair returned by register/login/refresh
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

// Keys are derived from the configured secret once at startup and
// immutable afterwards.
static JWT_KEYS: OnceCell<JwtKeys> = OnceCell::new();

/// Initialize JWT keys from the configured secret.
/// Must be called during application startup before any token operation.
pub fn initialize_keys(secret: &str) -> Result<()> {
    let keys = JwtKeys {
        encoding: EncodingKey::from_secret(secret.as_bytes()),
        decoding: DecodingKey::from_secret(secret.as_bytes()),
    };

    JWT_KEYS
        .set(keys)
        .map_err(|_| AppError::Internal("JWT keys already initialized".to_string()))
}

fn get_keys() -> Result<&'static JwtKeys> {
    JWT_KEYS.get().ok_or_else(|| {
        AppError::Internal("JWT keys not initialized. Call initialize_keys() during startup".into())
    })
}

fn generate_token(user_id: Uuid, token_type: &str, lifetime: Duration) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
        token_type: token_type.to_string(),
    };

    let token = encode(&Header::default(), &claims, &get_keys()?.encoding)?;
    Ok(token)
}

/// Generate a new access token
pub fn generate_access_token(user_id: Uuid) -> Result<String> {
    generate_token(
        user_id,
        TOKEN_TYPE_ACCESS,
        Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS),
    )
}

/// Generate a new refresh token
pub fn generate_refresh_token(user_id: Uuid) -> Result<String> {
    generate_token(
        user_id,
        TOKEN_TYPE_REFRESH,
        Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
    )
}

/// Generate both access and refresh tokens
pub fn generate_token_pair(user_id: Uuid) -> Result<TokenResponse> {
    Ok(TokenResponse {
        access_token: generate_access_token(user_id)?,
        refresh_token: generate_refresh_token(user_id)?,
        token_type: "Bearer".to_string(),
        expires_in: ACCESS_TOKEN_EXPIRY_HOURS * 3600,
    })
}

/// Validate and decode a token (signature and expiry)
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let data = decode::<Claims>(token, &get_keys()?.decoding, &Validation::default())?;
    Ok(data)
}

/// Validate a bearer token and resolve the acting user id.
/// Refresh tokens are not accepted as request credentials.
pub fn authenticate(token: &str) -> Result<Uuid> {
    let data = validate_token(token)
        .map_err(|_| AppError::Authentication("Invalid or expired token".to_string()))?;

    if data.claims.token_type != TOKEN_TYPE_ACCESS {
        return Err(AppError::Authentication(
            "Access token required".to_string(),
        ));
    }

    Uuid::parse_str(&data.claims.sub)
        .map_err(|_| AppError::Authentication("Invalid user ID in token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_test_keys() {
        let _ = initialize_keys("test-secret-key");
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        init_test_keys();
        let user_id = Uuid::new_v4();

        let token = generate_access_token(user_id).expect("Failed to generate token");
        assert_eq!(token.matches('.').count(), 2);

        let data = validate_token(&token).expect("Failed to validate token");
        assert_eq!(data.claims.sub, user_id.to_string());
        assert_eq!(data.claims.token_type, TOKEN_TYPE_ACCESS);
        assert!(data.claims.exp > data.claims.iat);
    }

    #[test]
    fn test_token_pair_shapes() {
        init_test_keys();
        let user_id = Uuid::new_v4();

        let pair = generate_token_pair(user_id).expect("Failed to generate token pair");
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 3600);

        let access = validate_token(&pair.access_token).expect("access should validate").claims;
        let refresh = validate_token(&pair.refresh_token).expect("refresh should validate").claims;
        assert_eq!(access.token_type, TOKEN_TYPE_ACCESS);
        assert_eq!(refresh.token_type, TOKEN_TYPE_REFRESH);
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn test_validate_rejects_garbage() {
        init_test_keys();
        assert!(validate_token("not.a.token").is_err());
        assert!(validate_token("").is_err());
    }

    #[test]
    fn test_validate_rejects_tampered_token() {
        init_test_keys();
        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id).expect("Failed to generate token");

        // Flip a character in the signature segment
        let mut tampered = token.clone();
        let last = tampered.pop().expect("token is not empty");
        tampered.push(if last == 'a' { 'b' } else { 'a' });
        assert!(validate_token(&tampered).is_err());
    }

    #[test]
    fn test_authenticate_resolves_actor() {
        init_test_keys();
        let user_id = Uuid::new_v4();

        let token = generate_access_token(user_id).expect("Failed to generate token");
        let actor = authenticate(&token).expect("Failed to authenticate");
        assert_eq!(actor, user_id);
    }

    #[test]
    fn test_authenticate_rejects_refresh_token() {
        init_test_keys();
        let user_id = Uuid::new_v4();

        let token = generate_refresh_token(user_id).expect("Failed to generate token");
        let result = authenticate(&token);
        assert!(matches!(result, Err(AppError::Authentication(_))));
    }
}
