/// Authentication and profile self-management.
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::{AppError, FieldError, Result};
use crate::models::UserProfile;
use crate::security::{jwt, password};
use crate::validators;

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub bio: Option<String>,
    pub avatar_key: Option<String>,
}

pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new account and issue a token pair.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        plain_password: &str,
    ) -> Result<(UserProfile, jwt::TokenResponse)> {
        let username = username.trim();
        let email = email.trim();

        let mut errors: Vec<FieldError> = Vec::new();
        if !validators::validate_username(username) {
            errors.push(FieldError::new(
                "username",
                "Username must be at least 3 characters, alphanumeric or underscore",
            ));
        }
        if !validators::validate_email(email) {
            errors.push(FieldError::new("email", "Please enter a valid email"));
        }
        if !validators::validate_password(plain_password) {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 6 characters long",
            ));
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let password_hash = password::hash_password(plain_password)?;

        let user = user_repo::create_user(&self.pool, username, email, &password_hash)
            .await
            .map_err(map_unique_violation)?;

        let tokens = jwt::generate_token_pair(user.id)?;
        tracing::info!(user_id = %user.id, "user registered");

        Ok((user.into(), tokens))
    }

    /// Verify credentials and issue a token pair. Unknown email and wrong
    /// password produce the same rejection.
    pub async fn login(
        &self,
        email: &str,
        plain_password: &str,
    ) -> Result<(UserProfile, jwt::TokenResponse)> {
        let user = user_repo::find_by_email(&self.pool, email.trim())
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !password::verify_password(plain_password, &user.password_hash)? {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        let tokens = jwt::generate_token_pair(user.id)?;

        Ok((user.into(), tokens))
    }

    /// Exchange a valid refresh token for a new token pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<jwt::TokenResponse> {
        let data = jwt::validate_token(refresh_token)
            .map_err(|_| AppError::Authentication("Invalid or expired token".to_string()))?;

        if data.claims.token_type != jwt::TOKEN_TYPE_REFRESH {
            return Err(AppError::Authentication(
                "Refresh token required".to_string(),
            ));
        }

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Authentication("Invalid user ID in token".to_string()))?;

        if !user_repo::exists(&self.pool, user_id).await? {
            return Err(AppError::Authentication("User not found".to_string()));
        }

        jwt::generate_token_pair(user_id)
    }

    /// The actor's own profile. A token whose subject no longer resolves is
    /// rejected as unauthenticated, not as a missing resource.
    pub async fn me(&self, actor: Uuid) -> Result<UserProfile> {
        let user = user_repo::find_by_id(&self.pool, actor)
            .await?
            .ok_or_else(|| AppError::Authentication("User not found".to_string()))?;

        Ok(user.into())
    }

    /// Validated partial update of the actor's own profile.
    pub async fn update_me(&self, actor: Uuid, update: ProfileUpdate) -> Result<UserProfile> {
        let mut errors: Vec<FieldError> = Vec::new();

        let username = update.username.as_deref().map(str::trim);
        if let Some(name) = username {
            if !validators::validate_username(name) {
                errors.push(FieldError::new(
                    "username",
                    "Username must be at least 3 characters, alphanumeric or underscore",
                ));
            }
        }

        let email = update.email.as_deref().map(str::trim);
        if let Some(addr) = email {
            if !validators::validate_email(addr) {
                errors.push(FieldError::new("email", "Please enter a valid email"));
            }
        }

        if let Some(pw) = update.password.as_deref() {
            if !validators::validate_password(pw) {
                errors.push(FieldError::new(
                    "password",
                    "Password must be at least 6 characters long",
                ));
            }
        }

        let bio = update.bio.as_deref().map(str::trim);
        if let Some(bio) = bio {
            if !validators::validate_bio(bio) {
                errors.push(FieldError::new("bio", "Bio cannot exceed 250 characters"));
            }
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let password_hash = match update.password.as_deref() {
            Some(pw) => Some(password::hash_password(pw)?),
            None => None,
        };

        let user = user_repo::update_profile(
            &self.pool,
            actor,
            username,
            email,
            password_hash.as_deref(),
            bio,
            update.avatar_key.as_deref(),
        )
        .await
        .map_err(map_unique_violation)?
        .ok_or_else(|| AppError::Authentication("User not found".to_string()))?;

        Ok(user.into())
    }
}

/// Map a unique-constraint violation back onto the offending field.
fn map_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            let field = match db.constraint() {
                Some("users_username_key") => "username",
                Some("users_email_key") => "email",
                _ => "resource",
            };
            return AppError::Conflict {
                field: field.to_string(),
            };
        }
    }
    AppError::from(err)
}
