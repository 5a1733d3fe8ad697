/// User repository - all database operations for user records
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{User, UserSummary};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, bio, avatar_key, created_at, updated_at";

/// Create a new user
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(username)
    .bind(email.to_lowercase())
    .bind(password_hash)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Find a user by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Find a user by email
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE email = $1
        "#
    ))
    .bind(email.to_lowercase())
    .fetch_optional(pool)
    .await
}

/// Check whether a user id resolves to a user
pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Partial profile update; absent fields keep their current value.
/// Returns the updated row, or None when the user no longer exists.
pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    username: Option<&str>,
    email: Option<&str>,
    password_hash: Option<&str>,
    bio: Option<&str>,
    avatar_key: Option<&str>,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET username = COALESCE($2, username),
            email = COALESCE($3, email),
            password_hash = COALESCE($4, password_hash),
            bio = COALESCE($5, bio),
            avatar_key = COALESCE($6, avatar_key),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(username)
    .bind(email.map(|e| e.to_lowercase()))
    .bind(password_hash)
    .bind(bio)
    .bind(avatar_key)
    .fetch_optional(pool)
    .await
}

/// Case-insensitive substring search over username and email.
/// An empty keyword returns an unfiltered page.
pub async fn search(
    pool: &PgPool,
    keyword: &str,
    limit: i64,
) -> Result<Vec<UserSummary>, sqlx::Error> {
    if keyword.is_empty() {
        return sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, username, avatar_key, bio
            FROM users
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await;
    }

    // Escape LIKE metacharacters so the keyword is matched literally.
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let pattern = format!("%{escaped}%");

    sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT id, username, avatar_key, bio
        FROM users
        WHERE username ILIKE $1 OR email ILIKE $1
        LIMIT $2
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Batch-resolve user summaries for denormalized views
pub async fn summaries_by_ids(
    pool: &PgPool,
    ids: &[Uuid],
) -> Result<Vec<UserSummary>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT id, username, avatar_key, bio
        FROM users
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await
}
