/// Post repository
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Post;

const POST_COLUMNS: &str = "id, author_id, content, image_key, tags, created_at, updated_at";

/// Create a new post; likes and comments start empty by construction.
pub async fn insert(
    pool: &PgPool,
    author_id: Uuid,
    content: &str,
    tags: &[String],
    image_key: Option<&str>,
) -> Result<Post, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, Post>(&format!(
        r#"
        INSERT INTO posts (id, author_id, content, image_key, tags, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(author_id)
    .bind(content)
    .bind(image_key)
    .bind(tags)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Find a post by ID
pub async fn find_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts
        WHERE id = $1
        "#
    ))
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

/// Page of posts, newest first
pub async fn list_page(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// All posts by an author, newest first
pub async fn by_author(pool: &PgPool, author_id: Uuid) -> Result<Vec<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts
        WHERE author_id = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(author_id)
    .fetch_all(pool)
    .await
}

/// Update content and tags. The author column is never touched.
pub async fn update(
    pool: &PgPool,
    post_id: Uuid,
    content: &str,
    tags: &[String],
) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(&format!(
        r#"
        UPDATE posts
        SET content = $2, tags = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(post_id)
    .bind(content)
    .bind(tags)
    .fetch_one(pool)
    .await
}

/// Hard delete; cascades into likes and comments. Returns true when a row
/// was removed.
pub async fn delete(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
