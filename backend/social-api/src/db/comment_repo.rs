/// Comment repository. Comments are append-only: this module deliberately
/// has no update or delete statement.
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::Comment;

/// Comment joined with its author's summary fields, used to build
/// denormalized post views.
#[derive(Debug, Clone, FromRow)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_username: String,
    pub author_avatar_key: Option<String>,
    pub author_bio: Option<String>,
}

/// Append a comment to a post
pub async fn insert(
    pool: &PgPool,
    post_id: Uuid,
    author_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (id, post_id, author_id, content, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, post_id, author_id, content, created_at
        "#,
    )
    .bind(id)
    .bind(post_id)
    .bind(author_id)
    .bind(content)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Comments for a batch of posts with authors resolved, in insertion order
pub async fn with_authors_for_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
    if post_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, CommentWithAuthor>(
        r#"
        SELECT c.id, c.post_id, c.author_id, c.content, c.created_at,
               u.username AS author_username,
               u.avatar_key AS author_avatar_key,
               u.bio AS author_bio
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id = ANY($1)
        ORDER BY c.created_at ASC, c.id ASC
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await
}
