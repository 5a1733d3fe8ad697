/// Engagement engine: like toggles and comment appends.
///
/// Both operations mutate shared sub-objects of a post that any
/// authenticated user may touch, so the mutations are conditional
/// set-updates (insert-on-conflict / delete) rather than read-modify-write
/// of fetched state.
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{comment_repo, like_repo, post_repo};
use crate::error::{AppError, Result};
use crate::models::PostView;
use crate::services::posts::assemble_views;
use crate::validators;

#[derive(Debug, Serialize)]
pub struct LikeToggle {
    pub liked: bool,
    pub like_count: i64,
}

pub struct EngagementService {
    pool: PgPool,
}

impl EngagementService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Toggle the actor's membership in a post's like set. Returns the new
    /// membership state and cardinality.
    pub async fn toggle_like(&self, actor: Uuid, post_id: Uuid) -> Result<LikeToggle> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;
        if !exists {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        let liked = if like_repo::insert(&self.pool, post_id, actor)
            .await
            .map_err(map_like_fk)?
        {
            true
        } else {
            like_repo::delete(&self.pool, post_id, actor).await?;
            false
        };

        let like_count = like_repo::count(&self.pool, post_id).await?;

        Ok(LikeToggle { liked, like_count })
    }

    /// Append a comment to a post. Comments cannot be edited or removed.
    pub async fn add_comment(&self, actor: Uuid, post_id: Uuid, content: &str) -> Result<PostView> {
        let post = post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::validation("content", "Comment content is required"));
        }
        if !validators::validate_comment_content(content) {
            return Err(AppError::validation(
                "content",
                "Comment cannot exceed 500 characters",
            ));
        }

        comment_repo::insert(&self.pool, post_id, actor, content)
            .await
            .map_err(map_comment_fk)?;

        let mut views = assemble_views(&self.pool, vec![post]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }
}

/// A like insert can only hit a foreign key when the post was deleted under
/// us or the actor's account vanished; both map onto the request taxonomy.
fn map_like_fk(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if matches!(db.kind(), sqlx::error::ErrorKind::ForeignKeyViolation) {
            return match db.constraint() {
                Some("likes_user_id_fkey") => {
                    AppError::Authentication("User no longer exists".to_string())
                }
                _ => AppError::NotFound("Post not found".to_string()),
            };
        }
    }
    AppError::from(err)
}

fn map_comment_fk(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if matches!(db.kind(), sqlx::error::ErrorKind::ForeignKeyViolation) {
            return match db.constraint() {
                Some("comments_author_id_fkey") => {
                    AppError::Authentication("User no longer exists".to_string())
                }
                _ => AppError::NotFound("Post not found".to_string()),
            };
        }
    }
    AppError::from(err)
}
