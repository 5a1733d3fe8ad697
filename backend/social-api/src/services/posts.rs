/// Post service: creation, retrieval, update and deletion, plus assembly
/// of the denormalized views handed to clients.
use std::collections::{HashMap, HashSet};

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{comment_repo, like_repo, post_repo, user_repo};
use crate::error::{AppError, FieldError, Result};
use crate::middleware::permissions;
use crate::models::{CommentView, Post, PostView, UserSummary};
use crate::services::storage::{self, SharedStorage};
use crate::validators;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 50;

pub struct PostService {
    pool: PgPool,
    storage: SharedStorage,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            storage: None,
        }
    }

    pub fn with_storage(pool: PgPool, storage: SharedStorage) -> Self {
        Self { pool, storage }
    }

    /// Create a new post authored by `actor`.
    pub async fn create_post(
        &self,
        actor: Uuid,
        content: &str,
        tags: Option<Vec<String>>,
        image_key: Option<String>,
    ) -> Result<PostView> {
        let (content, tags) = normalize_post_input(content, tags)?;

        let post = post_repo::insert(
            &self.pool,
            actor,
            &content,
            &tags,
            image_key.as_deref(),
        )
        .await
        .map_err(map_author_fk)?;

        let mut views = assemble_views(&self.pool, vec![post]).await?;
        views.pop().ok_or_else(|| {
            AppError::Internal("created post vanished before it could be returned".to_string())
        })
    }

    /// Page of posts, newest first, with authors and comments resolved.
    pub async fn list_posts(&self, page: i64, page_size: i64) -> Result<Vec<PostView>> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1) * page_size;

        let posts = post_repo::list_page(&self.pool, page_size, offset).await?;
        assemble_views(&self.pool, posts).await
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<PostView> {
        let post = post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        let mut views = assemble_views(&self.pool, vec![post]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    /// Edit content/tags. Only the author may do this.
    pub async fn update_post(
        &self,
        actor: Uuid,
        post_id: Uuid,
        content: &str,
        tags: Option<Vec<String>>,
    ) -> Result<PostView> {
        let post = post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        permissions::check_post_ownership(actor, &post)?;

        // Absent tags leave the existing set untouched.
        let tags = tags.or_else(|| Some(post.tags.clone()));
        let (content, tags) = normalize_post_input(content, tags)?;
        let updated = post_repo::update(&self.pool, post_id, &content, &tags).await?;

        let mut views = assemble_views(&self.pool, vec![updated]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    /// Delete a post and schedule cleanup of its stored image. Cleanup
    /// failures are logged, never surfaced: image orphaning is an accepted
    /// trade-off, losing the delete is not.
    pub async fn delete_post(&self, actor: Uuid, post_id: Uuid) -> Result<()> {
        let post = post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        permissions::check_post_ownership(actor, &post)?;

        post_repo::delete(&self.pool, post_id).await?;

        storage::schedule_object_cleanup(&self.storage, post.image_key);

        Ok(())
    }
}

/// Trim and validate post content and tags.
fn normalize_post_input(
    content: &str,
    tags: Option<Vec<String>>,
) -> Result<(String, Vec<String>)> {
    let mut errors: Vec<FieldError> = Vec::new();

    let content = content.trim().to_string();
    if content.is_empty() {
        errors.push(FieldError::new("content", "Post content is required"));
    } else if !validators::validate_post_content(&content) {
        errors.push(FieldError::new(
            "content",
            "Post cannot exceed 2000 characters",
        ));
    }

    let tags = tags.unwrap_or_default();
    if tags.iter().any(|tag| !validators::validate_tag(tag)) {
        errors.push(FieldError::new(
            "tags",
            "Tags must be 1-30 characters, alphanumeric or underscore",
        ));
    }

    if errors.is_empty() {
        Ok((content, tags))
    } else {
        Err(AppError::Validation(errors))
    }
}

fn map_author_fk(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if matches!(db.kind(), sqlx::error::ErrorKind::ForeignKeyViolation) {
            return AppError::Authentication("User no longer exists".to_string());
        }
    }
    AppError::from(err)
}

/// Resolve author summaries, like sets and comments for a batch of posts.
/// Order of the input posts is preserved.
pub(crate) async fn assemble_views(pool: &PgPool, posts: Vec<Post>) -> Result<Vec<PostView>> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
    let author_ids: Vec<Uuid> = posts
        .iter()
        .map(|p| p.author_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let authors: HashMap<Uuid, UserSummary> = user_repo::summaries_by_ids(pool, &author_ids)
        .await?
        .into_iter()
        .map(|summary| (summary.id, summary))
        .collect();

    let mut likes_by_post: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (post_id, user_id) in like_repo::for_posts(pool, &post_ids).await? {
        likes_by_post.entry(post_id).or_default().push(user_id);
    }

    let mut comments_by_post: HashMap<Uuid, Vec<CommentView>> = HashMap::new();
    for comment in comment_repo::with_authors_for_posts(pool, &post_ids).await? {
        comments_by_post
            .entry(comment.post_id)
            .or_default()
            .push(CommentView {
                id: comment.id,
                author: UserSummary {
                    id: comment.author_id,
                    username: comment.author_username,
                    avatar_key: comment.author_avatar_key,
                    bio: comment.author_bio,
                },
                content: comment.content,
                created_at: comment.created_at,
            });
    }

    posts
        .into_iter()
        .map(|post| {
            let author = authors.get(&post.author_id).cloned().ok_or_else(|| {
                AppError::Internal(format!("author {} missing for post {}", post.author_id, post.id))
            })?;
            let likes = likes_by_post.remove(&post.id).unwrap_or_default();
            let like_count = likes.len() as i64;

            Ok(PostView {
                id: post.id,
                author,
                content: post.content,
                image_key: post.image_key,
                tags: post.tags,
                likes,
                like_count,
                comments: comments_by_post.remove(&post.id).unwrap_or_default(),
                created_at: post.created_at,
                updated_at: post.updated_at,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_accepts_valid_input() {
        let (content, tags) =
            normalize_post_input("  hello world  ", Some(vec!["rust".to_string()]))
                .expect("valid input");
        assert_eq!(content, "hello world");
        assert_eq!(tags, vec!["rust".to_string()]);
    }

    #[test]
    fn normalize_defaults_missing_tags_to_empty() {
        let (_, tags) = normalize_post_input("hello", None).expect("valid input");
        assert!(tags.is_empty());
    }

    #[test]
    fn normalize_rejects_blank_content() {
        let err = normalize_post_input("   ", None).unwrap_err();
        match err {
            AppError::Validation(fields) => {
                assert_eq!(fields[0].field, "content");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn normalize_rejects_oversized_content() {
        let err = normalize_post_input(&"x".repeat(2001), None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn normalize_rejects_bad_tags() {
        let err =
            normalize_post_input("hello", Some(vec!["ok".to_string(), "not ok".to_string()]))
                .unwrap_err();
        match err {
            AppError::Validation(fields) => {
                assert_eq!(fields[0].field, "tags");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
