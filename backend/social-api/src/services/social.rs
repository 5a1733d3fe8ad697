/// Social graph manager: profiles, follow toggles, search and listings.
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{follow_repo, post_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::{ProfileResponse, UserSummary};
use crate::services::posts::assemble_views;

pub const SEARCH_RESULT_CAP: i64 = 10;

#[derive(Debug, Serialize)]
pub struct FollowToggle {
    pub message: String,
    pub following: bool,
}

pub struct SocialService {
    pool: PgPool,
}

impl SocialService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Profile page: user, both sides of the graph, and the user's posts
    /// newest first.
    pub async fn profile(&self, user_id: Uuid) -> Result<ProfileResponse> {
        let user = user_repo::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let followers = follow_repo::followers_of(&self.pool, user_id).await?;
        let following = follow_repo::following_of(&self.pool, user_id).await?;
        let posts = post_repo::by_author(&self.pool, user_id).await?;
        let posts = assemble_views(&self.pool, posts).await?;

        Ok(ProfileResponse {
            user: user.into(),
            followers,
            following,
            posts,
        })
    }

    /// Toggle the follow edge between actor and target.
    ///
    /// The edge lives in a single row, so there is no second side to tear:
    /// the conditional insert/delete either creates or removes the whole
    /// relationship, and concurrent toggles on the same pair serialize on
    /// the primary key.
    pub async fn toggle_follow(&self, actor: Uuid, target: Uuid) -> Result<FollowToggle> {
        if actor == target {
            return Err(AppError::BadRequest(
                "You cannot follow yourself".to_string(),
            ));
        }

        if !user_repo::exists(&self.pool, target).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let following = if follow_repo::insert(&self.pool, actor, target)
            .await
            .map_err(map_follow_error)?
        {
            true
        } else {
            follow_repo::delete(&self.pool, actor, target).await?;
            false
        };

        Ok(FollowToggle {
            message: if following {
                "User followed".to_string()
            } else {
                "User unfollowed".to_string()
            },
            following,
        })
    }

    /// Case-insensitive substring search over username and email, capped at
    /// ten results. An empty keyword returns an unfiltered page.
    pub async fn search(&self, keyword: &str, limit: Option<i64>) -> Result<Vec<UserSummary>> {
        let limit = limit
            .unwrap_or(SEARCH_RESULT_CAP)
            .clamp(1, SEARCH_RESULT_CAP);

        Ok(user_repo::search(&self.pool, keyword.trim(), limit).await?)
    }

    pub async fn followers(&self, user_id: Uuid) -> Result<Vec<UserSummary>> {
        if !user_repo::exists(&self.pool, user_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(follow_repo::followers_of(&self.pool, user_id).await?)
    }

    pub async fn following(&self, user_id: Uuid) -> Result<Vec<UserSummary>> {
        if !user_repo::exists(&self.pool, user_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(follow_repo::following_of(&self.pool, user_id).await?)
    }
}

fn map_follow_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        match db.kind() {
            sqlx::error::ErrorKind::ForeignKeyViolation => {
                return match db.constraint() {
                    Some("follows_follower_id_fkey") => {
                        AppError::Authentication("User no longer exists".to_string())
                    }
                    _ => AppError::NotFound("User not found".to_string()),
                };
            }
            sqlx::error::ErrorKind::CheckViolation => {
                return AppError::BadRequest("You cannot follow yourself".to_string());
            }
            _ => {}
        }
    }
    AppError::from(err)
}
