/// Data models: database row types and their outward projections.
///
/// Row types (`User`, `Post`, `Comment`) mirror table columns. Everything
/// serialized to clients goes through a projection (`UserProfile`,
/// `UserSummary`, `PostView`) so the credential hash can never leak.
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub bio: Option<String>,
    pub avatar_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full public view of a user (own profile, profile pages).
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub avatar_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            bio: user.bio,
            avatar_key: user.avatar_key,
            created_at: user.created_at,
        }
    }
}

/// Reduced projection used in listings (followers, search, post authors).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub avatar_key: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub image_key: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Comment with its author resolved, in insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub author: UserSummary,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Denormalized post view: author summary, like set and resolved comments
/// in one payload, so list/profile reads need no follow-up requests.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: Uuid,
    pub author: UserSummary,
    pub content: String,
    pub image_key: Option<String>,
    pub tags: Vec<String>,
    pub likes: Vec<Uuid>,
    pub like_count: i64,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile page payload: the user plus both sides of the graph and their posts.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
    pub followers: Vec<UserSummary>,
    pub following: Vec<UserSummary>,
    pub posts: Vec<PostView>,
}
