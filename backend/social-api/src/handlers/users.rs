/// User handlers: profiles, search, follow toggles and graph listings.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::services::SocialService;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub limit: Option<i64>,
}

/// Profile page for a user: stripped user record, followers, following and
/// their posts newest first
pub async fn get_user_profile(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = SocialService::new(pool.get_ref().clone());
    let profile = service.profile(*user_id).await?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Follow/unfollow toggle
pub async fn toggle_follow(
    pool: web::Data<PgPool>,
    actor: AuthUser,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = SocialService::new(pool.get_ref().clone());
    let result = service.toggle_follow(actor.0, *user_id).await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Search users by username or email substring
pub async fn search_users(
    pool: web::Data<PgPool>,
    query: web::Query<SearchParams>,
) -> Result<HttpResponse> {
    let service = SocialService::new(pool.get_ref().clone());
    let users = service
        .search(query.keyword.as_deref().unwrap_or(""), query.limit)
        .await?;

    Ok(HttpResponse::Ok().json(users))
}

/// A user's followers
pub async fn get_followers(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = SocialService::new(pool.get_ref().clone());
    let followers = service.followers(*user_id).await?;

    Ok(HttpResponse::Ok().json(followers))
}

/// Users a user is following
pub async fn get_following(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = SocialService::new(pool.get_ref().clone());
    let following = service.following(*user_id).await?;

    Ok(HttpResponse::Ok().json(following))
}
