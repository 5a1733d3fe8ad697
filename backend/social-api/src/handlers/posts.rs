/// Post handlers: CRUD, like toggles and comments.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::services::posts::DEFAULT_PAGE_SIZE;
use crate::services::{EngagementService, PostService, SharedStorage};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    pub tags: Option<Vec<String>>,
    pub image_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub content: String,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

/// Pagination query parameters (skip/limit semantics)
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Page of posts, newest first
pub async fn list_posts(
    pool: web::Data<PgPool>,
    query: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let service = PostService::new(pool.get_ref().clone());
    let posts = service
        .list_posts(
            query.page.unwrap_or(1),
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// A single post by ID
pub async fn get_post(pool: web::Data<PgPool>, post_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let service = PostService::new(pool.get_ref().clone());
    let post = service.get_post(*post_id).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Create a new post
pub async fn create_post(
    pool: web::Data<PgPool>,
    actor: AuthUser,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let service = PostService::new(pool.get_ref().clone());
    let post = service
        .create_post(actor.0, &req.content, req.tags, req.image_key)
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// Edit a post's content and tags (author only)
pub async fn update_post(
    pool: web::Data<PgPool>,
    actor: AuthUser,
    post_id: web::Path<Uuid>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let service = PostService::new(pool.get_ref().clone());
    let post = service
        .update_post(actor.0, *post_id, &req.content, req.tags)
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post (author only)
pub async fn delete_post(
    pool: web::Data<PgPool>,
    storage: web::Data<SharedStorage>,
    actor: AuthUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::with_storage(pool.get_ref().clone(), storage.get_ref().clone());
    service.delete_post(actor.0, *post_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Like/unlike toggle
pub async fn toggle_like(
    pool: web::Data<PgPool>,
    actor: AuthUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = EngagementService::new(pool.get_ref().clone());
    let result = service.toggle_like(actor.0, *post_id).await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Append a comment; responds with the updated post view
pub async fn add_comment(
    pool: web::Data<PgPool>,
    actor: AuthUser,
    post_id: web::Path<Uuid>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    let service = EngagementService::new(pool.get_ref().clone());
    let post = service.add_comment(actor.0, *post_id, &req.content).await?;

    Ok(HttpResponse::Created().json(post))
}
