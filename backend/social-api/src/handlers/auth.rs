/// Auth handlers: registration, login, token refresh and the actor's own
/// profile.
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::UserProfile;
use crate::security::jwt::TokenResponse;
use crate::services::auth::{AuthService, ProfileUpdate};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub bio: Option<String>,
    pub avatar_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub tokens: TokenResponse,
}

/// Register a new account
pub async fn register(
    pool: web::Data<PgPool>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let service = AuthService::new(pool.get_ref().clone());
    let (user, tokens) = service
        .register(&req.username, &req.email, &req.password)
        .await?;

    Ok(HttpResponse::Created().json(AuthResponse { user, tokens }))
}

/// Log in with email and password
pub async fn login(pool: web::Data<PgPool>, req: web::Json<LoginRequest>) -> Result<HttpResponse> {
    let service = AuthService::new(pool.get_ref().clone());
    let (user, tokens) = service.login(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(AuthResponse { user, tokens }))
}

/// Exchange a refresh token for a new token pair
pub async fn refresh_token(
    pool: web::Data<PgPool>,
    req: web::Json<RefreshRequest>,
) -> Result<HttpResponse> {
    let service = AuthService::new(pool.get_ref().clone());
    let tokens = service.refresh(&req.refresh_token).await?;

    Ok(HttpResponse::Ok().json(tokens))
}

/// Current user's own profile
pub async fn get_current_user(pool: web::Data<PgPool>, actor: AuthUser) -> Result<HttpResponse> {
    let service = AuthService::new(pool.get_ref().clone());
    let profile = service.me(actor.0).await?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Partial update of the current user's profile
pub async fn update_profile(
    pool: web::Data<PgPool>,
    actor: AuthUser,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let service = AuthService::new(pool.get_ref().clone());
    let profile = service
        .update_me(
            actor.0,
            ProfileUpdate {
                username: req.username,
                email: req.email,
                password: req.password,
                bio: req.bio,
                avatar_key: req.avatar_key,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(profile))
}
