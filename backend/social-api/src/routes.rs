//! Route configuration
//!
//! Centralized route setup. Protected handlers take the `AuthUser`
//! extractor; everything else is public. `/users/search` is registered
//! before `/users/{id}` so the literal segment wins.

use crate::handlers;
use actix_web::web;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/metrics", web::get().to(crate::metrics::serve_metrics))
        .service(
            web::scope("/api/v1")
                .route("/health", web::get().to(handlers::health_check))
                .route("/health/ready", web::get().to(handlers::readiness_check))
                .route("/health/live", web::get().to(handlers::liveness_check))
                .configure(routes::auth::configure)
                .configure(routes::users::configure)
                .configure(routes::posts::configure),
        );
}

// Sub-modules for each domain
mod routes {
    use super::*;

    pub mod auth {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/auth")
                    .route("/register", web::post().to(handlers::register))
                    .route("/login", web::post().to(handlers::login))
                    .route("/refresh", web::post().to(handlers::refresh_token)),
            );
        }
    }

    pub mod users {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/users")
                    .route("/me", web::get().to(handlers::get_current_user))
                    .route("/me", web::patch().to(handlers::update_profile))
                    .route("/search", web::get().to(handlers::search_users))
                    .route("/{id}", web::get().to(handlers::get_user_profile))
                    .route("/{id}/follow", web::put().to(handlers::toggle_follow))
                    .route("/{id}/followers", web::get().to(handlers::get_followers))
                    .route("/{id}/following", web::get().to(handlers::get_following)),
            );
        }
    }

    pub mod posts {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/posts")
                    .route("", web::get().to(handlers::list_posts))
                    .route("", web::post().to(handlers::create_post))
                    .route("/{id}", web::get().to(handlers::get_post))
                    .route("/{id}", web::put().to(handlers::update_post))
                    .route("/{id}", web::delete().to(handlers::delete_post))
                    .route("/{id}/like", web::put().to(handlers::toggle_like))
                    .route("/{id}/comments", web::post().to(handlers::add_comment)),
            );
        }
    }
}
