use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers;
use crate::system;

/// All API routes. Authorization happens inside the services, driven by the
/// principal the session extractors resolve, so no auth middleware layers
/// are attached here.
pub fn build_router() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // AUTH (identity provider boundary)
        // ========================================
        .route("/api/auth/login", post(system::handlers::auth::login))
        .route("/api/auth/refresh", post(system::handlers::auth::refresh))
        .route("/api/auth/logout", post(system::handlers::auth::logout))
        .route("/api/auth/me", get(system::handlers::auth::current_user))
        // ========================================
        // CONTENT
        // ========================================
        .route(
            "/api/content",
            get(handlers::content::list_published).post(handlers::content::create),
        )
        .route("/api/content/mine", get(handlers::content::list_mine))
        .route(
            "/api/content/by-slug/:category_slug/:slug",
            get(handlers::content::get_by_slug),
        )
        .route(
            "/api/content/:id",
            get(handlers::content::get_by_id)
                .put(handlers::content::update)
                .delete(handlers::content::trash),
        )
        .route("/api/content/:id/publish", post(handlers::content::publish))
        .route(
            "/api/content/:id/unpublish",
            post(handlers::content::unpublish),
        )
        .route("/api/content/:id/trash", post(handlers::content::trash))
        .route("/api/content/:id/restore", post(handlers::content::restore))
        .route("/api/content/:id/purge", post(handlers::content::purge))
        // ========================================
        // CATEGORIES
        // ========================================
        .route(
            "/api/categories",
            get(handlers::category::list_all).post(handlers::category::create),
        )
        .route("/api/categories/:slug", get(handlers::category::get_by_slug))
        // ========================================
        // ENGAGEMENT
        // ========================================
        .route(
            "/api/engagement/:content_id/like",
            post(handlers::engagement::toggle_like),
        )
        .route(
            "/api/engagement/:content_id/comments",
            get(handlers::engagement::list_comments).post(handlers::engagement::create_comment),
        )
        .route(
            "/api/engagement/:content_id/view",
            post(handlers::engagement::record_view),
        )
        // ========================================
        // FOLLOW GRAPH
        // ========================================
        .route(
            "/api/follow/:target_id",
            put(handlers::follow::toggle).get(handlers::follow::status),
        )
        .route("/api/follow/:target_id/counts", get(handlers::follow::counts))
        .route(
            "/api/follow/:target_id/followers",
            get(handlers::follow::followers),
        )
        .route(
            "/api/follow/:target_id/following",
            get(handlers::follow::following),
        )
}
