pub mod admin;
pub mod auth;
pub mod chapter;
pub mod error;
pub mod extractor;
pub mod health;
pub mod logger;
pub mod path;
pub mod rate_limit;
pub mod series;
pub mod user;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use serde::Serialize;

use self::error::ApiError;

#[derive(Debug, Serialize)]
pub struct SuccessReply {
    pub success: bool,
}

impl SuccessReply {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

pub fn router() -> Router {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/me", get(auth::me))
        .route("/api/genres", get(series::genres))
        .route("/api/series", get(series::list_series))
        .route("/api/series/{id}", get(series::get_series))
        .route("/api/series/{id}/chapters", get(series::list_chapters))
        .route(
            "/api/series/{id}/comments",
            get(series::list_comments).post(series::add_comment),
        )
        .route("/api/series/{id}/like", post(series::toggle_like))
        .route("/api/series/{id}/favorite", post(series::toggle_favorite))
        .route(
            "/api/series/{id}/progress",
            get(series::get_progress).put(series::update_progress),
        )
        .route("/api/chapters/{id}", get(chapter::get_chapter))
        .route("/api/user/likes", get(user::likes))
        .route("/api/user/favorites", get(user::favorites))
        .route("/api/user/progress", get(user::progress))
        .route("/api/admin/stats", get(admin::stats))
        .route("/api/admin/recent-comments", get(admin::recent_comments))
        .route("/api/admin/users", get(admin::users))
        .route("/api/admin/cloudinary-sign", get(admin::sign_upload))
        .route("/api/admin/series", post(admin::create_series))
        .route(
            "/api/admin/series/{id}",
            put(admin::update_series).delete(admin::delete_series),
        )
        .route("/api/admin/series/{id}/chapters", post(admin::create_chapter))
        .route("/api/admin/chapters/{id}", delete(admin::delete_chapter))
        .route("/api/admin/comments/{id}", delete(admin::delete_comment))
        .fallback(not_found)
}
