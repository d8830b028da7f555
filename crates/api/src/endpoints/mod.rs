//! API endpoints.

mod admin;
mod answers;
mod auth;
mod comments;
mod posts;
mod questions;
mod reactions;
mod repos;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/repos", repos::router())
        .nest("/questions", questions::router())
        .nest("/posts", posts::router())
        .nest("/answers", answers::router())
        .nest("/reactions", reactions::router())
        .nest("/comments", comments::router())
        .nest("/users", users::router())
        .nest("/admin", admin::router())
}
