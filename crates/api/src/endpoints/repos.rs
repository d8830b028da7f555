//! Repository listing endpoints.

use axum::{Router, extract::State, routing::post};
use forgefeed_common::{AppError, AppResult};
use forgefeed_core::RepoSummary;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// List the caller's repositories via their OAuth provider token.
async fn list(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<RepoSummary>>> {
    let token = identity.provider_token.as_deref().ok_or_else(|| {
        AppError::BadRequest("Session carries no provider token for repository access".to_string())
    })?;

    let repos = state.repo_client.list_repos(token).await?;
    Ok(ApiResponse::ok(repos))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/list", post(list))
}
