//! Reaction endpoints.

use axum::{Json, Router, extract::State, routing::post};
use forgefeed_common::AppResult;
use forgefeed_core::ToggleOutcome;
use forgefeed_db::entities::reaction::ReactionKind;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Toggle reaction request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleReactionRequest {
    pub post_id: String,
    #[serde(default = "default_kind")]
    pub kind: ReactionKind,
}

const fn default_kind() -> ReactionKind {
    ReactionKind::Skill
}

/// Toggle response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleReactionResponse {
    pub outcome: ToggleOutcome,
}

/// Toggle the caller's reaction to a post.
async fn toggle(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ToggleReactionRequest>,
) -> AppResult<ApiResponse<ToggleReactionResponse>> {
    let outcome = state
        .reaction_service
        .toggle(&identity, &req.post_id, req.kind)
        .await?;
    Ok(ApiResponse::ok(ToggleReactionResponse { outcome }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/toggle", post(toggle))
}
