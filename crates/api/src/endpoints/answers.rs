//! Answer endpoints.

use axum::{Json, Router, extract::State, routing::post};
use forgefeed_common::AppResult;
use forgefeed_db::entities::answer;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create answers request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnswersRequest {
    pub post_id: String,
    pub answers: Vec<String>,
}

/// Answer set response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswersResponse {
    pub post_id: String,
    pub answers: Vec<String>,
    pub created_at: String,
}

impl From<answer::Model> for AnswersResponse {
    fn from(a: answer::Model) -> Self {
        let answers = a.answer_list();
        Self {
            post_id: a.post_id,
            answers,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

/// Commit the answer set for a post. Owner-only, write-once.
async fn create(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateAnswersRequest>,
) -> AppResult<ApiResponse<AnswersResponse>> {
    let answers = state
        .answer_service
        .create(&identity, &req.post_id, req.answers)
        .await?;
    Ok(ApiResponse::ok(answers.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/create", post(create))
}
