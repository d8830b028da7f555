//! Question generation endpoints.

use axum::{Json, Router, extract::State, routing::post};
use forgefeed_common::AppResult;
use forgefeed_core::GeneratedQuestions;
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Generate questions request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Generate three review questions for a repository.
///
/// Always succeeds with three questions; `fallback` marks template output.
async fn generate(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> AppResult<ApiResponse<GeneratedQuestions>> {
    let token = identity.provider_token.as_deref().unwrap_or_default();

    let generated = state
        .question_service
        .generate(
            token,
            &req.full_name,
            req.description.as_deref(),
            req.language.as_deref(),
        )
        .await;

    Ok(ApiResponse::ok(generated))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(generate))
}
