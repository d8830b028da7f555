//! Comment endpoints.

use axum::{Json, Router, extract::State, routing::post};
use forgefeed_common::AppResult;
use forgefeed_db::entities::comment;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create comment request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: String,
    #[validate(length(min = 1, max = 4000))]
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// List comments request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCommentsRequest {
    pub post_id: String,
}

/// Comment response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub user_email: String,
    pub content: String,
    pub parent_id: Option<String>,
    pub created_at: String,
}

impl From<comment::Model> for CommentResponse {
    fn from(c: comment::Model) -> Self {
        Self {
            id: c.id,
            post_id: c.post_id,
            user_id: c.user_id,
            user_email: c.user_email,
            content: c.content,
            parent_id: c.parent_id,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Add a comment, optionally as a reply to a root comment.
async fn create(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<ApiResponse<CommentResponse>> {
    req.validate()?;
    let comment = state
        .comment_service
        .add(
            &identity,
            &req.post_id,
            &req.content,
            req.parent_id.as_deref(),
        )
        .await?;
    Ok(ApiResponse::ok(comment.into()))
}

/// A post's comments in chronological order.
async fn list(
    State(state): State<AppState>,
    Json(req): Json<ListCommentsRequest>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let comments = state.comment_service.list(&req.post_id).await?;
    Ok(ApiResponse::ok(
        comments.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/list", post(list))
}
