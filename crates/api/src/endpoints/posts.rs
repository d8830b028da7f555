//! Post endpoints.

use axum::{Json, Router, extract::State, routing::post};
use forgefeed_common::AppResult;
use forgefeed_core::PostInteractions;
use forgefeed_db::entities::{post, user};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Create post request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub repo_name: String,
    pub repo_url: String,
    pub questions: Vec<String>,
}

/// Create post with answers request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostWithAnswersRequest {
    pub repo_name: String,
    pub repo_url: String,
    pub questions: Vec<String>,
    pub answers: Vec<String>,
}

/// Delete post request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePostRequest {
    pub post_id: String,
}

/// Post interactions request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionsRequest {
    pub post_id: String,
}

/// Post response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub repo_name: String,
    pub repo_url: String,
    pub questions: Vec<String>,
    pub created_at: String,
}

impl From<post::Model> for PostResponse {
    fn from(p: post::Model) -> Self {
        let questions = p.question_list();
        Self {
            id: p.id,
            user_id: p.user_id,
            user_email: p.user_email,
            repo_name: p.repo_name,
            repo_url: p.repo_url,
            questions,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// Author profile attached to a feed item.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub name: Option<String>,
    pub email: String,
    pub avatar_url: Option<String>,
}

/// One entry of the public feed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    #[serde(flatten)]
    pub post: PostResponse,
    pub author: Option<AuthorResponse>,
}

impl From<(post::Model, Option<user::Model>)> for FeedItem {
    fn from((post, author): (post::Model, Option<user::Model>)) -> Self {
        Self {
            post: post.into(),
            author: author.map(|u| AuthorResponse {
                name: u.name,
                email: u.email,
                avatar_url: u.avatar_url,
            }),
        }
    }
}

/// Publish a post with questions only.
async fn create(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state
        .post_service
        .create(&identity, &req.repo_name, &req.repo_url, req.questions)
        .await?;
    Ok(ApiResponse::ok(post.into()))
}

/// Publish a post together with its answer set.
async fn create_with_answers(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreatePostWithAnswersRequest>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state
        .post_service
        .create_with_answers(
            &identity,
            &req.repo_name,
            &req.repo_url,
            req.questions,
            req.answers,
        )
        .await?;
    Ok(ApiResponse::ok(post.into()))
}

/// Delete a post and everything attached to it.
async fn delete(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeletePostRequest>,
) -> AppResult<ApiResponse<()>> {
    state.post_service.delete(&identity, &req.post_id).await?;
    Ok(ApiResponse::ok(()))
}

/// The public feed, newest first.
async fn feed(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<FeedItem>>> {
    let posts = state.post_service.feed().await?;
    Ok(ApiResponse::ok(posts.into_iter().map(Into::into).collect()))
}

/// Answers, comments, and reactions for a post.
async fn interactions(
    MaybeAuthUser(identity): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<InteractionsRequest>,
) -> AppResult<ApiResponse<PostInteractions>> {
    let viewer = identity.as_ref().map(|i| i.user_id.as_str());
    let interactions = state.post_service.interactions(&req.post_id, viewer).await?;
    Ok(ApiResponse::ok(interactions))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/create-with-answers", post(create_with_answers))
        .route("/delete", post(delete))
        .route("/feed", post(feed))
        .route("/interactions", post(interactions))
}
