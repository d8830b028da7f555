//! User endpoints.

use axum::{Json, Router, extract::State, routing::post};
use forgefeed_common::{AppError, AppResult};
use forgefeed_db::entities::user;
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::posts::PostResponse,
    extractors::MaybeAuthUser,
    middleware::AppState,
    response::ApiResponse,
};

/// Search users request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

/// Profile request. Without a `user_id` the caller's own profile is
/// returned.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// User response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub last_login: Option<String>,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            avatar_url: u.avatar_url,
            last_login: u.last_login.map(|t| t.to_rfc3339()),
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Profile response: the user plus their posts, newest first.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub posts: Vec<PostResponse>,
}

/// Search users by name or email substring.
async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state.user_service.search(&req.query).await?;
    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// A user's profile with their posts.
async fn profile(
    MaybeAuthUser(identity): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<ProfileRequest>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let user_id = match (&req.user_id, &identity) {
        (Some(id), _) => id.clone(),
        (None, Some(identity)) => identity.user_id.clone(),
        (None, None) => {
            return Err(AppError::BadRequest(
                "No user specified and no session present".to_string(),
            ));
        }
    };

    let (user, posts) = state.user_service.profile(&user_id).await?;
    Ok(ApiResponse::ok(ProfileResponse {
        user: user.into(),
        posts: posts.into_iter().map(Into::into).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", post(search))
        .route("/profile", post(profile))
}
