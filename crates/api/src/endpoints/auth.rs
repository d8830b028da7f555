//! Session endpoints.

use axum::{Router, extract::State, routing::post};
use forgefeed_common::AppResult;
use forgefeed_db::entities::user;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Session touch response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<user::Model> for SessionResponse {
    fn from(u: user::Model) -> Self {
        Self {
            user_id: u.id,
            email: u.email,
            name: u.name,
            avatar_url: u.avatar_url,
        }
    }
}

/// Record a login: refresh the profile row and append a login event.
async fn session(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let user = state.user_service.touch_login(&identity).await?;
    Ok(ApiResponse::ok(user.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/auth/session", post(session))
}
