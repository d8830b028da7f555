//! Admin endpoints.

use axum::{Router, extract::State, routing::post};
use forgefeed_common::AppResult;
use forgefeed_core::LoginInsights;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Today's login totals in the configured timezone.
async fn insights(
    AuthUser(_identity): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<LoginInsights>> {
    let insights = state.insights_service.today().await?;
    Ok(ApiResponse::ok(insights))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/insights", post(insights))
}
