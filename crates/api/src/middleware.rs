//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use forgefeed_common::SessionVerifier;
use forgefeed_core::{
    AnswerService, CommentService, InsightsService, PostService, QuestionService, ReactionService,
    RepoClient, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub post_service: PostService,
    pub answer_service: AnswerService,
    pub reaction_service: ReactionService,
    pub comment_service: CommentService,
    pub insights_service: InsightsService,
    pub question_service: QuestionService,
    pub repo_client: RepoClient,
    pub session_verifier: Arc<SessionVerifier>,
}

/// Authentication middleware.
///
/// Verifies the bearer session token and stashes the identity in request
/// extensions. Missing or invalid tokens simply leave the identity absent;
/// endpoints that require one reject through the extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.session_verifier.verify(token) {
            Ok(identity) => {
                req.extensions_mut().insert(identity);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Session token rejected");
            }
        }
    }

    next.run(req).await
}
