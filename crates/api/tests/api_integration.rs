//! End-to-end router tests over mock storage.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware,
};
use chrono::Utc;
use forgefeed_api::{AppState, auth_middleware, router};
use forgefeed_common::{SessionClaims, SessionVerifier, config::CompletionConfig};
use forgefeed_core::{
    AnswerService, CommentService, InsightsService, PostService, QuestionService, ReactionService,
    RepoClient, UserService,
};
use forgefeed_db::{
    entities::user,
    repositories::{
        AnswerRepository, CommentRepository, LoginRepository, PostRepository, ReactionRepository,
        UserRepository,
    },
};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret";

fn empty_db() -> Arc<DatabaseConnection> {
    Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
}

fn build_app(user_db: Arc<DatabaseConnection>) -> Router {
    let login_repo = LoginRepository::new(empty_db());
    let post_repo = PostRepository::new(empty_db());
    let answer_repo = AnswerRepository::new(empty_db());
    let reaction_repo = ReactionRepository::new(empty_db());
    let comment_repo = CommentRepository::new(empty_db());
    let user_repo = UserRepository::new(user_db);

    // Unroutable API base: tests must never leave the process
    let repo_client = RepoClient::new("http://127.0.0.1:1").unwrap();

    let state = AppState {
        user_service: UserService::new(user_repo, login_repo.clone(), post_repo.clone()),
        post_service: PostService::new(
            post_repo.clone(),
            answer_repo.clone(),
            reaction_repo.clone(),
            comment_repo.clone(),
        ),
        answer_service: AnswerService::new(answer_repo, post_repo.clone()),
        reaction_service: ReactionService::new(reaction_repo, post_repo.clone()),
        comment_service: CommentService::new(comment_repo, post_repo),
        insights_service: InsightsService::new(login_repo, chrono_tz::UTC),
        question_service: QuestionService::new(
            repo_client.clone(),
            CompletionConfig {
                api_key: None,
                ..Default::default()
            },
        ),
        repo_client,
        session_verifier: Arc::new(SessionVerifier::new(TEST_SECRET)),
    };

    Router::new()
        .nest("/api", router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

fn session_token(user_id: &str, provider_token: Option<&str>) -> String {
    let claims = SessionClaims {
        sub: user_id.to_string(),
        email: format!("{user_id}@example.com"),
        name: Some("Integration Tester".to_string()),
        avatar_url: None,
        provider_token: provider_token.map(ToString::to_string),
        exp: (Utc::now().timestamp()) + 3600,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

fn json_request(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn mutating_call_without_session_is_rejected() {
    let app = build_app(empty_db());

    let request = json_request(
        "/api/posts/create",
        None,
        serde_json::json!({
            "repoName": "widget",
            "repoUrl": "https://github.com/octo/widget",
            "questions": ["q1"],
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_session_token_is_rejected() {
    let app = build_app(empty_db());

    let request = json_request(
        "/api/posts/create",
        Some("not-a-jwt"),
        serde_json::json!({
            "repoName": "widget",
            "repoUrl": "https://github.com/octo/widget",
            "questions": ["q1"],
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn question_generation_without_key_serves_fallback() {
    let app = build_app(empty_db());
    let token = session_token("u1", Some("gh-token"));

    let request = json_request(
        "/api/questions/generate",
        Some(&token),
        serde_json::json!({
            "fullName": "octo/widget",
            "language": "Rust",
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let data = &body["data"];
    assert_eq!(data["fallback"], true);
    assert_eq!(data["questions"].as_array().unwrap().len(), 3);
    assert!(data["questions"][0].as_str().unwrap().contains("widget"));
}

#[tokio::test]
async fn repo_list_without_provider_token_is_bad_request() {
    let app = build_app(empty_db());
    let token = session_token("u1", None);

    let request = json_request("/api/repos/list", Some(&token), serde_json::json!({}));

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_search_is_public() {
    let users = vec![user::Model {
        id: "u1".to_string(),
        email: "u1@example.com".to_string(),
        name: Some("Tester".to_string()),
        avatar_url: None,
        last_login: Some(Utc::now().into()),
        created_at: Utc::now().into(),
    }];
    let user_db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([users])
            .into_connection(),
    );

    let app = build_app(user_db);

    let request = json_request(
        "/api/users/search",
        None,
        serde_json::json!({ "query": "Tester" }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["email"], "u1@example.com");
}
