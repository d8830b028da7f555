//! Forgefeed server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use chrono_tz::Tz;
use forgefeed_api::{AppState, auth_middleware, router as api_router};
use forgefeed_common::{Config, SessionVerifier};
use forgefeed_core::{
    AnswerService, CommentService, InsightsService, PostService, QuestionService, ReactionService,
    RepoClient, UserService,
};
use forgefeed_db::repositories::{
    AnswerRepository, CommentRepository, LoginRepository, PostRepository, ReactionRepository,
    UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
#[allow(clippy::expect_used)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forgefeed=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting forgefeed server...");

    // Load configuration
    let config = Config::load()?;

    let timezone: Tz = config
        .insights
        .timezone
        .parse()
        .map_err(|e| format!("Invalid insights timezone: {e}"))?;

    // Connect to database
    let db = forgefeed_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    forgefeed_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let login_repo = LoginRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let answer_repo = AnswerRepository::new(Arc::clone(&db));
    let reaction_repo = ReactionRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));

    // Initialize services
    let repo_client = RepoClient::new(config.github.api_base.clone())?;

    let user_service = UserService::new(user_repo, login_repo.clone(), post_repo.clone());
    let post_service = PostService::new(
        post_repo.clone(),
        answer_repo.clone(),
        reaction_repo.clone(),
        comment_repo.clone(),
    );
    let answer_service = AnswerService::new(answer_repo, post_repo.clone());
    let reaction_service = ReactionService::new(reaction_repo, post_repo.clone());
    let comment_service = CommentService::new(comment_repo, post_repo);
    let insights_service = InsightsService::new(login_repo, timezone);
    let question_service = QuestionService::new(repo_client.clone(), config.completion.clone());

    let session_verifier = Arc::new(SessionVerifier::new(&config.session.secret));

    let state = AppState {
        user_service,
        post_service,
        answer_service,
        reaction_service,
        comment_service,
        insights_service,
        question_service,
        repo_client,
        session_verifier,
    };

    if config.completion.api_key.is_none() {
        info!("No completion API key configured; question generation runs in fallback-only mode");
    }

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
