//! HTTP API layer for forgefeed.
//!
//! - **Endpoints**: POST JSON routes under `/api`
//! - **Extractors**: session identity from request extensions
//! - **Middleware**: bearer-token session verification
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
