//! Business logic services.

#![allow(missing_docs)]

pub mod answer;
pub mod comment;
pub mod insights;
pub mod post;
pub mod questions;
pub mod reaction;
pub mod repo_client;
pub mod user;

pub use answer::AnswerService;
pub use comment::CommentService;
pub use insights::{InsightsService, LoginInsights};
pub use post::{PostInteractions, PostService};
pub use questions::{GeneratedQuestions, QuestionService, RepoContext};
pub use reaction::{ReactionService, ToggleOutcome};
pub use repo_client::{RepoClient, RepoEntry, RepoSummary};
pub use user::UserService;
