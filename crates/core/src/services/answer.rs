//! Answer service.

use forgefeed_common::{AppError, AppResult, Identity};
use forgefeed_db::{
    entities::answer,
    repositories::{AnswerRepository, PostRepository},
};
use sea_orm::Set;
use serde_json::json;

/// Answer service for business logic.
#[derive(Clone)]
pub struct AnswerService {
    answer_repo: AnswerRepository,
    post_repo: PostRepository,
}

impl AnswerService {
    /// Create a new answer service.
    #[must_use]
    pub const fn new(answer_repo: AnswerRepository, post_repo: PostRepository) -> Self {
        Self {
            answer_repo,
            post_repo,
        }
    }

    /// Commit the answer set for a post. Owner-only, write-once: a second
    /// commit surfaces as a conflict from the storage layer.
    pub async fn create(
        &self,
        identity: &Identity,
        post_id: &str,
        answers: Vec<String>,
    ) -> AppResult<answer::Model> {
        let post = self.post_repo.get_by_id(post_id).await?;

        if post.user_id != identity.user_id {
            return Err(AppError::Forbidden(
                "Only the repository owner can answer these questions.".to_string(),
            ));
        }

        if answers.len() > post.question_list().len() {
            return Err(AppError::BadRequest(
                "More answers than questions".to_string(),
            ));
        }

        self.answer_repo
            .create(answer::ActiveModel {
                post_id: Set(post_id.to_string()),
                answers: Set(json!(answers)),
                ..Default::default()
            })
            .await
    }

    /// The committed answer set for a post, if any.
    pub async fn find_by_post(&self, post_id: &str) -> AppResult<Option<answer::Model>> {
        self.answer_repo.find_by_post(post_id).await
    }
}
