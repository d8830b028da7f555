//! Comment service.

use forgefeed_common::{AppError, AppResult, Identity, IdGenerator};
use forgefeed_db::{
    entities::comment,
    repositories::{CommentRepository, PostRepository},
};
use sea_orm::Set;

/// Maximum comment length in characters.
const MAX_CONTENT_CHARS: usize = 4000;

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(comment_repo: CommentRepository, post_repo: PostRepository) -> Self {
        Self {
            comment_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a comment to a post, optionally as a reply.
    ///
    /// Threading is single-level: the parent must be a root comment of the
    /// same post.
    pub async fn add(
        &self,
        identity: &Identity,
        post_id: &str,
        content: &str,
        parent_id: Option<&str>,
    ) -> AppResult<comment::Model> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::BadRequest("Comment cannot be empty".to_string()));
        }
        if content.chars().count() > MAX_CONTENT_CHARS {
            return Err(AppError::BadRequest("Comment is too long".to_string()));
        }

        self.post_repo.get_by_id(post_id).await?;

        if let Some(parent_id) = parent_id {
            let parent = self
                .comment_repo
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Parent comment not found".to_string()))?;

            if parent.post_id != post_id {
                return Err(AppError::BadRequest(
                    "Parent comment belongs to a different post".to_string(),
                ));
            }
            if parent.parent_id.is_some() {
                return Err(AppError::BadRequest(
                    "Replies to replies are not supported".to_string(),
                ));
            }
        }

        self.comment_repo
            .create(comment::ActiveModel {
                id: Set(self.id_gen.generate()),
                post_id: Set(post_id.to_string()),
                user_id: Set(identity.user_id.clone()),
                user_email: Set(identity.email.clone()),
                content: Set(content.to_string()),
                parent_id: Set(parent_id.map(ToString::to_string)),
                ..Default::default()
            })
            .await
    }

    /// A post's comments in chronological order.
    pub async fn list(&self, post_id: &str) -> AppResult<Vec<comment::Model>> {
        self.post_repo.get_by_id(post_id).await?;
        self.comment_repo.find_by_post(post_id).await
    }
}
