//! Answer repository.

use std::sync::Arc;

use crate::entities::{Answer, answer};
use forgefeed_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, SqlErr};

/// Answer repository for database operations.
#[derive(Clone)]
pub struct AnswerRepository {
    db: Arc<DatabaseConnection>,
}

impl AnswerRepository {
    /// Create a new answer repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert the answer set for a post.
    ///
    /// `post_id` is the primary key, so a second insert for the same post
    /// trips the unique constraint and surfaces as a conflict. Answers are
    /// write-once by construction.
    pub async fn create(&self, model: answer::ActiveModel) -> AppResult<answer::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                AppError::Conflict(
                    "Answers have already been committed for this post and cannot be modified."
                        .to_string(),
                )
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Find the answer set for a post, if committed.
    pub async fn find_by_post(&self, post_id: &str) -> AppResult<Option<answer::Model>> {
        Answer::find_by_id(post_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove the answer set for a post. Returns the number of rows removed.
    pub async fn delete_by_post(&self, post_id: &str) -> AppResult<u64> {
        let result = Answer::delete_many()
            .filter(answer::Column::PostId.eq(post_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
