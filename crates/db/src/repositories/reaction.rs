//! Reaction repository.

use std::sync::Arc;

use crate::entities::{Reaction, reaction};
use forgefeed_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter,
};

/// Reaction repository for database operations.
#[derive(Clone)]
pub struct ReactionRepository {
    db: Arc<DatabaseConnection>,
}

impl ReactionRepository {
    /// Create a new reaction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// A user's reaction to a post. At most one row exists per (post, user).
    pub async fn find_by_post_and_user(
        &self,
        post_id: &str,
        user_id: &str,
    ) -> AppResult<Option<reaction::Model>> {
        Reaction::find()
            .filter(reaction::Column::PostId.eq(post_id))
            .filter(reaction::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new reaction.
    pub async fn create(&self, model: reaction::ActiveModel) -> AppResult<reaction::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Switch an existing reaction to a different kind.
    pub async fn set_kind(
        &self,
        model: reaction::Model,
        kind: reaction::ReactionKind,
    ) -> AppResult<reaction::Model> {
        let mut active: reaction::ActiveModel = model.into();
        active.kind = Set(kind);
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove a reaction.
    pub async fn delete(&self, model: reaction::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// All reactions to a post.
    pub async fn find_by_post(&self, post_id: &str) -> AppResult<Vec<reaction::Model>> {
        Reaction::find()
            .filter(reaction::Column::PostId.eq(post_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove every reaction to a post. Returns the number of rows removed.
    pub async fn delete_by_post(&self, post_id: &str) -> AppResult<u64> {
        let result = Reaction::delete_many()
            .filter(reaction::Column::PostId.eq(post_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
