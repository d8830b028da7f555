//! Login event repository.

use std::sync::Arc;

use crate::entities::{Login, login};
use chrono::{DateTime, Utc};
use forgefeed_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Login event repository for database operations.
#[derive(Clone)]
pub struct LoginRepository {
    db: Arc<DatabaseConnection>,
}

impl LoginRepository {
    /// Create a new login repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append a login event. Events are never deduplicated.
    pub async fn create(&self, model: login::ActiveModel) -> AppResult<login::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Login events in the half-open interval `[start, end)`.
    pub async fn find_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<login::Model>> {
        Login::find()
            .filter(login::Column::LoggedInAt.gte(start))
            .filter(login::Column::LoggedInAt.lt(end))
            .order_by_asc(login::Column::LoggedInAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
