//! User repository.

use std::sync::Arc;

use crate::entities::{User, user};
use forgefeed_common::{AppError, AppResult};
use sea_orm::sea_query::{NullOrdering, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    QuerySelect,
};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Insert or update a user row keyed by the auth subject id.
    ///
    /// Profile fields and `last_login` are refreshed on conflict, so the
    /// operation is idempotent across repeated session touches.
    pub async fn upsert(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        User::insert(model)
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .update_columns([
                        user::Column::Email,
                        user::Column::Name,
                        user::Column::AvatarUrl,
                        user::Column::LastLogin,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Search users by name or email substring, most recently active first.
    ///
    /// An empty query returns everyone (up to `limit`).
    pub async fn search(&self, query: &str, limit: u64) -> AppResult<Vec<user::Model>> {
        let mut select = User::find();

        let trimmed = query.trim();
        if !trimmed.is_empty() {
            select = select.filter(
                Condition::any()
                    .add(user::Column::Name.contains(trimmed))
                    .add(user::Column::Email.contains(trimmed)),
            );
        }

        select
            .order_by_with_nulls(user::Column::LastLogin, Order::Desc, NullOrdering::Last)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_user(id: &str, email: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: email.to_string(),
            name: Some("Tester".to_string()),
            avatar_url: None,
            last_login: Some(Utc::now().into()),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let user = create_test_user("u1", "u1@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_id("u1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().email, "u1@example.com");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.get_by_id("missing").await;

        match result {
            Err(AppError::UserNotFound(id)) => assert_eq!(id, "missing"),
            other => panic!("Expected UserNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_returns_matches() {
        let u1 = create_test_user("u1", "alice@example.com");
        let u2 = create_test_user("u2", "bob@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[u1, u2]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.search("example", 50).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
