//! Reaction service.

use forgefeed_common::{AppResult, Identity, IdGenerator};
use forgefeed_db::{
    entities::reaction::{self, ReactionKind},
    repositories::{PostRepository, ReactionRepository},
};
use sea_orm::Set;
use serde::Serialize;

/// What a toggle did, for the caller's UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// No prior reaction: one was added.
    Added,
    /// Prior reaction of a different kind: switched.
    Switched,
    /// Prior reaction of the same kind: removed.
    Removed,
}

/// Reaction service for business logic.
#[derive(Clone)]
pub struct ReactionService {
    reaction_repo: ReactionRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl ReactionService {
    /// Create a new reaction service.
    #[must_use]
    pub fn new(reaction_repo: ReactionRepository, post_repo: PostRepository) -> Self {
        Self {
            reaction_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle a user's reaction to a post.
    ///
    /// No prior reaction inserts one; a different kind switches; the same
    /// kind removes it. The (post, user) unique index guarantees at most
    /// one row per pair.
    pub async fn toggle(
        &self,
        identity: &Identity,
        post_id: &str,
        kind: ReactionKind,
    ) -> AppResult<ToggleOutcome> {
        self.post_repo.get_by_id(post_id).await?;

        let existing = self
            .reaction_repo
            .find_by_post_and_user(post_id, &identity.user_id)
            .await?;

        match existing {
            None => {
                self.reaction_repo
                    .create(reaction::ActiveModel {
                        id: Set(self.id_gen.generate()),
                        post_id: Set(post_id.to_string()),
                        user_id: Set(identity.user_id.clone()),
                        kind: Set(kind),
                        ..Default::default()
                    })
                    .await?;
                Ok(ToggleOutcome::Added)
            }
            Some(reaction) if reaction.kind == kind => {
                self.reaction_repo.delete(reaction).await?;
                Ok(ToggleOutcome::Removed)
            }
            Some(reaction) => {
                self.reaction_repo.set_kind(reaction, kind).await?;
                Ok(ToggleOutcome::Switched)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use forgefeed_common::AppError;
    use forgefeed_db::entities::post;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;
    use std::sync::Arc;

    fn test_identity(user_id: &str) -> Identity {
        Identity {
            user_id: user_id.to_string(),
            email: format!("{user_id}@example.com"),
            name: None,
            avatar_url: None,
            provider_token: None,
        }
    }

    fn create_test_post(id: &str, user_id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            user_email: format!("{user_id}@example.com"),
            repo_name: "widget".to_string(),
            repo_url: "https://github.com/octo/widget".to_string(),
            questions: json!(["q1"]),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_reaction(id: &str, user_id: &str, kind: ReactionKind) -> reaction::Model {
        reaction::Model {
            id: id.to_string(),
            post_id: "p1".to_string(),
            user_id: user_id.to_string(),
            kind,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_toggle_post_not_found() {
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );
        let reaction_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = ReactionService::new(
            ReactionRepository::new(reaction_db),
            PostRepository::new(post_db),
        );

        let result = service
            .toggle(&test_identity("u1"), "missing", ReactionKind::Skill)
            .await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_toggle_same_kind_removes() {
        let post = create_test_post("p1", "author");
        let existing = create_test_reaction("r1", "u1", ReactionKind::Skill);

        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .into_connection(),
        );
        let reaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .append_exec_results([sea_orm::MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = ReactionService::new(
            ReactionRepository::new(reaction_db),
            PostRepository::new(post_db),
        );

        let outcome = service
            .toggle(&test_identity("u1"), "p1", ReactionKind::Skill)
            .await
            .unwrap();

        assert_eq!(outcome, ToggleOutcome::Removed);
    }

    #[tokio::test]
    async fn test_toggle_different_kind_switches() {
        let post = create_test_post("p1", "author");
        let existing = create_test_reaction("r1", "u1", ReactionKind::Skill);
        let switched = create_test_reaction("r1", "u1", ReactionKind::Logic);

        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .into_connection(),
        );
        // First query finds the prior reaction, second is the UPDATE's
        // RETURNING row
        let reaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![existing], vec![switched]])
                .into_connection(),
        );

        let service = ReactionService::new(
            ReactionRepository::new(reaction_db),
            PostRepository::new(post_db),
        );

        let outcome = service
            .toggle(&test_identity("u1"), "p1", ReactionKind::Logic)
            .await
            .unwrap();

        assert_eq!(outcome, ToggleOutcome::Switched);
    }

    #[test]
    fn test_reaction_kind_wire_format() {
        assert_eq!(ReactionKind::Skill.as_str(), "SKILL");
        assert_eq!(ReactionKind::Logic.as_str(), "LOGIC");
        assert_eq!(ReactionKind::Scalable.as_str(), "SCALABLE");
        assert_eq!(ReactionKind::Robust.as_str(), "ROBUST");

        let kind: ReactionKind = serde_json::from_str("\"SCALABLE\"").unwrap();
        assert_eq!(kind, ReactionKind::Scalable);
    }
}
