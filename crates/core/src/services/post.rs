//! Post service.

use std::collections::HashMap;

use forgefeed_common::{AppError, AppResult, Identity, IdGenerator};
use forgefeed_db::{
    entities::{answer, comment, post, user},
    repositories::{AnswerRepository, CommentRepository, PostRepository, ReactionRepository},
};
use sea_orm::Set;
use serde::Serialize;
use serde_json::json;

/// Maximum questions attached to a post.
const MAX_QUESTIONS: usize = 3;

/// Everything attached to a post beyond the post row itself.
#[derive(Debug, Clone, Serialize)]
pub struct PostInteractions {
    /// The committed answer set, if any, capped for display.
    pub answers: Option<Vec<String>>,
    /// Comments in chronological order.
    pub comments: Vec<comment::Model>,
    /// Total reaction count.
    pub reactions_count: u64,
    /// Reaction counts keyed by kind.
    pub reactions_by_kind: HashMap<String, u64>,
    /// The viewing user's own reaction kind, if any.
    pub viewer_reaction: Option<String>,
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    answer_repo: AnswerRepository,
    reaction_repo: ReactionRepository,
    comment_repo: CommentRepository,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(
        post_repo: PostRepository,
        answer_repo: AnswerRepository,
        reaction_repo: ReactionRepository,
        comment_repo: CommentRepository,
    ) -> Self {
        Self {
            post_repo,
            answer_repo,
            reaction_repo,
            comment_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Publish a post carrying the generated questions, to be answered
    /// later by the owner.
    pub async fn create(
        &self,
        identity: &Identity,
        repo_name: &str,
        repo_url: &str,
        questions: Vec<String>,
    ) -> AppResult<post::Model> {
        let questions = Self::validate_questions(questions)?;

        self.post_repo
            .create(post::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(identity.user_id.clone()),
                user_email: Set(identity.email.clone()),
                repo_name: Set(repo_name.to_string()),
                repo_url: Set(repo_url.to_string()),
                questions: Set(json!(questions)),
                ..Default::default()
            })
            .await
    }

    /// Publish a post together with its answer set in one step.
    pub async fn create_with_answers(
        &self,
        identity: &Identity,
        repo_name: &str,
        repo_url: &str,
        questions: Vec<String>,
        answers: Vec<String>,
    ) -> AppResult<post::Model> {
        let questions = Self::validate_questions(questions)?;
        if answers.len() > questions.len() {
            return Err(AppError::BadRequest(
                "More answers than questions".to_string(),
            ));
        }

        let post = self
            .post_repo
            .create(post::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(identity.user_id.clone()),
                user_email: Set(identity.email.clone()),
                repo_name: Set(repo_name.to_string()),
                repo_url: Set(repo_url.to_string()),
                questions: Set(json!(questions)),
                ..Default::default()
            })
            .await?;

        self.answer_repo
            .create(answer::ActiveModel {
                post_id: Set(post.id.clone()),
                answers: Set(json!(answers)),
                ..Default::default()
            })
            .await?;

        Ok(post)
    }

    /// Delete a post with its answers, reactions, and comments.
    ///
    /// Only the owner may delete. A parent delete that reports zero
    /// affected rows after the ownership check passed means a storage
    /// policy silently filtered it; that is surfaced, not swallowed.
    pub async fn delete(&self, identity: &Identity, post_id: &str) -> AppResult<()> {
        let post = self.post_repo.get_by_id(post_id).await?;

        if post.user_id != identity.user_id {
            return Err(AppError::Forbidden(
                "Ownership verification failed".to_string(),
            ));
        }

        let answers = self.answer_repo.delete_by_post(post_id).await?;
        let reactions = self.reaction_repo.delete_by_post(post_id).await?;
        let comments = self.comment_repo.delete_by_post(post_id).await?;
        tracing::debug!(
            post_id = %post_id,
            answers, reactions, comments,
            "Removed post children"
        );

        let affected = self.post_repo.delete(post_id).await?;
        if affected == 0 {
            return Err(AppError::PolicyBlocked(
                "Post delete affected zero rows".to_string(),
            ));
        }

        tracing::info!(post_id = %post_id, user_id = %identity.user_id, "Post deleted");
        Ok(())
    }

    /// The public feed: every post, newest first, with author profiles.
    pub async fn feed(&self) -> AppResult<Vec<(post::Model, Option<user::Model>)>> {
        self.post_repo.find_feed().await
    }

    /// Answers, comments, and aggregated reactions for a post.
    pub async fn interactions(
        &self,
        post_id: &str,
        viewer_id: Option<&str>,
    ) -> AppResult<PostInteractions> {
        let (answers, comments, reactions) = tokio::try_join!(
            self.answer_repo.find_by_post(post_id),
            self.comment_repo.find_by_post(post_id),
            self.reaction_repo.find_by_post(post_id),
        )?;

        let mut reactions_by_kind: HashMap<String, u64> = HashMap::new();
        for reaction in &reactions {
            *reactions_by_kind
                .entry(reaction.kind.as_str().to_string())
                .or_insert(0) += 1;
        }

        let viewer_reaction = viewer_id.and_then(|viewer| {
            reactions
                .iter()
                .find(|r| r.user_id == viewer)
                .map(|r| r.kind.as_str().to_string())
        });

        Ok(PostInteractions {
            answers: answers.map(|a| a.answer_list()),
            comments,
            reactions_count: reactions.len() as u64,
            reactions_by_kind,
            viewer_reaction,
        })
    }

    /// At least one and at most three non-blank questions.
    fn validate_questions(questions: Vec<String>) -> AppResult<Vec<String>> {
        let questions: Vec<String> = questions
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .take(MAX_QUESTIONS)
            .collect();

        if questions.is_empty() {
            return Err(AppError::BadRequest(
                "At least one question is required".to_string(),
            ));
        }

        Ok(questions)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use forgefeed_db::entities::reaction::{self, ReactionKind};
    use sea_orm::{DatabaseBackend, MockDatabase};
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
            questions: json!(["q1", "q2", "q3"]),
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

    fn service_with(
        post_db: Arc<sea_orm::DatabaseConnection>,
        answer_db: Arc<sea_orm::DatabaseConnection>,
        reaction_db: Arc<sea_orm::DatabaseConnection>,
        comment_db: Arc<sea_orm::DatabaseConnection>,
    ) -> PostService {
        PostService::new(
            PostRepository::new(post_db),
            AnswerRepository::new(answer_db),
            ReactionRepository::new(reaction_db),
            CommentRepository::new(comment_db),
        )
    }

    fn empty_mock() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    #[test]
    fn test_validate_questions_trims_and_caps() {
        let result =
            PostService::validate_questions(vec![
                "  q1  ".to_string(),
                String::new(),
                "q2".to_string(),
                "q3".to_string(),
                "q4".to_string(),
            ])
            .unwrap();

        assert_eq!(result, vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn test_validate_questions_rejects_empty() {
        let result = PostService::validate_questions(vec!["   ".to_string()]);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_post_not_found() {
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let service = service_with(post_db, empty_mock(), empty_mock(), empty_mock());
        let result = service.delete(&test_identity("u1"), "missing").await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_rejects_non_owner() {
        let post = create_test_post("p1", "owner");
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .into_connection(),
        );

        let service = service_with(post_db, empty_mock(), empty_mock(), empty_mock());
        let result = service.delete(&test_identity("intruder"), "p1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_zero_rows_is_policy_blocked() {
        let post = create_test_post("p1", "u1");
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .append_exec_results([sea_orm::MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let children_exec = sea_orm::MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        };
        let answer_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([children_exec.clone()])
                .into_connection(),
        );
        let reaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([children_exec.clone()])
                .into_connection(),
        );
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([children_exec.clone(), children_exec])
                .into_connection(),
        );

        let service = service_with(post_db, answer_db, reaction_db, comment_db);
        let result = service.delete(&test_identity("u1"), "p1").await;

        assert!(matches!(result, Err(AppError::PolicyBlocked(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_children_and_post() {
        let post = create_test_post("p1", "u1");
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .append_exec_results([sea_orm::MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let children_exec = sea_orm::MockExecResult {
            last_insert_id: 0,
            rows_affected: 2,
        };
        let answer_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([children_exec.clone()])
                .into_connection(),
        );
        let reaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([children_exec.clone()])
                .into_connection(),
        );
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([children_exec.clone(), children_exec])
                .into_connection(),
        );

        let service = service_with(post_db, answer_db, reaction_db, comment_db);
        let result = service.delete(&test_identity("u1"), "p1").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_interactions_caps_answers_for_display() {
        let stored = answer::Model {
            post_id: "p1".to_string(),
            answers: json!(["a1", "a2", "a3", "a4", "a5"]),
            created_at: Utc::now().into(),
        };

        let answer_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .into_connection(),
        );
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );
        let reaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<reaction::Model>::new()])
                .into_connection(),
        );

        let service = service_with(empty_mock(), answer_db, reaction_db, comment_db);
        let interactions = service.interactions("p1", None).await.unwrap();

        assert_eq!(
            interactions.answers,
            Some(vec!["a1".to_string(), "a2".to_string(), "a3".to_string()])
        );

        let rendered = serde_json::to_value(&interactions).unwrap();
        assert_eq!(rendered["answers"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_interactions_aggregates_reactions() {
        let r1 = create_test_reaction("r1", "u1", ReactionKind::Skill);
        let r2 = create_test_reaction("r2", "u2", ReactionKind::Skill);
        let r3 = create_test_reaction("r3", "u3", ReactionKind::Logic);

        let answer_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<answer::Model>::new()])
                .into_connection(),
        );
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );
        let reaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2, r3]])
                .into_connection(),
        );

        let service = service_with(empty_mock(), answer_db, reaction_db, comment_db);
        let interactions = service.interactions("p1", Some("u3")).await.unwrap();

        assert_eq!(interactions.reactions_count, 3);
        assert_eq!(interactions.reactions_by_kind.get("SKILL"), Some(&2));
        assert_eq!(interactions.reactions_by_kind.get("LOGIC"), Some(&1));
        assert_eq!(interactions.viewer_reaction.as_deref(), Some("LOGIC"));
        assert!(interactions.answers.is_none());
    }

    #[tokio::test]
    async fn test_interactions_anonymous_viewer() {
        let r1 = create_test_reaction("r1", "u1", ReactionKind::Robust);

        let answer_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<answer::Model>::new()])
                .into_connection(),
        );
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );
        let reaction_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1]])
                .into_connection(),
        );

        let service = service_with(empty_mock(), answer_db, reaction_db, comment_db);
        let interactions = service.interactions("p1", None).await.unwrap();

        assert!(interactions.viewer_reaction.is_none());
        assert_eq!(interactions.reactions_count, 1);
    }
}
