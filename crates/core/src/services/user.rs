//! User service.

use chrono::Utc;
use forgefeed_common::{AppResult, Identity, IdGenerator};
use forgefeed_db::{
    entities::{login, post, user},
    repositories::{LoginRepository, PostRepository, UserRepository},
};
use sea_orm::Set;

/// Maximum rows returned by a user search.
const SEARCH_LIMIT: u64 = 50;

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    login_repo: LoginRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(
        user_repo: UserRepository,
        login_repo: LoginRepository,
        post_repo: PostRepository,
    ) -> Self {
        Self {
            user_repo,
            login_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Record a session touch: refresh the user's profile row and append a
    /// login event. Events are append-only, so repeated touches within a
    /// day all count toward insights.
    pub async fn touch_login(&self, identity: &Identity) -> AppResult<user::Model> {
        let now = Utc::now();

        let user = self
            .user_repo
            .upsert(user::ActiveModel {
                id: Set(identity.user_id.clone()),
                email: Set(identity.email.clone()),
                name: Set(identity.name.clone()),
                avatar_url: Set(identity.avatar_url.clone()),
                last_login: Set(Some(now.into())),
                ..Default::default()
            })
            .await?;

        self.login_repo
            .create(login::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(identity.user_id.clone()),
                logged_in_at: Set(now.into()),
            })
            .await?;

        Ok(user)
    }

    /// A user's profile with their posts, newest first.
    pub async fn profile(&self, user_id: &str) -> AppResult<(user::Model, Vec<post::Model>)> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let posts = self.post_repo.find_by_user(user_id).await?;
        Ok((user, posts))
    }

    /// Search users by name or email substring.
    pub async fn search(&self, query: &str) -> AppResult<Vec<user::Model>> {
        self.user_repo.search(query, SEARCH_LIMIT).await
    }
}
