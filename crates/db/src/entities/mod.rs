//! Database entities.

#![allow(missing_docs)]

pub mod answer;
pub mod comment;
pub mod login;
pub mod post;
pub mod reaction;
pub mod user;

pub use answer::Entity as Answer;
pub use comment::Entity as Comment;
pub use login::Entity as Login;
pub use post::Entity as Post;
pub use reaction::Entity as Reaction;
pub use user::Entity as User;
