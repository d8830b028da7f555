//! Repository layer.

#![allow(missing_docs)]

pub mod answer;
pub mod comment;
pub mod login;
pub mod post;
pub mod reaction;
pub mod user;

pub use answer::AnswerRepository;
pub use comment::CommentRepository;
pub use login::LoginRepository;
pub use post::PostRepository;
pub use reaction::ReactionRepository;
pub use user::UserRepository;
