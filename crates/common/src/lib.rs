//! Common utilities and shared types for forgefeed.
//!
//! This crate provides foundational components used across all forgefeed crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Sessions**: Verification of provider-issued session tokens via [`SessionVerifier`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use forgefeed_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod session;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use session::{Identity, SessionClaims, SessionVerifier};
