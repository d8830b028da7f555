//! Core business logic for forgefeed.

pub mod services;

pub use services::*;
