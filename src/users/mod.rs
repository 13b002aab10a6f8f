//! The `users` table: row type and data access.

pub mod repo;
pub mod repo_types;

pub use repo_types::{NewUser, User, UserChanges};
