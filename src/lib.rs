//! The `users` table schema, typed access to it, and a verifier that checks a
//! live PostgreSQL database against the declared schema.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod schema;
pub mod users;
pub mod verify;

pub use error::{Error, Result};
pub use users::{NewUser, User, UserChanges};
pub use verify::{Phase, Report, Verifier};
