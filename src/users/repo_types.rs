use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                   // generated by the database
    pub email: String,              // unique, at most 255 chars
    pub username: String,           // unique, at most 50 chars
    #[serde(skip_serializing)]
    pub password_hash: String,      // pre-hashed by the caller
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub test: bool,
    pub is_verified: bool,
    pub created_at: OffsetDateTime, // set once on insert
    pub updated_at: OffsetDateTime, // refreshed by trigger on every update
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User(id={}, username='{}', email='{}', is_active={})",
            self.id, self.username, self.email, self.is_active
        )
    }
}

/// A user that has not been written yet.
///
/// Unset optional fields are left out of the INSERT so the column defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub test: Option<bool>,
    pub is_verified: Option<bool>,
}

impl NewUser {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            password_hash: password_hash.into(),
            ..Self::default()
        }
    }

    pub fn with_name(
        mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }
}

/// Partial update of a user. `None` leaves a column untouched; for the
/// nullable name columns `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub test: Option<bool>,
    pub is_verified: Option<bool>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
