use sqlx::{PgExecutor, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::users::repo_types::{NewUser, User, UserChanges};

const RETURNING: &str = " RETURNING id, email, username, password_hash, first_name, last_name, \
                         is_active, test, is_verified, created_at, updated_at";

impl User {
    /// Insert a new user. Flags left unset take the column defaults.
    pub async fn create<'e, E>(db: E, new: &NewUser) -> Result<User>
    where
        E: PgExecutor<'e>,
    {
        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO users \
             (email, username, password_hash, first_name, last_name, is_active, test, is_verified) \
             VALUES (",
        );
        let mut values = qb.separated(", ");
        values.push_bind(new.email.clone());
        values.push_bind(new.username.clone());
        values.push_bind(new.password_hash.clone());
        values.push_bind(new.first_name.clone());
        values.push_bind(new.last_name.clone());
        for flag in [new.is_active, new.test, new.is_verified] {
            match flag {
                Some(v) => {
                    values.push_bind(v);
                }
                None => {
                    values.push("DEFAULT");
                }
            }
        }
        values.push_unseparated(")");
        qb.push(RETURNING);

        let user = qb
            .build_query_as::<User>()
            .fetch_one(db)
            .await
            .map_err(Error::from_write)?;
        debug!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    /// Find a user by id.
    pub async fn find_by_id<'e, E>(db: E, id: Uuid) -> Result<Option<User>>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, first_name, last_name,
                   is_active, test, is_verified, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by email.
    pub async fn find_by_email<'e, E>(db: E, email: &str) -> Result<Option<User>>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, first_name, last_name,
                   is_active, test, is_verified, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by username.
    pub async fn find_by_username<'e, E>(db: E, username: &str) -> Result<Option<User>>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, first_name, last_name,
                   is_active, test, is_verified, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Apply a partial update. `updated_at` is maintained by the table trigger.
    /// Returns `None` when no user has this id.
    pub async fn update<'e, E>(db: E, id: Uuid, changes: &UserChanges) -> Result<Option<User>>
    where
        E: PgExecutor<'e>,
    {
        if changes.is_empty() {
            return Self::find_by_id(db, id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        let mut set = qb.separated(", ");
        if let Some(v) = &changes.email {
            set.push("email = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &changes.username {
            set.push("username = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &changes.password_hash {
            set.push("password_hash = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &changes.first_name {
            set.push("first_name = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &changes.last_name {
            set.push("last_name = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = changes.is_active {
            set.push("is_active = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.test {
            set.push("test = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.is_verified {
            set.push("is_verified = ").push_bind_unseparated(v);
        }
        qb.push(" WHERE id = ").push_bind(id).push(RETURNING);

        let user = qb
            .build_query_as::<User>()
            .fetch_optional(db)
            .await
            .map_err(Error::from_write)?;
        if let Some(user) = &user {
            debug!(user_id = %user.id, "user updated");
        }
        Ok(user)
    }
}
