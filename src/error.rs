use thiserror::Error;

use crate::schema::Mismatch;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while talking to the users table.
#[derive(Debug, Error)]
pub enum Error {
    /// the database could not be reached, or the URL is unusable
    #[error("could not connect to database: {0}")]
    ConnectionFailure(#[source] sqlx::Error),

    /// the live schema (or data read back from it) differs from the declared contract
    #[error("schema mismatch: {}", render_mismatches(.0))]
    SchemaMismatch(Vec<Mismatch>),

    /// a write was rejected by a unique constraint
    #[error("write conflict on {constraint}: {message}")]
    WriteConflict { constraint: String, message: String },

    /// any other failed query
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Error {
    /// Classify an error returned by an INSERT or UPDATE.
    pub fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Error::WriteConflict {
                    constraint: db_err.constraint().unwrap_or("unique").to_string(),
                    message: db_err.message().to_string(),
                };
            }
        }
        Error::Database(err)
    }

    pub fn is_write_conflict(&self) -> bool {
        matches!(self, Error::WriteConflict { .. })
    }
}

fn render_mismatches(items: &[Mismatch]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_conflicts() {
        let err = Error::from_write(sqlx::Error::RowNotFound);
        assert!(matches!(err, Error::Database(sqlx::Error::RowNotFound)));
        assert!(!err.is_write_conflict());
    }

    #[test]
    fn schema_mismatch_lists_every_problem() {
        let err = Error::SchemaMismatch(vec![
            Mismatch::MissingColumn("test".into()),
            Mismatch::MissingIndex("idx_user_created_at".into()),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("schema mismatch: "));
        assert!(msg.contains("missing column test"));
        assert!(msg.contains("missing index idx_user_created_at"));
    }

    #[test]
    fn write_conflict_names_constraint() {
        let err = Error::WriteConflict {
            constraint: "ix_users_email".into(),
            message: "duplicate key value violates unique constraint".into(),
        };
        assert!(err.is_write_conflict());
        assert!(err.to_string().contains("ix_users_email"));
    }
}
