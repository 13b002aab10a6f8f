use sqlx::PgConnection;

use crate::catalog::repo_types::{AppliedVersion, ColumnInfo, IndexInfo};
use crate::config::VersionTable;
use crate::error::Result;

/// Whether `schema.table` is a table visible through `information_schema`.
pub async fn table_exists(conn: &mut PgConnection, schema: &str, table: &str) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
              FROM information_schema.tables
             WHERE table_schema = $1
               AND table_name = $2
        )
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_one(conn)
    .await?;
    Ok(exists)
}

/// All columns of a table in ordinal order.
pub async fn list_columns(
    conn: &mut PgConnection,
    schema: &str,
    table: &str,
) -> Result<Vec<ColumnInfo>> {
    // information_schema uses domain types that sqlx cannot decode directly
    let rows = sqlx::query_as::<_, ColumnInfo>(
        r#"
        SELECT column_name::text              AS column_name,
               data_type::text                AS data_type,
               character_maximum_length::int4 AS character_maximum_length,
               (is_nullable = 'YES')          AS is_nullable,
               column_default::text           AS column_default
          FROM information_schema.columns
         WHERE table_schema = $1
           AND table_name = $2
         ORDER BY ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

/// All indexes of a table, ordered by name.
pub async fn list_indexes(
    conn: &mut PgConnection,
    schema: &str,
    table: &str,
) -> Result<Vec<IndexInfo>> {
    let rows = sqlx::query_as::<_, IndexInfo>(
        r#"
        SELECT indexname::text AS indexname,
               indexdef
          FROM pg_indexes
         WHERE schemaname = $1
           AND tablename = $2
         ORDER BY indexname
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

/// Names of user-defined triggers on a table.
pub async fn list_triggers(
    conn: &mut PgConnection,
    schema: &str,
    table: &str,
) -> Result<Vec<String>> {
    let rows = sqlx::query_scalar::<_, String>(
        r#"
        SELECT t.tgname::text
          FROM pg_trigger t
          JOIN pg_class c ON c.oid = t.tgrelid
          JOIN pg_namespace n ON n.oid = c.relnamespace
         WHERE n.nspname = $1
           AND c.relname = $2
           AND NOT t.tgisinternal
         ORDER BY t.tgname
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

/// Point unqualified table names at `schema` until the current transaction ends.
pub async fn scope_to_schema(conn: &mut PgConnection, schema: &str) -> Result<()> {
    sqlx::query("SELECT set_config('search_path', quote_ident($1), true)")
        .bind(schema)
        .execute(conn)
        .await?;
    Ok(())
}

/// `"schema"."table"`, safe to splice into SQL text.
fn qualified(schema: &str, table: &str) -> String {
    let quote = |ident: &str| format!("\"{}\"", ident.replace('"', "\"\""));
    format!("{}.{}", quote(schema), quote(table))
}

/// Latest applied migration recorded in `schema`, or `None` if the tool's
/// table is missing or empty.
pub async fn applied_version(
    conn: &mut PgConnection,
    schema: &str,
    table: VersionTable,
) -> Result<Option<AppliedVersion>> {
    let name = qualified(schema, table.table_name());
    let present = sqlx::query_scalar::<_, bool>("SELECT to_regclass($1) IS NOT NULL")
        .bind(&name)
        .fetch_one(&mut *conn)
        .await?;
    if !present {
        return Ok(None);
    }

    let sql = match table {
        VersionTable::Sqlx => format!(
            r#"
            SELECT version::text AS version, description
              FROM {name}
             WHERE success
             ORDER BY version DESC
             LIMIT 1
            "#
        ),
        VersionTable::Alembic => format!(
            r#"
            SELECT version_num::text AS version, NULL::text AS description
              FROM {name}
             LIMIT 1
            "#
        ),
    };

    let version = sqlx::query_as::<_, AppliedVersion>(&sql)
        .fetch_optional(conn)
        .await?;
    Ok(version)
}
