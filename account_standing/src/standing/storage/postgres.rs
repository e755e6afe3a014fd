use sqlx::{Pool, Postgres};

use crate::standing::{
    errors::StandingError,
    types::{StandingSearchField, UserStanding},
};
use crate::storage::validate_postgres_table_schema;
use crate::userdb::DB_TABLE_USERS;

use super::config::DB_TABLE_USER_STANDING;

pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), StandingError> {
    let standing_table = DB_TABLE_USER_STANDING.as_str();
    let users_table = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {standing_table} (
            user_id TEXT PRIMARY KEY NOT NULL REFERENCES {users_table}(id),
            account_status TEXT NOT NULL,
            changed_by TEXT NOT NULL,
            standing_last_changed_at TIMESTAMPTZ NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| StandingError::Storage(e.to_string()))?;

    sqlx::query(&format!(
        r#"
        CREATE INDEX IF NOT EXISTS idx_{}_account_status ON {}(account_status)
        "#,
        standing_table.replace(".", "_"),
        standing_table
    ))
    .execute(pool)
    .await
    .map_err(|e| StandingError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn validate_standing_tables_postgres(
    pool: &Pool<Postgres>,
) -> Result<(), StandingError> {
    let standing_table = DB_TABLE_USER_STANDING.as_str();

    let expected_columns = [
        ("user_id", "text"),
        ("account_status", "text"),
        ("changed_by", "text"),
        ("standing_last_changed_at", "timestamp with time zone"),
    ];

    validate_postgres_table_schema(
        pool,
        standing_table,
        &expected_columns,
        StandingError::Storage,
    )
    .await
}

pub(super) async fn get_standings_by_field_postgres(
    pool: &Pool<Postgres>,
    field: &StandingSearchField,
) -> Result<Vec<UserStanding>, StandingError> {
    let standing_table = DB_TABLE_USER_STANDING.as_str();

    let (column, value) = match field {
        StandingSearchField::UserId(id) => ("user_id", id.as_str()),
        StandingSearchField::AccountStatus(status) => ("account_status", status.as_str()),
    };

    sqlx::query_as::<_, UserStanding>(&format!(
        r#"
        SELECT * FROM {standing_table} WHERE {column} = $1
        ORDER BY standing_last_changed_at DESC
        "#
    ))
    .bind(value)
    .fetch_all(pool)
    .await
    .map_err(|e| StandingError::Storage(e.to_string()))
}

pub(super) async fn upsert_standing_postgres(
    pool: &Pool<Postgres>,
    standing: UserStanding,
) -> Result<UserStanding, StandingError> {
    let standing_table = DB_TABLE_USER_STANDING.as_str();

    sqlx::query_as::<_, UserStanding>(&format!(
        r#"
        INSERT INTO {standing_table} (user_id, account_status, changed_by, standing_last_changed_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id) DO UPDATE SET
            account_status = EXCLUDED.account_status,
            changed_by = EXCLUDED.changed_by,
            standing_last_changed_at = EXCLUDED.standing_last_changed_at
        RETURNING *
        "#
    ))
    .bind(&standing.user_id)
    .bind(standing.account_status.as_str())
    .bind(&standing.changed_by)
    .bind(standing.standing_last_changed_at)
    .fetch_one(pool)
    .await
    .map_err(|e| StandingError::Storage(e.to_string()))
}
