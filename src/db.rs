//! Database pool construction and schema bootstrap.

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;
use crate::error::AppError;

/// Embedded migrations from the `migrations/` directory.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Connects to PostgreSQL using the configured URL.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
}

/// Applies all pending migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| AppError::Database(format!("migration failed: {}", e)))
}

/// Drops every application table (and the migration ledger) and rebuilds
/// the schema from scratch. Used by the development-only reset endpoint.
pub async fn reset_schema(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        "DROP TABLE IF EXISTS task_tags, subtasks, tasks, tags, users, _sqlx_migrations CASCADE",
    )
    .execute(pool)
    .await?;
    sqlx::query("DROP TYPE IF EXISTS task_status CASCADE")
        .execute(pool)
        .await?;

    run_migrations(pool).await
}
