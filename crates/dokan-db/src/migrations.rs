//! Schema migrations, embedded at compile time from `migrations/sqlite/`.
//!
//! Files apply in name order (`NNN_description.sql`), each once, tracked in
//! `_sqlx_migrations`. Applied files are checksummed: ship changes as a new
//! file, never an edit.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies whatever is pending; a no-op on an up-to-date store.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(embedded = MIGRATOR.migrations.len(), "Migrations applied");
    Ok(())
}

/// `(embedded, applied)`.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((total, usize::try_from(applied).unwrap_or(0)))
}
