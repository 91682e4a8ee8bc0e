use deadpool_diesel::sqlite::Pool;
use diesel::connection::SimpleConnection;
use snafu::ResultExt;

use crate::Result;
use crate::error::{DbInteractSnafu, DbMigrationSnafu, DbPoolSnafu};

// Statements use IF NOT EXISTS, running them again is a no-op
const CREATE_PASSWORDS: &str =
    include_str!("../migrations/2026-10-19-000000_create_passwords/up.sql");

/// Applies the embedded schema on the given pool
pub async fn run_migrations(pool: &Pool) -> Result<()> {
    let db = pool.get().await.context(DbPoolSnafu)?;

    let migrate_res = db
        .interact(|conn| conn.batch_execute(CREATE_PASSWORDS))
        .await
        .context(DbInteractSnafu)?;

    migrate_res.context(DbMigrationSnafu {
        name: "create_passwords".to_string(),
    })
}
