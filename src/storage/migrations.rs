// storage/migrations.rs
// Database migration management

use sqlx::migrate::Migrator;
use sqlx::{Pool, Sqlite};

use crate::error_handling::DatabaseError;

/// Migrations from the `migrations/` directory, embedded at compile time.
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Creates the `app_config` and `ip_to_country` tables if needed.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), DatabaseError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}
