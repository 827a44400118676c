//! Dataset epoch marker.
//!
//! The epoch lives in `app_config` under `LATEST_FILE_EPOCH`. It is only ever
//! written inside the transaction that replaces the range table.

use sqlx::{SqliteConnection, SqlitePool};

use crate::config::LATEST_FILE_EPOCH_KEY;
use crate::error_handling::DatabaseError;

/// Reads the stored epoch.
///
/// Returns `Ok(None)` if the marker row is missing.
pub async fn load_epoch(pool: &SqlitePool) -> Result<Option<i64>, DatabaseError> {
    let epoch = sqlx::query_scalar::<_, i64>("SELECT param_value FROM app_config WHERE key_id = ?")
        .bind(LATEST_FILE_EPOCH_KEY)
        .fetch_optional(pool)
        .await?;
    Ok(epoch)
}

/// Writes the epoch marker on an open connection (normally a transaction).
///
/// The update is refused if it would move the epoch backwards.
pub(crate) async fn store_epoch(
    conn: &mut SqliteConnection,
    new_epoch: i64,
) -> Result<(), DatabaseError> {
    let updated_at_ms = chrono::Utc::now().timestamp_millis();

    let result = sqlx::query(
        "INSERT INTO app_config (key_id, param_value, updated_at_ms)
         VALUES (?, ?, ?)
         ON CONFLICT(key_id) DO UPDATE SET
             param_value=excluded.param_value,
             updated_at_ms=excluded.updated_at_ms
         WHERE excluded.param_value >= app_config.param_value",
    )
    .bind(LATEST_FILE_EPOCH_KEY)
    .bind(new_epoch)
    .bind(updated_at_ms)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() != 1 {
        return Err(DatabaseError::EpochRegression { new_epoch });
    }
    Ok(())
}
