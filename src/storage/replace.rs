//! Atomic replacement of the range table.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::config::INSERT_BATCH_ROWS;
use crate::error_handling::DatabaseError;
use crate::ip::to_dotted;
use crate::storage::epoch::store_epoch;
use crate::storage::models::IpRangeRecord;

/// Checks that a record set is complete enough to become the live table.
///
/// Requires at least one record, and for each record: `ip_from <= ip_to`,
/// dotted labels that match the numeric bounds, and non-empty registry,
/// country codes and country name. `assigned` may be empty.
pub fn validate_records(records: &[IpRangeRecord]) -> Result<(), DatabaseError> {
    if records.is_empty() {
        return Err(DatabaseError::InvalidRecordSet(
            "No records in dataset".to_string(),
        ));
    }

    for record in records {
        let invalid = |reason: &str| {
            DatabaseError::InvalidRecordSet(format!("record {}: {reason}", record.id))
        };

        if record.ip_from > record.ip_to {
            return Err(invalid("ip_from is greater than ip_to"));
        }
        if record.ip_from_str != to_dotted(record.ip_from)
            || record.ip_to_str != to_dotted(record.ip_to)
        {
            return Err(invalid("dotted range labels do not match numeric bounds"));
        }
        for (name, value) in [
            ("registry", &record.registry),
            ("country_code_2", &record.country_code_2),
            ("country_code_3", &record.country_code_3),
            ("country_name", &record.country_name),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(&format!("missing {name}")));
            }
        }
    }

    Ok(())
}

/// Replaces the whole range table and the epoch marker in one transaction.
///
/// On any error the transaction is rolled back (dropped uncommitted), leaving
/// the previous table and epoch exactly as they were.
pub async fn replace_table(
    pool: &SqlitePool,
    records: &[IpRangeRecord],
    new_epoch: i64,
) -> Result<(), DatabaseError> {
    validate_records(records)?;

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM ip_to_country")
        .execute(&mut *tx)
        .await?;

    for chunk in records.chunks(INSERT_BATCH_ROWS) {
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO ip_to_country (
                id, ip_from, ip_from_str, ip_to, ip_to_str,
                registry, assigned, country_code_2, country_code_3, country_name
            ) ",
        );
        query_builder.push_values(chunk, |mut row, record| {
            row.push_bind(record.id)
                .push_bind(i64::from(record.ip_from))
                .push_bind(record.ip_from_str.as_str())
                .push_bind(i64::from(record.ip_to))
                .push_bind(record.ip_to_str.as_str())
                .push_bind(record.registry.as_str())
                .push_bind(record.assigned.as_str())
                .push_bind(record.country_code_2.as_str())
                .push_bind(record.country_code_3.as_str())
                .push_bind(record.country_name.as_str());
        });
        query_builder.build().execute(&mut *tx).await.map_err(|e| {
            log::error!("Failed to insert range records: {e}");
            DatabaseError::SqlError(e)
        })?;
    }

    store_epoch(&mut tx, new_epoch).await?;

    tx.commit().await?;

    log::info!(
        "Replaced ip_to_country table with {} records (epoch {})",
        records.len(),
        new_epoch
    );
    Ok(())
}
