//! Lookup and ranking queries over the range table.

use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::storage::models::{CountryMatch, CountryRank};

/// Returns every range containing `ip`, ordered by range start.
///
/// Published data has at most one match, but overlapping ranges are returned
/// in full rather than picking one.
pub async fn find_country_by_ip(
    pool: &SqlitePool,
    ip: u32,
) -> Result<Vec<CountryMatch>, DatabaseError> {
    let rows = sqlx::query(
        "SELECT country_name AS country,
                ip_from_str || ' - ' || ip_to_str AS ip_range
         FROM ip_to_country
         WHERE ? BETWEEN ip_from AND ip_to
         ORDER BY ip_from, id",
    )
    .bind(i64::from(ip))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| CountryMatch {
            country: row.get("country"),
            ip_range: row.get("ip_range"),
        })
        .collect())
}

/// Ranks countries by the number of addresses across all their ranges.
///
/// Uses `RANK()` so equal totals share a rank and the following rank is the
/// 1-based position (1, 2, 2, 4). Ties are listed alphabetically.
pub async fn top_countries_by_range_size(
    pool: &SqlitePool,
    top_count: u32,
) -> Result<Vec<CountryRank>, DatabaseError> {
    let rows = sqlx::query(
        "WITH totals AS (
             SELECT country_name AS country,
                    SUM(ip_to - ip_from + 1) AS total_num_unique_ips
             FROM ip_to_country
             GROUP BY country_name
         )
         SELECT country,
                total_num_unique_ips,
                RANK() OVER (ORDER BY total_num_unique_ips DESC) AS ip_range_size_rank
         FROM totals
         ORDER BY ip_range_size_rank, country
         LIMIT ?",
    )
    .bind(i64::from(top_count))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| CountryRank {
            country: row.get("country"),
            total_num_unique_ips: row.get("total_num_unique_ips"),
            ip_range_size_rank: row.get("ip_range_size_rank"),
        })
        .collect())
}

/// Number of rows in the range table.
pub async fn record_count(pool: &SqlitePool) -> Result<i64, DatabaseError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ip_to_country")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
