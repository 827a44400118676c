//! Shared test helpers for storage module tests.
//!
//! This module provides common utilities for database setup and test data creation
//! used across storage module tests.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::ip::to_dotted;
use crate::storage::models::IpRangeRecord;
use crate::storage::run_migrations;

/// Creates a test database pool with migrations applied.
///
/// Uses an in-memory database for fast test execution. The pool is pinned to a
/// single connection that never expires, since every new connection to
/// `sqlite::memory:` would open a fresh, empty database.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Creates a well-formed range record with derived dotted labels.
pub fn make_record(id: i64, ip_from: u32, ip_to: u32, code: &str, country: &str) -> IpRangeRecord {
    IpRangeRecord {
        id,
        ip_from,
        ip_from_str: to_dotted(ip_from),
        ip_to,
        ip_to_str: to_dotted(ip_to),
        registry: "arin".to_string(),
        assigned: "1010000000".to_string(),
        country_code_2: code.to_string(),
        country_code_3: format!("{code}X"),
        country_name: country.to_string(),
    }
}
