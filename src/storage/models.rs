// storage/models.rs
// Database models and query result types

use serde::Serialize;

/// One row of the `ip_to_country` table.
///
/// # Database Schema
///
/// Numeric bounds are stored as SQLite `INTEGER` (every `u32` fits in `i64`);
/// the `_str` columns hold the same bounds in dotted-quad form so query results
/// can be labelled without re-encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpRangeRecord {
    /// Zero-based position of the row in the source file
    pub id: i64,
    pub ip_from: u32,
    pub ip_from_str: String,
    pub ip_to: u32,
    pub ip_to_str: String,
    /// Regional internet registry (e.g. `apnic`)
    pub registry: String,
    /// Assignment date as published (seconds since the Unix epoch)
    pub assigned: String,
    pub country_code_2: String,
    pub country_code_3: String,
    pub country_name: String,
}

/// A range containing a looked-up address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryMatch {
    pub country: String,
    /// `"<ip_from_str> - <ip_to_str>"`
    pub ip_range: String,
}

/// One entry of the ranking by cumulative address space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryRank {
    pub country: String,
    pub total_num_unique_ips: i64,
    /// SQL `RANK()`: ties share a rank and the next rank skips ahead
    pub ip_range_size_rank: i64,
}
