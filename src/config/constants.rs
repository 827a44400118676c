//! Configuration constants.
//!
//! This module defines the constants used throughout the application, including
//! dataset locations, persisted keys, timeouts, size limits and retry parameters.

/// Default SQLite database path.
pub const DB_PATH: &str = "./ip_to_country.db";

/// Directory listing that publishes `IpToCountry.<epoch>.csv.gz` snapshots.
pub const DEFAULT_SOURCE_URL: &str = "http://software77.net/geo-ip/history/";

/// Default User-Agent string for HTTP requests.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str = concat!("ip_to_country/", env!("CARGO_PKG_VERSION"));

/// Per-request HTTP timeout in seconds.
///
/// The compressed dataset is several megabytes, so this is deliberately
/// generous compared to a page fetch.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

// Dataset file naming
/// File name pattern of a published snapshot; the capture group is the epoch.
pub const DATASET_FILE_PATTERN: &str = r"^IpToCountry\.([0-9]+)\.csv\.gz$";

// Persisted state
/// `app_config.key_id` under which the dataset epoch is stored.
pub const LATEST_FILE_EPOCH_KEY: &str = "LATEST_FILE_EPOCH";
/// Epoch reported before the first successful ingest.
pub const UNSET_EPOCH: i64 = -1;

// Download size limits
/// Maximum compressed download size in bytes (64MB)
pub const MAX_DOWNLOAD_SIZE: usize = 64 * 1024 * 1024;
/// Maximum decompressed payload size in bytes (512MB)
/// Guards against gzip bombs; the real CSV is well under 20MB.
pub const MAX_PAYLOAD_SIZE: usize = 512 * 1024 * 1024;

// Query limits
/// Smallest accepted value for the top-N query.
pub const MIN_TOP_COUNT: u32 = 1;
/// Largest accepted value for the top-N query.
pub const MAX_TOP_COUNT: u32 = 100;
/// Accepted spellings of the top-N argument: 1 to 100, no sign, no leading zero.
pub const TOP_COUNT_PATTERN: &str = r"^[1-9][0-9]?$|^100$";

// Bulk insert
/// Rows per multi-row INSERT statement.
/// 10 bound columns per row keeps each statement under SQLite's 32766 variable limit.
pub const INSERT_BATCH_ROWS: usize = 1000;

// Retry strategy constants
/// Initial delay in milliseconds before the first retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;
/// Exponential backoff factor
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay in seconds between retries
pub const RETRY_MAX_DELAY_SECS: u64 = 15;
/// Maximum number of retries after the initial attempt
pub const RETRY_MAX_ATTEMPTS: usize = 3;

/// HTTP status code for "Too Many Requests"
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;
