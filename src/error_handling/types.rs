//! Error type definitions.
//!
//! This module defines all error types used throughout the application, plus the
//! coarse `ErrorCategory` each of them falls into.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Coarse error taxonomy used for logging and propagation decisions.
///
/// - `Validation`: bad user input or a malformed record set; surfaced to the caller.
/// - `TransientIo`: network or storage access failures; logged and degraded.
/// - `FatalIngest`: the downloaded dataset could not be converted; aborts one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorCategory {
    Validation,
    TransientIo,
    FatalIngest,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::TransientIo => "transient I/O",
            ErrorCategory::FatalIngest => "fatal ingest",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Rejected user input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// The argument is not a dotted-quad IPv4 address.
    #[error("Invalid IPv4 address [{0}]")]
    InvalidIpv4(String),

    /// The top-N argument is not an integer between 1 and 100.
    #[error("Invalid number parameter.")]
    InvalidTopCount(String),
}

impl ValidationError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// A record set handed to `replace_table` does not have the required shape.
    #[error("Invalid record set: {0}")]
    InvalidRecordSet(String),

    /// The new epoch is older than the stored one.
    #[error("Refusing to replace dataset: epoch {new_epoch} is older than stored epoch")]
    EpochRegression { new_epoch: i64 },
}

impl DatabaseError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DatabaseError::InvalidRecordSet(_) | DatabaseError::EpochRegression { .. } => {
                ErrorCategory::Validation
            }
            _ => ErrorCategory::TransientIo,
        }
    }
}

/// Error types for retrieving a dataset snapshot.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] ReqwestError),

    /// The server answered with a non-success status.
    #[error("Unexpected HTTP status {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The compressed or decompressed body exceeded the configured limit.
    #[error("{what} too large: {size} bytes (max: {max} bytes)")]
    TooLarge {
        what: &'static str,
        size: u64,
        max: usize,
    },

    /// The downloaded file is not valid gzip.
    #[error("Failed to decompress dataset: {0}")]
    Decompress(#[source] std::io::Error),

    /// A listing link or the configured source URL could not be resolved.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl FetchError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::TransientIo
    }
}

/// Error types for converting a downloaded payload into range records.
///
/// Any of these aborts the whole batch: a dataset is ingested completely or not at all.
/// Line numbers are 1-based and count comment lines.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The CSV reader itself failed (bad quoting, I/O).
    #[error("Malformed CSV near line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },

    /// A row does not have the expected seven columns.
    #[error("Line {line}: expected 7 columns, found {found}")]
    ColumnCount { line: u64, found: usize },

    /// `ip_from` or `ip_to` is not an unsigned 32-bit integer.
    #[error("Line {line}: {field} is not a valid IPv4 number: {value:?}")]
    InvalidNumber {
        line: u64,
        field: &'static str,
        value: String,
    },

    /// The range end lies before its start.
    #[error("Line {line}: ip_from {from} is greater than ip_to {to}")]
    InvertedRange { line: u64, from: u32, to: u32 },
}

impl IngestError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::FatalIngest
    }
}

/// A refresh attempt that did not complete.
///
/// The previously stored dataset and epoch are untouched in every case.
#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("Failed to fetch latest dataset: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to parse dataset: {0}")]
    Ingest(#[from] IngestError),

    #[error("Failed to store dataset: {0}")]
    Store(#[from] DatabaseError),
}

impl RefreshError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RefreshError::Fetch(e) => e.category(),
            RefreshError::Ingest(e) => e.category(),
            RefreshError::Store(e) => e.category(),
        }
    }
}
