//! Error handling and retry logic.
//!
//! This module provides:
//! - Typed errors for each layer (validation, storage, fetch, ingest, refresh)
//! - The coarse error taxonomy used in log lines
//! - The download retry strategy

mod categorization;
mod types;

// Re-export public API
pub use categorization::{get_retry_strategy, is_retriable_fetch_error};
pub use types::{
    DatabaseError, ErrorCategory, FetchError, IngestError, InitializationError, RefreshError,
    ValidationError,
};
