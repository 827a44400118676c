//! Dataset retrieval.
//!
//! This module provides:
//! - The `Fetcher` seam used by the refresh controller
//! - `HttpFetcher`, which discovers snapshots on the publisher's listing page
//! - Size-limited download and gzip helpers

mod download;
mod http;
mod listing;

use std::future::Future;

pub use http::HttpFetcher;
pub use listing::{find_dataset_links, select_latest, DatasetLink};

use crate::error_handling::FetchError;

/// A snapshot newer than the one currently stored.
pub struct DatasetUpdate {
    pub epoch: i64,
    pub file_name: String,
    /// Decompressed CSV bytes (ISO-8859-1)
    pub payload: Vec<u8>,
}

impl std::fmt::Debug for DatasetUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetUpdate")
            .field("epoch", &self.epoch)
            .field("file_name", &self.file_name)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

/// Source of dataset snapshots.
pub trait Fetcher {
    /// Returns the newest snapshot whose epoch is greater than `lower_bound`,
    /// or `None` if nothing newer is published.
    fn latest(
        &self,
        lower_bound: i64,
    ) -> impl Future<Output = Result<Option<DatasetUpdate>, FetchError>> + Send;
}
