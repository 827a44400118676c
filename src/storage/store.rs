//! `DatasetStore`: the single owner of the range table and its epoch marker.

use std::sync::Arc;

use log::warn;
use sqlx::SqlitePool;

use crate::config::UNSET_EPOCH;
use crate::error_handling::DatabaseError;
use crate::storage::models::{CountryMatch, CountryRank, IpRangeRecord};
use crate::storage::{epoch, queries, replace};

/// Handle over the SQLite pool holding the IpToCountry dataset.
///
/// Cheap to clone; all clones share the pool.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    pool: Arc<SqlitePool>,
}

impl DatasetStore {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Current epoch, or `UNSET_EPOCH` if the store was never populated.
    ///
    /// Never fails: read errors are logged and reported as `UNSET_EPOCH` so the
    /// caller treats the dataset as needing a refresh.
    pub async fn get_epoch(&self) -> i64 {
        match self.load_epoch().await {
            Ok(Some(epoch)) => epoch,
            Ok(None) => UNSET_EPOCH,
            Err(e) => {
                warn!("[{}] Failed to read dataset epoch: {e}", e.category());
                UNSET_EPOCH
            }
        }
    }

    /// Fallible variant of [`get_epoch`](Self::get_epoch).
    pub async fn load_epoch(&self) -> Result<Option<i64>, DatabaseError> {
        epoch::load_epoch(&self.pool).await
    }

    /// Atomically swaps in `records` and `new_epoch`. See [`replace::replace_table`].
    pub async fn replace_table(
        &self,
        records: &[IpRangeRecord],
        new_epoch: i64,
    ) -> Result<(), DatabaseError> {
        replace::replace_table(&self.pool, records, new_epoch).await
    }

    pub async fn find_country_by_ip(&self, ip: u32) -> Result<Vec<CountryMatch>, DatabaseError> {
        queries::find_country_by_ip(&self.pool, ip).await
    }

    /// Precondition: `1 <= top_count <= 100`, checked by the caller.
    pub async fn top_countries_by_range_size(
        &self,
        top_count: u32,
    ) -> Result<Vec<CountryRank>, DatabaseError> {
        queries::top_countries_by_range_size(&self.pool, top_count).await
    }

    pub async fn record_count(&self) -> Result<i64, DatabaseError> {
        queries::record_count(&self.pool).await
    }
}
