//! Dataset refresh: compare epochs, fetch, parse, swap.

use log::{debug, info};
use tokio::sync::Mutex;

use crate::dataset::parse_dataset;
use crate::error_handling::RefreshError;
use crate::fetch::Fetcher;
use crate::storage::DatasetStore;

/// Result of a refresh attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Nothing newer was published; the stored dataset was left alone.
    UpToDate { epoch: i64 },
    /// A newer snapshot replaced the stored dataset.
    Refreshed { epoch: i64, records: usize },
}

impl RefreshOutcome {
    pub fn epoch(&self) -> i64 {
        match self {
            RefreshOutcome::UpToDate { epoch } | RefreshOutcome::Refreshed { epoch, .. } => *epoch,
        }
    }
}

/// Keeps the stored dataset in step with the newest published snapshot.
///
/// Staleness is checked on every call; nothing is cached between calls.
/// `refresh` is single-flight: concurrent callers queue on an internal lock
/// and each sees the state left by the previous one.
pub struct RefreshController<F: Fetcher> {
    store: DatasetStore,
    fetcher: F,
    lock: Mutex<()>,
}

impl<F: Fetcher> RefreshController<F> {
    pub fn new(store: DatasetStore, fetcher: F) -> Self {
        Self {
            store,
            fetcher,
            lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Brings the store up to date with the fetcher.
    ///
    /// # Errors
    ///
    /// Returns `RefreshError` if the snapshot could not be fetched, parsed or
    /// stored. The previously stored table and epoch stay in place and usable.
    pub async fn refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        let _guard = self.lock.lock().await;

        let stored = self.store.get_epoch().await;
        debug!("Stored dataset epoch: {stored}");

        let update = match self.fetcher.latest(stored).await? {
            Some(update) if update.epoch > stored => update,
            Some(update) => {
                debug!(
                    "Fetched epoch {} is not newer than stored epoch {stored}",
                    update.epoch
                );
                return Ok(RefreshOutcome::UpToDate { epoch: stored });
            }
            None => return Ok(RefreshOutcome::UpToDate { epoch: stored }),
        };

        info!(
            "Refreshing dataset: epoch {stored} -> {} ({}, {} bytes)",
            update.epoch,
            update.file_name,
            update.payload.len()
        );

        let records = parse_dataset(&update.payload)?;
        self.store.replace_table(&records, update.epoch).await?;

        info!(
            "Stored {} IP ranges for epoch {}",
            records.len(),
            update.epoch
        );
        Ok(RefreshOutcome::Refreshed {
            epoch: update.epoch,
            records: records.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::{ErrorCategory, FetchError};
    use crate::fetch::DatasetUpdate;
    use crate::storage::test_helpers::{create_test_pool, make_record};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const THREE_ROWS: &str = "# IpToCountry test snapshot\n\
\"16909056\",\"16909311\",\"arin\",\"1010000000\",\"US\",\"USA\",\"United States\"\n\
\"0\",\"255\",\"iana\",\"410227200\",\"ZZ\",\"ZZZ\",\"Reserved\"\n\
\"3758096384\",\"3758096639\",\"apnic\",\"1286496000\",\"AU\",\"AUS\",\"Australia\"\n";

    /// Serves one fixed answer and counts how often it was asked.
    struct FakeFetcher {
        epoch: Option<i64>,
        payload: &'static str,
        calls: AtomicUsize,
    }

    impl FakeFetcher {
        fn new(epoch: Option<i64>, payload: &'static str) -> Self {
            Self {
                epoch,
                payload,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Fetcher for FakeFetcher {
        async fn latest(&self, _lower_bound: i64) -> Result<Option<DatasetUpdate>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.epoch.map(|epoch| DatasetUpdate {
                epoch,
                file_name: format!("IpToCountry.{epoch}.csv.gz"),
                payload: self.payload.as_bytes().to_vec(),
            }))
        }
    }

    struct FailingFetcher;

    impl Fetcher for FailingFetcher {
        async fn latest(&self, _lower_bound: i64) -> Result<Option<DatasetUpdate>, FetchError> {
            Err(FetchError::TooLarge {
                what: "Download",
                size: 2,
                max: 1,
            })
        }
    }

    async fn seeded_store(epoch: i64) -> DatasetStore {
        let store = DatasetStore::new(Arc::new(create_test_pool().await));
        store
            .replace_table(&[make_record(0, 0, 255, "AU", "Australia")], epoch)
            .await
            .expect("Should seed store");
        store
    }

    #[tokio::test]
    async fn test_refresh_from_empty_store() {
        let store = DatasetStore::new(Arc::new(create_test_pool().await));
        let controller = RefreshController::new(store, FakeFetcher::new(Some(20230101), THREE_ROWS));

        let outcome = controller.refresh().await.expect("Refresh should succeed");
        assert_eq!(
            outcome,
            RefreshOutcome::Refreshed {
                epoch: 20230101,
                records: 3
            }
        );
        assert_eq!(controller.store().get_epoch().await, 20230101);
        assert_eq!(controller.store().record_count().await.expect("Count"), 3);
    }

    #[tokio::test]
    async fn test_same_epoch_does_not_replace() {
        let controller =
            RefreshController::new(seeded_store(100).await, FakeFetcher::new(Some(100), THREE_ROWS));

        let outcome = controller.refresh().await.expect("Refresh should succeed");
        assert_eq!(outcome, RefreshOutcome::UpToDate { epoch: 100 });
        assert_eq!(controller.store().record_count().await.expect("Count"), 1);
    }

    #[tokio::test]
    async fn test_older_epoch_does_not_replace() {
        let controller =
            RefreshController::new(seeded_store(100).await, FakeFetcher::new(Some(50), THREE_ROWS));

        let outcome = controller.refresh().await.expect("Refresh should succeed");
        assert_eq!(outcome.epoch(), 100);
        assert_eq!(controller.store().record_count().await.expect("Count"), 1);
    }

    #[tokio::test]
    async fn test_nothing_published_is_up_to_date() {
        let store = DatasetStore::new(Arc::new(create_test_pool().await));
        let controller = RefreshController::new(store, FakeFetcher::new(None, ""));

        let outcome = controller.refresh().await.expect("Refresh should succeed");
        assert_eq!(outcome, RefreshOutcome::UpToDate { epoch: -1 });
    }

    #[tokio::test]
    async fn test_parse_failure_keeps_previous_dataset() {
        let controller = RefreshController::new(
            seeded_store(100).await,
            FakeFetcher::new(Some(200), "\"1\",\"2\",\"arin\"\n"),
        );

        let err = controller.refresh().await.expect_err("Refresh should fail");
        assert!(matches!(err, RefreshError::Ingest(_)));
        assert_eq!(err.category(), ErrorCategory::FatalIngest);
        assert_eq!(controller.store().get_epoch().await, 100);
        assert_eq!(controller.store().record_count().await.expect("Count"), 1);
    }

    #[tokio::test]
    async fn test_empty_snapshot_is_rejected_by_store() {
        let controller = RefreshController::new(
            seeded_store(100).await,
            FakeFetcher::new(Some(200), "# only comments\n"),
        );

        let err = controller.refresh().await.expect_err("Refresh should fail");
        assert!(matches!(err, RefreshError::Store(_)));
        assert_eq!(controller.store().get_epoch().await, 100);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_dataset() {
        let controller = RefreshController::new(seeded_store(100).await, FailingFetcher);

        let err = controller.refresh().await.expect_err("Refresh should fail");
        assert!(matches!(err, RefreshError::Fetch(_)));
        assert_eq!(err.category(), ErrorCategory::TransientIo);
        assert_eq!(controller.store().get_epoch().await, 100);
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_ingest_once() {
        let store = DatasetStore::new(Arc::new(create_test_pool().await));
        let controller = Arc::new(RefreshController::new(
            store,
            FakeFetcher::new(Some(20230101), THREE_ROWS),
        ));

        let a = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.refresh().await }
        });
        let b = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.refresh().await }
        });

        let outcomes = [
            a.await.expect("Task a").expect("Refresh a"),
            b.await.expect("Task b").expect("Refresh b"),
        ];
        let refreshed = outcomes
            .iter()
            .filter(|o| matches!(o, RefreshOutcome::Refreshed { .. }))
            .count();
        assert_eq!(refreshed, 1);
        assert_eq!(controller.fetcher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(controller.store().record_count().await.expect("Count"), 3);
    }
}
