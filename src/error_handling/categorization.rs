//! Retry strategy and retriability checks for dataset downloads.

use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

use super::types::FetchError;
use crate::config::{
    HTTP_STATUS_TOO_MANY_REQUESTS, RETRY_FACTOR, RETRY_INITIAL_DELAY_MS, RETRY_MAX_ATTEMPTS,
    RETRY_MAX_DELAY_SECS,
};

/// Creates an exponential backoff retry strategy.
///
/// Delays start at `RETRY_INITIAL_DELAY_MS` and are multiplied by
/// `RETRY_FACTOR` each time (500ms, 1s, 2s), capped at `RETRY_MAX_DELAY_SECS`,
/// for at most `RETRY_MAX_ATTEMPTS` retries after the first attempt.
///
/// tokio-retry computes the n-th delay as `base^n * factor`, so the
/// multiplier goes in `from_millis` and the scale in `factor`.
pub fn get_retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(RETRY_FACTOR)
        .factor(RETRY_INITIAL_DELAY_MS / RETRY_FACTOR)
        .max_delay(Duration::from_secs(RETRY_MAX_DELAY_SECS))
        .take(RETRY_MAX_ATTEMPTS)
}

/// Determines if a fetch error is worth retrying.
///
/// Timeouts, connection failures, 5xx responses and 429 are transient. Other
/// 4xx responses, oversized bodies, bad gzip and bad URLs are permanent.
pub fn is_retriable_fetch_error(error: &FetchError) -> bool {
    match error {
        FetchError::Http(e) => {
            if let Some(status) = e.status() {
                return is_retriable_status(status.as_u16());
            }
            e.is_timeout() || e.is_connect() || e.is_request() || e.is_body()
        }
        FetchError::Status { status, .. } => is_retriable_status(status.as_u16()),
        FetchError::TooLarge { .. } | FetchError::Decompress(_) | FetchError::InvalidUrl(_) => {
            false
        }
    }
}

fn is_retriable_status(status_code: u16) -> bool {
    status_code == HTTP_STATUS_TOO_MANY_REQUESTS || (500..600).contains(&status_code)
}
