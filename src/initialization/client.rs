//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error_handling::InitializationError;
use reqwest::ClientBuilder;

/// Initializes the HTTP client used for the listing page and snapshot downloads.
///
/// The client carries the configured User-Agent and a per-request timeout.
/// Redirects are followed with reqwest's default policy, since mirrors of the
/// listing page commonly redirect to a canonical host.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails,
/// for example when the User-Agent is not a valid header value.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}
