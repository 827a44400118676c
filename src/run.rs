//! Query execution: validate, refresh, look up, render.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use regex::Regex;

use crate::config::{Config, Opt, MAX_TOP_COUNT, MIN_TOP_COUNT, TOP_COUNT_PATTERN};
use crate::error_handling::ValidationError;
use crate::fetch::HttpFetcher;
use crate::initialization::init_client;
use crate::ip;
use crate::present::{ip_heading, render, top_heading};
use crate::refresh::{RefreshController, RefreshOutcome};
use crate::storage::{init_db_pool_with_path, run_migrations, DatasetStore};

static TOP_COUNT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(TOP_COUNT_PATTERN).expect("Failed to compile top count pattern - this is a bug")
});

/// A query as typed by the user, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// `--ip <IPV4>`
    Map(String),
    /// `--top <N>`
    Top(String),
}

impl Query {
    /// Picks the query mode from parsed CLI options.
    ///
    /// clap's `mode` group guarantees exactly one of the two is set; `None`
    /// is only returned for options built by hand.
    pub fn from_opt(opt: &Opt) -> Option<Self> {
        match (&opt.ip, &opt.top) {
            (Some(ip), None) => Some(Query::Map(ip.clone())),
            (None, Some(top)) => Some(Query::Top(top.clone())),
            _ => None,
        }
    }
}

/// A query that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidQuery {
    Map { text: String, ip: u32 },
    Top(u32),
}

/// Parses the top-N argument. Only `1` to `100` written without sign or
/// leading zeros is accepted.
pub fn validate_top_count(text: &str) -> Option<u32> {
    if !TOP_COUNT_REGEX.is_match(text) {
        return None;
    }
    text.parse::<u32>()
        .ok()
        .filter(|n| (MIN_TOP_COUNT..=MAX_TOP_COUNT).contains(n))
}

/// Validates user input before any network or database work happens.
///
/// # Errors
///
/// Returns the `ValidationError` whose message is shown to the user verbatim.
pub fn validate_query(query: &Query) -> Result<ValidQuery, ValidationError> {
    match query {
        Query::Map(text) => ip::parse(text)
            .map(|ip| ValidQuery::Map {
                text: text.clone(),
                ip,
            })
            .ok_or_else(|| ValidationError::InvalidIpv4(text.clone())),
        Query::Top(text) => validate_top_count(text)
            .map(ValidQuery::Top)
            .ok_or_else(|| ValidationError::InvalidTopCount(text.clone())),
    }
}

/// Output of a completed query.
#[derive(Debug, Clone)]
pub struct QueryReport {
    /// `Search result for ...:` line
    pub heading: String,
    /// Pretty-printed JSON, or `No result found.`
    pub body: String,
    /// `None` when offline or when the refresh failed
    pub refresh: Option<RefreshOutcome>,
    /// Dataset epoch the query ran against
    pub epoch: i64,
}

impl QueryReport {
    /// Heading and body as printed to stdout, preceded by a blank line.
    pub fn output(&self) -> String {
        format!("\n{}\n{}", self.heading, self.body)
    }
}

/// Runs one query end to end.
///
/// The dataset is refreshed first unless `config.offline` is set. A failed
/// refresh is logged and the query proceeds against whatever is stored.
/// Query failures are logged and reported like an empty result.
///
/// # Errors
///
/// Returns an error if validation fails (a `ValidationError` can be recovered
/// with `downcast_ref`), or if the database or HTTP client cannot be set up.
///
/// # Example
///
/// ```no_run
/// use ip_to_country::{run_query, Config, Query};
///
/// # async fn example() -> anyhow::Result<()> {
/// let report = run_query(Config::default(), Query::Top("10".to_string())).await?;
/// println!("{}", report.output());
/// # Ok(())
/// # }
/// ```
pub async fn run_query(config: Config, query: Query) -> Result<QueryReport> {
    let query = validate_query(&query)?;

    let pool = init_db_pool_with_path(&config.db_path)
        .await
        .context("Failed to initialize database pool")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    let store = DatasetStore::new(pool);

    let refresh = if config.offline {
        info!("Offline mode: skipping dataset refresh");
        None
    } else {
        let client = init_client(&config).context("Failed to initialize HTTP client")?;
        let fetcher =
            HttpFetcher::new(client, &config).context("Failed to initialize dataset fetcher")?;
        let controller = RefreshController::new(store.clone(), fetcher);
        match controller.refresh().await {
            Ok(outcome) => {
                debug!("Refresh outcome: {outcome:?}");
                Some(outcome)
            }
            Err(e) => {
                warn!(
                    "[{}] Dataset refresh failed, using stored data: {e}",
                    e.category()
                );
                None
            }
        }
    };
    let epoch = match refresh {
        Some(outcome) => outcome.epoch(),
        None => store.get_epoch().await,
    };

    let (heading, body) = match query {
        ValidQuery::Map { text, ip } => {
            let rows = store.find_country_by_ip(ip).await.unwrap_or_else(|e| {
                warn!("[{}] IP lookup failed: {e}", e.category());
                Vec::new()
            });
            (ip_heading(&text), render(&rows))
        }
        ValidQuery::Top(top_count) => {
            let rows = store
                .top_countries_by_range_size(top_count)
                .await
                .unwrap_or_else(|e| {
                    warn!("[{}] Ranking query failed: {e}", e.category());
                    Vec::new()
                });
            (top_heading(top_count), render(&rows))
        }
    };

    Ok(QueryReport {
        heading,
        body,
        refresh,
        epoch,
    })
}
