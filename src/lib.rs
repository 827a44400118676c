//! ip_to_country library: IPv4 to country lookups over the IpToCountry dataset
//!
//! This library keeps a local SQLite copy of the IpToCountry dataset in step with
//! the publisher's snapshot listing, and answers two queries against it: which
//! country an IPv4 address is assigned to, and which countries hold the most
//! address space.
//!
//! # Example
//!
//! ```no_run
//! use ip_to_country::{run_query, Config, Query};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     db_path: std::path::PathBuf::from("ip_to_country.db"),
//!     ..Default::default()
//! };
//!
//! let report = run_query(config, Query::Map("42.60.163.97".to_string())).await?;
//! println!("{}", report.output());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod config;
pub mod dataset;
pub mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod ip;
pub mod present;
pub mod refresh;
mod run;
pub mod storage;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, Opt};
pub use error_handling::{ErrorCategory, RefreshError, ValidationError};
pub use fetch::{DatasetUpdate, Fetcher, HttpFetcher};
pub use refresh::{RefreshController, RefreshOutcome};
pub use run::{run_query, validate_query, validate_top_count, Query, QueryReport, ValidQuery};
pub use storage::{run_migrations, DatasetStore};
