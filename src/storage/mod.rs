// storage/mod.rs
// Database operations module

pub mod epoch;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod replace;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used items
pub use migrations::run_migrations;
pub use models::{CountryMatch, CountryRank, IpRangeRecord};
pub use pool::init_db_pool_with_path;
pub use store::DatasetStore;
