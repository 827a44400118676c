//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - The logger (plain or JSON output)
//! - The HTTP client used to reach the dataset publisher
//!
//! The database pool lives in `storage::pool` next to the migrations it depends on.

mod client;
mod logger;

pub use client::init_client;
pub use logger::init_logger_with;
