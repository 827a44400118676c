//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, persisted keys, etc.)
//! - CLI option types and parsing
//! - The library `Config` passed explicitly into each component

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, Opt};
