//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};

use crate::config::constants::{
    DB_PATH, DEFAULT_SOURCE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, MAX_DOWNLOAD_SIZE,
    MAX_PAYLOAD_SIZE,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// Passed explicitly to every component that needs it; nothing in the crate
/// reads configuration from global state.
///
/// # Examples
///
/// ```no_run
/// use ip_to_country::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("/var/lib/ip_to_country/data.db"),
///     timeout_seconds: 120,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    pub db_path: PathBuf,

    /// Directory listing URL that publishes the dataset snapshots
    pub source_url: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Maximum compressed download size in bytes
    pub max_download_bytes: usize,

    /// Maximum decompressed payload size in bytes
    pub max_payload_bytes: usize,

    /// Query the stored dataset without checking for a newer snapshot
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DB_PATH),
            source_url: DEFAULT_SOURCE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_download_bytes: MAX_DOWNLOAD_SIZE,
            max_payload_bytes: MAX_PAYLOAD_SIZE,
            offline: false,
        }
    }
}

/// Command-line options.
///
/// Exactly one of `--ip` or `--top` must be given. Both are taken as raw
/// strings so that validation failures produce the application's own
/// diagnostics rather than clap's.
#[derive(Debug, Parser)]
#[command(
    name = "ip_to_country",
    about = "Maps IPv4 addresses to countries using the IpToCountry dataset.",
    version
)]
#[command(group(ArgGroup::new("mode").required(true).args(["ip", "top"])))]
pub struct Opt {
    /// Maps a specified IPv4 address (e.g. 42.60.163.97) to the country that it is assigned to
    #[arg(short = 'm', long = "ip", visible_alias = "map", value_name = "IPV4")]
    pub ip: Option<String>,

    /// Returns the top N (between 1 to 100) countries ranked by the cumulative quantity of their unique IP assignments
    #[arg(short = 't', long = "top", visible_alias = "n", value_name = "N")]
    pub top: Option<String>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    #[arg(long, value_parser, env = "IP_TO_COUNTRY_DB_PATH", default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Directory listing URL that publishes IpToCountry.<epoch>.csv.gz files
    #[arg(long, env = "IP_TO_COUNTRY_URL", default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Skip the dataset refresh and query the stored data as-is
    #[arg(long)]
    pub offline: bool,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            log_level: opt.log_level,
            log_format: opt.log_format,
            db_path: opt.db_path,
            source_url: opt.source_url,
            timeout_seconds: opt.timeout_seconds,
            user_agent: opt.user_agent,
            offline: opt.offline,
            ..Default::default()
        }
    }
}
