//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `ip_to_country` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output and exit codes
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use ip_to_country::initialization::init_logger_with;
use ip_to_country::{run_query, Config, Opt, Query, ValidationError};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), from the current
    // directory first, then next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();
    let query = Query::from_opt(&opt).context("Either --ip or --top is required")?;
    let config = Config::from(opt);

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    match run_query(config, query).await {
        Ok(report) => {
            println!("{}", report.output());
            Ok(())
        }
        Err(e) => {
            if let Some(invalid) = e.downcast_ref::<ValidationError>() {
                println!("{invalid}");
            } else {
                eprintln!("ip_to_country error: {:#}", e);
            }
            process::exit(1);
        }
    }
}
