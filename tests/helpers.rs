// Shared test helpers for mock dataset servers and on-disk databases.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use httptest::{matchers::*, responders::*, Expectation, Server};
use tempfile::TempDir;

use ip_to_country::Config;

/// Path the mock server publishes its listing under.
pub const LISTING_PATH: &str = "/geo-ip/history/";

/// Three ranges: US 1.2.3.0/24, Australia 0.0.0.0/24 and Australia 224.0.0.0/24.
#[allow(dead_code)] // Used by other test files
pub const SNAPSHOT_CSV: &str = "# IpToCountry test snapshot\n\
# ip_from,ip_to,registry,assigned,ctry,cntry,country\n\
\"16909056\",\"16909311\",\"arin\",\"1010000000\",\"US\",\"USA\",\"United States\"\n\
\"0\",\"255\",\"apnic\",\"410227200\",\"AU\",\"AUS\",\"Australia\"\n\
\"3758096384\",\"3758096639\",\"apnic\",\"1286496000\",\"AU\",\"AUS\",\"Australia\"\n";

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("Failed to write gzip data");
    encoder.finish().expect("Failed to finish gzip stream")
}

/// An Apache-style index page linking one snapshot per epoch.
pub fn listing_html(epochs: &[i64]) -> String {
    let items: String = epochs
        .iter()
        .map(|e| format!("<li><a href=\"IpToCountry.{e}.csv.gz\">IpToCountry.{e}.csv.gz</a></li>\n"))
        .collect();
    format!(
        "<html><head><title>Index of /geo-ip/history</title></head><body><ul>\n\
<li><a href=\"../\">Parent Directory</a></li>\n{items}</ul></body></html>"
    )
}

/// Registers a listing with a single snapshot and the snapshot itself.
///
/// The listing may be requested any number of times; the snapshot download
/// is expected exactly `downloads` times.
#[allow(dead_code)] // Used by other test files
pub fn publish_snapshot(server: &Server, epoch: i64, csv: &str, downloads: usize) {
    server.expect(
        Expectation::matching(request::method_path("GET", LISTING_PATH))
            .times(..)
            .respond_with(status_code(200).body(listing_html(&[epoch]))),
    );
    // Matchers must be 'static; a few leaked bytes per test are fine
    let snapshot_path: &'static str =
        Box::leak(format!("{LISTING_PATH}IpToCountry.{epoch}.csv.gz").into_boxed_str());
    server.expect(
        Expectation::matching(request::method_path("GET", snapshot_path))
        .times(downloads)
        .respond_with(status_code(200).body(gzip(csv.as_bytes()))),
    );
}

/// A temp directory holding the database; dropping it removes the file.
pub struct TestDb {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("ip_to_country.db");
        Self { _dir: dir, path }
    }
}

/// Configuration pointing at a mock server and a temp database.
pub fn test_config(server: &Server, db_path: &Path) -> Config {
    Config {
        db_path: db_path.to_path_buf(),
        source_url: server.url(LISTING_PATH).to_string(),
        timeout_seconds: 5,
        ..Default::default()
    }
}
