//! `Fetcher` backed by the publisher's HTTP directory listing.

use std::sync::Arc;

use log::{debug, info};
use tokio_retry::RetryIf;
use url::Url;

use super::download::{download_with_size_limit, gunzip_with_limit};
use super::listing::{find_dataset_links, select_latest, DatasetLink};
use super::{DatasetUpdate, Fetcher};
use crate::config::Config;
use crate::error_handling::{get_retry_strategy, is_retriable_fetch_error, FetchError};

/// Scrapes the listing page, then downloads and decompresses the newest snapshot.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Arc<reqwest::Client>,
    listing_url: Url,
    max_download_bytes: usize,
    max_payload_bytes: usize,
}

impl HttpFetcher {
    /// Builds a fetcher for `config.source_url`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if the source URL does not parse.
    pub fn new(client: Arc<reqwest::Client>, config: &Config) -> Result<Self, FetchError> {
        Ok(Self {
            client,
            listing_url: Url::parse(&config.source_url)?,
            max_download_bytes: config.max_download_bytes,
            max_payload_bytes: config.max_payload_bytes,
        })
    }

    /// All snapshot links currently published, in page order.
    pub async fn list_snapshots(&self) -> Result<Vec<DatasetLink>, FetchError> {
        let body = self.download(self.listing_url.as_str()).await?;
        let html = String::from_utf8_lossy(&body);
        let links = find_dataset_links(&html);
        debug!(
            "Found {} dataset links at {}",
            links.len(),
            self.listing_url
        );
        Ok(links)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        RetryIf::spawn(
            get_retry_strategy(),
            || download_with_size_limit(&self.client, url, self.max_download_bytes),
            is_retriable_fetch_error,
        )
        .await
    }
}

impl Fetcher for HttpFetcher {
    async fn latest(&self, lower_bound: i64) -> Result<Option<DatasetUpdate>, FetchError> {
        let links = self.list_snapshots().await?;
        let Some(link) = select_latest(&links, lower_bound) else {
            debug!("No dataset newer than epoch {lower_bound} at {}", self.listing_url);
            return Ok(None);
        };

        let url = self.listing_url.join(&link.href)?;
        info!("Downloading dataset {} (epoch {})", url, link.epoch);

        let compressed = self.download(url.as_str()).await?;
        let payload = gunzip_with_limit(&compressed, self.max_payload_bytes)?;

        Ok(Some(DatasetUpdate {
            epoch: link.epoch,
            file_name: link.file_name.clone(),
            payload,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use httptest::{matchers::*, responders::*, Expectation, Server};
    use std::io::Write;

    const CSV: &str = "# comment\n\"16909056\",\"16909311\",\"arin\",\"0\",\"US\",\"USA\",\"United States\"\n";

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).expect("Should write gzip data");
        encoder.finish().expect("Should finish gzip stream")
    }

    fn listing(epochs: &[i64]) -> String {
        let items: String = epochs
            .iter()
            .map(|e| format!("<li><a href=\"IpToCountry.{e}.csv.gz\">IpToCountry.{e}.csv.gz</a></li>"))
            .collect();
        format!("<html><body><ul>{items}</ul></body></html>")
    }

    fn fetcher_for(server: &Server) -> HttpFetcher {
        let config = Config {
            source_url: server.url("/geo-ip/history/").to_string(),
            ..Default::default()
        };
        HttpFetcher::new(Arc::new(reqwest::Client::new()), &config).expect("Valid URL")
    }

    #[test]
    fn test_new_rejects_invalid_source_url() {
        let config = Config {
            source_url: "not a url".to_string(),
            ..Default::default()
        };
        let result = HttpFetcher::new(Arc::new(reqwest::Client::new()), &config);
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_latest_downloads_newest_snapshot() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/geo-ip/history/"))
                .respond_with(status_code(200).body(listing(&[100, 300, 200]))),
        );
        server.expect(
            Expectation::matching(request::method_path(
                "GET",
                "/geo-ip/history/IpToCountry.300.csv.gz",
            ))
            .respond_with(status_code(200).body(gzip(CSV.as_bytes()))),
        );

        let update = fetcher_for(&server)
            .latest(150)
            .await
            .expect("Fetch should succeed")
            .expect("An update should be available");
        assert_eq!(update.epoch, 300);
        assert_eq!(update.file_name, "IpToCountry.300.csv.gz");
        assert_eq!(update.payload, CSV.as_bytes());
    }

    #[tokio::test]
    async fn test_latest_no_update_skips_download() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/geo-ip/history/"))
                .respond_with(status_code(200).body(listing(&[100, 200]))),
        );

        let update = fetcher_for(&server)
            .latest(200)
            .await
            .expect("Fetch should succeed");
        assert!(update.is_none());
    }

    #[tokio::test]
    async fn test_latest_listing_error_status() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/geo-ip/history/"))
                .respond_with(status_code(403)),
        );

        let result = fetcher_for(&server).latest(-1).await;
        assert!(matches!(result, Err(FetchError::Status { .. })));
    }

    #[tokio::test]
    async fn test_latest_retries_transient_listing_failure() {
        let server = Server::run();
        let responses: Vec<Box<dyn Responder>> = vec![
            Box::new(status_code(503)),
            Box::new(status_code(200).body(listing(&[100]))),
        ];
        server.expect(
            Expectation::matching(request::method_path("GET", "/geo-ip/history/"))
                .times(2)
                .respond_with(cycle(responses)),
        );

        let update = fetcher_for(&server)
            .latest(100)
            .await
            .expect("Second attempt should succeed");
        assert!(update.is_none());
    }

    #[tokio::test]
    async fn test_latest_corrupt_archive() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/geo-ip/history/"))
                .respond_with(status_code(200).body(listing(&[7]))),
        );
        server.expect(
            Expectation::matching(request::method_path(
                "GET",
                "/geo-ip/history/IpToCountry.7.csv.gz",
            ))
            .respond_with(status_code(200).body("plain text, not gzip")),
        );

        let result = fetcher_for(&server).latest(-1).await;
        assert!(matches!(result, Err(FetchError::Decompress(_))));
    }
}
