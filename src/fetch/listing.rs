//! Directory listing scraping.
//!
//! The publisher exposes snapshots as links named `IpToCountry.<epoch>.csv.gz`;
//! the epoch is the only version signal available.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::config::DATASET_FILE_PATTERN;

const ANCHOR_SELECTOR_STR: &str = "a[href]";

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(ANCHOR_SELECTOR_STR).expect("Failed to parse anchor selector - this is a bug")
});

static DATASET_FILE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DATASET_FILE_PATTERN).expect("Failed to compile dataset file pattern - this is a bug")
});

/// A snapshot link found on the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLink {
    pub epoch: i64,
    /// The `href` exactly as it appears in the page (may be relative)
    pub href: String,
    pub file_name: String,
}

/// Extracts every snapshot link from a listing page, in document order.
///
/// Only the last path segment of each `href` is matched, so absolute and
/// relative links are both accepted. Epochs that do not fit in `i64` are skipped.
pub fn find_dataset_links(html: &str) -> Vec<DatasetLink> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| {
            let path = href.split(['?', '#']).next().unwrap_or(href);
            let file_name = path.rsplit('/').next().unwrap_or(path);
            let epoch = DATASET_FILE_REGEX
                .captures(file_name)?
                .get(1)?
                .as_str()
                .parse::<i64>()
                .ok()?;
            Some(DatasetLink {
                epoch,
                href: href.to_string(),
                file_name: file_name.to_string(),
            })
        })
        .collect()
}

/// Picks the newest snapshot strictly newer than `lower_bound`.
pub fn select_latest(links: &[DatasetLink], lower_bound: i64) -> Option<&DatasetLink> {
    links
        .iter()
        .filter(|link| link.epoch > lower_bound)
        .max_by_key(|link| link.epoch)
}
