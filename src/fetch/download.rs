//! Size-limited downloads and gzip decompression.

use std::io::Read;

use flate2::read::GzDecoder;

use crate::error_handling::FetchError;

/// Downloads `url` into memory, refusing bodies larger than `max_bytes`.
///
/// The limit is checked against `Content-Length` up front and again while
/// streaming, in case the header is missing or wrong.
pub(crate) async fn download_with_size_limit(
    client: &reqwest::Client,
    url: &str,
    max_bytes: usize,
) -> Result<Vec<u8>, FetchError> {
    let mut response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        log::warn!("Download of {url} failed with status {status}");
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    if let Some(content_length) = response.content_length() {
        if content_length > max_bytes as u64 {
            return Err(FetchError::TooLarge {
                what: "Download",
                size: content_length,
                max: max_bytes,
            });
        }
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > max_bytes {
            return Err(FetchError::TooLarge {
                what: "Download",
                size: (body.len() + chunk.len()) as u64,
                max: max_bytes,
            });
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

/// Decompresses a gzip file, refusing output larger than `max_bytes`.
pub(crate) fn gunzip_with_limit(compressed: &[u8], max_bytes: usize) -> Result<Vec<u8>, FetchError> {
    let decoder = GzDecoder::new(compressed);
    let mut payload = Vec::new();
    decoder
        .take(max_bytes as u64 + 1)
        .read_to_end(&mut payload)
        .map_err(FetchError::Decompress)?;

    if payload.len() > max_bytes {
        return Err(FetchError::TooLarge {
            what: "Decompressed dataset",
            size: payload.len() as u64,
            max: max_bytes,
        });
    }

    log::debug!(
        "Decompressed dataset: {} bytes -> {} bytes",
        compressed.len(),
        payload.len()
    );
    Ok(payload)
}
