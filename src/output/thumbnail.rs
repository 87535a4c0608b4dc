//! Thumbnail downloads.
//!
//! Thumbnail hosts named by a feed are trusted as-is: the HTTP fetcher does
//! not validate TLS certificates.  Every failure here is reported to the
//! caller, which logs it and carries on without the image.

use std::time::Duration;

use thiserror::Error;

use crate::extract::classify::strip_query;

/// Extensions kept for downloaded thumbnails; anything else becomes `jpg`.
pub const THUMBNAIL_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

const DEFAULT_EXTENSION: &str = "jpg";

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("empty response body")]
    Empty,
}

/// Anything that can turn a thumbnail URL into image bytes.
pub trait ThumbnailFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ThumbnailError>;
}

/// Blocking HTTP fetcher with a fixed connect/read timeout.
pub struct HttpThumbnailFetcher {
    client: reqwest::blocking::Client,
}

impl HttpThumbnailFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ThumbnailError> {
        let client = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(true)
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(concat!("rss2strm/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl ThumbnailFetcher for HttpThumbnailFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ThumbnailError> {
        let bytes = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .bytes()?;
        if bytes.is_empty() {
            return Err(ThumbnailError::Empty);
        }
        Ok(bytes.to_vec())
    }
}

/// Local file extension (without the dot) for a thumbnail URL.
///
/// The full URL is checked first, then the part before the query string.
pub fn extension_for(url: &str) -> &'static str {
    let matching = |candidate: &str| {
        let lower = candidate.to_lowercase();
        THUMBNAIL_EXTENSIONS
            .iter()
            .copied()
            .find(|ext| lower.ends_with(&format!(".{ext}")))
    };
    matching(url)
        .or_else(|| matching(strip_query(url)))
        .unwrap_or(DEFAULT_EXTENSION)
}
