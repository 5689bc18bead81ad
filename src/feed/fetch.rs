// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use url::Url;

use crate::error::{FetchError, LoadError};
use crate::http::HttpClient;

use super::parse::{Feed, parse_feed};

/// Where a feed document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedLocation {
    Remote(Url),
    File(PathBuf),
}

impl FeedLocation {
    /// Interpret a command-line style source: http(s) URLs are remote,
    /// anything else is a local path
    pub fn parse(source: &str) -> Result<Self, FetchError> {
        if is_url(source) {
            Ok(FeedLocation::Remote(Url::parse(source)?))
        } else {
            Ok(FeedLocation::File(PathBuf::from(source)))
        }
    }
}

impl std::fmt::Display for FeedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedLocation::Remote(url) => write!(f, "{url}"),
            FeedLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch a document from a URL, failing on any non-success status
pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Bytes, FetchError> {
    log::debug!("GET {url}");

    let response = client.get(url).await.map_err(|e| FetchError::Request {
        url: url.to_string(),
        source: e,
    })?;

    if !response.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status,
        });
    }

    Ok(response.body)
}

/// Read raw feed bytes from a local file (without parsing)
pub fn read_feed_file(path: &Path) -> Result<Vec<u8>, FetchError> {
    std::fs::read(path).map_err(|e| FetchError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Fetch and parse a podcast feed from wherever it lives
pub async fn fetch_feed<C: HttpClient + ?Sized>(
    client: &C,
    location: &FeedLocation,
) -> Result<Feed, LoadError> {
    let feed = match location {
        FeedLocation::Remote(url) => {
            let bytes = fetch_bytes(client, url.as_str()).await?;
            parse_feed(&bytes)?
        }
        FeedLocation::File(path) => {
            let bytes = read_feed_file(path)?;
            parse_feed(&bytes)?
        }
    };
    Ok(feed)
}

/// Determine if a string is a URL or a file path
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
