// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::episode::EpisodeRecord;
use crate::error::{LoadError, ParseError};
use crate::feed::{Feed, FeedLocation, fetch_bytes, fetch_feed};
use crate::http::HttpClient;

/// Somewhere episode records can be loaded from.
///
/// Implementations never cache: each call fetches and decodes afresh.
#[async_trait]
pub trait EpisodeSource: Send + Sync {
    /// Load the complete episode list
    async fn load(&self) -> Result<Vec<EpisodeRecord>, LoadError>;

    /// Human-readable origin, for logs and messages
    fn describe(&self) -> String;
}

/// A shared reference to an episode source
pub type SharedEpisodeSource = Arc<dyn EpisodeSource>;

/// Episodes served as a JSON array by the site's API
pub struct JsonApiSource<C> {
    client: C,
    endpoint: Url,
}

impl<C: HttpClient> JsonApiSource<C> {
    pub fn new(client: C, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl<C: HttpClient> EpisodeSource for JsonApiSource<C> {
    async fn load(&self) -> Result<Vec<EpisodeRecord>, LoadError> {
        let body = fetch_bytes(&self.client, self.endpoint.as_str()).await?;
        let episodes: Vec<EpisodeRecord> =
            serde_json::from_slice(&body).map_err(ParseError::from)?;

        log::debug!("Loaded {} episodes from {}", episodes.len(), self.endpoint);
        Ok(episodes)
    }

    fn describe(&self) -> String {
        self.endpoint.to_string()
    }
}

/// Episodes read from the site's static RSS document
pub struct RssFeedSource<C> {
    client: C,
    location: FeedLocation,
}

impl<C: HttpClient> RssFeedSource<C> {
    pub fn new(client: C, location: FeedLocation) -> Self {
        Self { client, location }
    }

    /// Load the whole feed, channel information included
    pub async fn load_feed(&self) -> Result<Feed, LoadError> {
        fetch_feed(&self.client, &self.location).await
    }
}

#[async_trait]
impl<C: HttpClient> EpisodeSource for RssFeedSource<C> {
    async fn load(&self) -> Result<Vec<EpisodeRecord>, LoadError> {
        Ok(self.load_feed().await?.episodes)
    }

    fn describe(&self) -> String {
        self.location.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use bytes::Bytes;

    use crate::error::FetchError;
    use crate::http::{HttpResponse, MultipartBody};

    struct MockHttpClient {
        status: u16,
        body: String,
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn get(&self, _url: &str) -> Result<HttpResponse, reqwest::Error> {
            Ok(HttpResponse {
                status: self.status,
                body: Bytes::from(self.body.clone()),
            })
        }

        async fn post_multipart(&self, _url: &str, _body: MultipartBody) -> Result<u16, reqwest::Error> {
            Ok(405)
        }

        async fn delete(&self, _url: &str) -> Result<u16, reqwest::Error> {
            Ok(405)
        }
    }

    fn endpoint() -> Url {
        Url::parse("https://example.com/api/episodes").unwrap()
    }

    #[tokio::test]
    async fn json_source_passes_records_through() {
        let client = MockHttpClient {
            status: 200,
            body: r#"[{"title": "B", "season": 2}, {"title": "A", "season": 1}]"#.to_string(),
        };
        let source = JsonApiSource::new(client, endpoint());

        let episodes = source.load().await.unwrap();
        let titles: Vec<_> = episodes.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
        assert_eq!(source.describe(), "https://example.com/api/episodes");
    }

    #[tokio::test]
    async fn json_source_fails_on_server_error() {
        let client = MockHttpClient {
            status: 500,
            body: "boom".to_string(),
        };
        let source = JsonApiSource::new(client, endpoint());

        match source.load().await {
            Err(LoadError::Fetch(FetchError::Status { status, .. })) => assert_eq!(status, 500),
            other => panic!("Expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn json_source_fails_on_malformed_body() {
        let client = MockHttpClient {
            status: 200,
            body: "{not json".to_string(),
        };
        let source = JsonApiSource::new(client, endpoint());

        assert!(matches!(
            source.load().await,
            Err(LoadError::Parse(ParseError::Json(_)))
        ));
    }

    #[tokio::test]
    async fn rss_source_loads_items() {
        let client = MockHttpClient {
            status: 200,
            body: r#"<rss version="2.0"><channel><title>T</title><link>https://e.com</link>
                <description>D</description>
                <item><title>One</title><enclosure url="https://e.com/1.mp3" length="0" type="audio/mpeg"/></item>
                <item><title>Two</title></item>
                </channel></rss>"#
                .to_string(),
        };
        let location = FeedLocation::parse("https://e.com/rss.xml").unwrap();
        let source = RssFeedSource::new(client, location);

        let episodes = source.load().await.unwrap();
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].audio_url, "https://e.com/1.mp3");

        let feed = source.load_feed().await.unwrap();
        assert_eq!(feed.info.title, "T");
    }
}
