use std::time::Duration;

use url::Url;

/// Default location of the episode API and the static feed
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Endpoints and timings used by the viewer and the admin panel
#[derive(Debug, Clone)]
pub struct Config {
    /// Site root that the relative paths below are resolved against
    pub base_url: Url,
    /// Path of the episode collection (GET, POST, and DELETE with an id suffix)
    pub episodes_path: String,
    /// Path of the static RSS document
    pub feed_path: String,
    /// How long a notification stays visible
    pub notification_ttl: Duration,
    /// Upper bound on reading an audio file's metadata
    pub probe_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("valid default base URL"),
            episodes_path: "/api/episodes".to_string(),
            feed_path: "rss.xml".to_string(),
            notification_ttl: Duration::from_secs(3),
            probe_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            ..Default::default()
        }
    }

    pub fn episodes_url(&self) -> Result<Url, url::ParseError> {
        self.base_url.join(&self.episodes_path)
    }

    pub fn episode_url(&self, id: u64) -> Result<Url, url::ParseError> {
        let collection = self.episodes_url()?;
        Url::parse(&format!(
            "{}/{}",
            collection.as_str().trim_end_matches('/'),
            id
        ))
    }

    pub fn feed_url(&self) -> Result<Url, url::ParseError> {
        self.base_url.join(&self.feed_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoints() {
        let config = Config::default();
        assert_eq!(
            config.episodes_url().unwrap().as_str(),
            "http://localhost:8080/api/episodes"
        );
        assert_eq!(
            config.feed_url().unwrap().as_str(),
            "http://localhost:8080/rss.xml"
        );
        assert_eq!(config.notification_ttl, Duration::from_secs(3));
    }

    #[test]
    fn episode_url_appends_id() {
        let config = Config::with_base_url(Url::parse("https://pod.example.com/").unwrap());
        assert_eq!(
            config.episode_url(7).unwrap().as_str(),
            "https://pod.example.com/api/episodes/7"
        );
    }

    #[test]
    fn feed_path_resolves_relative_to_base_directory() {
        let config = Config::with_base_url(Url::parse("https://pod.example.com/site/").unwrap());
        assert_eq!(
            config.feed_url().unwrap().as_str(),
            "https://pod.example.com/site/rss.xml"
        );
    }
}
