//! Kick API client backed by the cache gateway.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

use kick_cache::{CacheConfig, Gateway};
use kick_core::constants::{DEFAULT_BASE_URL, DEFAULT_CACHE_TTL_MS};
use kick_core::error::{KickError, Result};
use kick_core::traits::Fetcher;

use crate::endpoints::{self, ClipQuery, LivestreamQuery, SubcategoryQuery};
use crate::fetcher::{FetcherConfig, HttpFetcher};

/// Client configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Site base URL; API paths are appended to it
    pub base_url: String,
    /// Response cache settings
    pub cache: CacheConfig,
    /// HTTP fetcher settings
    pub fetcher: FetcherConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache: CacheConfig::with_ttl_ms(DEFAULT_CACHE_TTL_MS as f64),
            fetcher: FetcherConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Points the client at a different base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the cache TTL (and enables caching).
    pub fn with_cache_ttl_ms(mut self, ttl_ms: f64) -> Self {
        self.cache = CacheConfig::with_ttl_ms(ttl_ms);
        self
    }

    /// Disables caching.
    pub fn no_cache(mut self) -> Self {
        self.cache = CacheConfig::disabled();
        self
    }
}

/// Kick API client.
///
/// Every endpoint method builds its URL and hands it to the gateway, so
/// responses are cached per URL for the configured TTL and concurrent
/// identical requests are sent once.
///
/// Methods return `Ok(None)` when the API answers with `null`.
#[derive(Clone)]
pub struct KickClient {
    base_url: Url,
    gateway: Gateway<Value>,
}

impl KickClient {
    /// Creates a client that fetches over HTTP.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let fetcher = HttpFetcher::with_config(config.fetcher.clone())?;
        Self::with_fetcher(config, fetcher)
    }

    /// Creates a client around a custom fetcher.
    ///
    /// `config.fetcher` is ignored.
    pub fn with_fetcher(config: ClientConfig, fetcher: impl Fetcher<Value> + 'static) -> Result<Self> {
        let base_url = endpoints::parse_base(&config.base_url)
            .map_err(|e| KickError::InvalidConfig(e.to_string()))?;
        let gateway = Gateway::new(config.cache, fetcher)?;

        info!(base_url = %base_url, cache = gateway.is_enabled(), "Kick client ready");
        Ok(Self { base_url, gateway })
    }

    /// Returns the underlying gateway (stats, invalidation, reconfiguration).
    pub fn gateway(&self) -> &Gateway<Value> {
        &self.gateway
    }

    /// Returns the base URL requests are built from.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns data on a channel.
    #[instrument(skip(self))]
    pub async fn channel(&self, slug: &str) -> Result<Option<Value>> {
        self.get(endpoints::channel(&self.base_url, slug)?).await
    }

    /// Returns all main categories.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Option<Value>> {
        self.get(endpoints::categories(&self.base_url)?).await
    }

    /// Returns a page of subcategories.
    #[instrument(skip(self))]
    pub async fn subcategories(&self, query: &SubcategoryQuery) -> Result<Option<Value>> {
        self.get(endpoints::subcategories(&self.base_url, query)?).await
    }

    /// Returns channels and categories matching `searched_word`.
    #[instrument(skip(self))]
    pub async fn search(&self, searched_word: &str) -> Result<Option<Value>> {
        self.get(endpoints::search(&self.base_url, searched_word)?).await
    }

    /// Returns live channels matching the query.
    #[instrument(skip(self))]
    pub async fn livestreams(&self, query: &LivestreamQuery) -> Result<Option<Value>> {
        self.get(endpoints::livestreams(&self.base_url, query)?).await
    }

    /// Returns clips matching the query.
    #[instrument(skip(self))]
    pub async fn clips(&self, query: &ClipQuery) -> Result<Option<Value>> {
        self.get(endpoints::clips(&self.base_url, query)?).await
    }

    async fn get(&self, url: String) -> Result<Option<Value>> {
        debug!(url = %url, "Requesting");
        self.gateway.get(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;

    /// Records requested URLs and echoes them back.
    #[derive(Default)]
    struct Recorder {
        urls: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn urls(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher<Value> for Recorder {
        async fn fetch(&self, url: &str) -> Result<Option<Value>> {
            self.urls.lock().unwrap().push(url.to_string());
            Ok(Some(json!({ "url": url })))
        }
    }

    fn client(config: ClientConfig) -> (KickClient, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let client = KickClient::with_fetcher(config, Arc::clone(&recorder)).unwrap();
        (client, recorder)
    }

    #[test]
    fn test_default_config_caches_for_a_minute() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://kick.com");
        assert_eq!(config.cache, CacheConfig::with_ttl_ms(60_000.0));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = ClientConfig::default().with_base_url("kick.com");
        let err = KickClient::with_fetcher(config, Recorder::default()).err().unwrap();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_base_url_is_parsed_once() {
        let (client, _) = client(ClientConfig::default().with_base_url("http://127.0.0.1:8080/proxy"));
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:8080/proxy");
        assert_eq!(client.base_url().scheme(), "http");
    }

    #[test]
    fn test_invalid_cache_config_rejected() {
        let config = ClientConfig::default().with_cache_ttl_ms(-1.0);
        let err = KickClient::with_fetcher(config, Recorder::default()).err().unwrap();
        assert!(err.is_config_error());
    }

    #[tokio::test]
    async fn test_endpoints_hit_expected_urls() {
        let (client, recorder) = client(ClientConfig::default().no_cache());

        client.channel("adinross").await.unwrap();
        client.categories().await.unwrap();
        client.subcategories(&SubcategoryQuery::default()).await.unwrap();
        client.search("xqc").await.unwrap();
        client.livestreams(&LivestreamQuery::default()).await.unwrap();
        client.clips(&ClipQuery::default()).await.unwrap();

        assert_eq!(
            recorder.urls(),
            vec![
                "https://kick.com/api/v1/channels/adinross",
                "https://kick.com/api/v1/categories",
                "https://kick.com/api/v1/subcategories?page=1&limit=25",
                "https://kick.com/api/search?searched_word=xqc",
                "https://kick.com/stream/livestreams/en?page=1&limit=25&subcategory=&category=&sort=desc",
                "https://kick.com/api/v2/clips?cursor=0&sort=view&time=all",
            ]
        );
    }

    #[tokio::test]
    async fn test_repeated_lookup_served_from_cache() {
        let (client, recorder) = client(ClientConfig::default());

        let first = client.channel("adinross").await.unwrap();
        let second = client.channel("adinross").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(recorder.urls().len(), 1);

        // Different query parameters are different cache keys.
        client.subcategories(&SubcategoryQuery { page: 1, limit: 25 }).await.unwrap();
        client.subcategories(&SubcategoryQuery { page: 2, limit: 25 }).await.unwrap();
        assert_eq!(recorder.urls().len(), 3);
        assert_eq!(client.gateway().stats().valid_entries, 3);
    }

    #[tokio::test]
    async fn test_empty_slug_fails_before_fetch() {
        let (client, recorder) = client(ClientConfig::default());
        assert!(client.channel("").await.is_err());
        assert!(recorder.urls().is_empty());
    }
}
