use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::cache::TtlCache;
use crate::error::WeatherError;

const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Whether a lookup was served from the TTL cache or went upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheStatus {
    Hit,
    Miss,
}

/// Raw provider payload plus the cache flag of the lookup that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    pub data: Value,
    pub cache: CacheStatus,
}

/// Cache-aside client for the OpenWeatherMap city endpoints.
///
/// Each fetch performs at most one outbound call; a successful miss writes
/// exactly one cache entry. Failures are never cached, so the next request
/// retries upstream unconditionally.
pub struct OpenWeatherClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    cache: Arc<TtlCache>,
}

impl OpenWeatherClient {
    pub fn new(api_key: Option<String>, cache: Arc<TtlCache>) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, cache, OPENWEATHER_BASE_URL.to_string())
    }

    pub fn with_base_url(
        api_key: Option<String>,
        cache: Arc<TtlCache>,
        base_url: String,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url,
            cache,
        })
    }

    /// Current conditions for one city, cache-aside under `raw:{id}`.
    pub async fn fetch_current(&self, city_id: u32) -> Result<FetchResult, WeatherError> {
        self.cached_fetch("weather", "raw", city_id).await
    }

    /// Short-range forecast for one city, cache-aside under `forecast:{id}`.
    pub async fn fetch_forecast(&self, city_id: u32) -> Result<FetchResult, WeatherError> {
        self.cached_fetch("forecast", "forecast", city_id).await
    }

    async fn cached_fetch(
        &self,
        endpoint: &str,
        key_prefix: &str,
        city_id: u32,
    ) -> Result<FetchResult, WeatherError> {
        // Keys can be injected per deployment, so check on every call,
        // before the cache lookup and any network work.
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;

        let cache_key = format!("{}:{}", key_prefix, city_id);

        if let Some(data) = self.cache.get(&cache_key).await {
            info!("📦 {} served from cache", cache_key);
            return Ok(FetchResult {
                data,
                cache: CacheStatus::Hit,
            });
        }

        let url = format!("{}/{}", self.base_url, endpoint);
        info!("🌤️  Fetching OpenWeather {} for city {}", endpoint, city_id);

        let id = city_id.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("id", id.as_str()),
                ("appid", api_key),
                ("units", "metric"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WeatherError::UpstreamStatus(response.status()));
        }

        let data: Value = response.json().await?;

        self.cache.set(cache_key.clone(), data.clone()).await;
        info!("💾 Cached {}", cache_key);

        Ok(FetchResult {
            data,
            cache: CacheStatus::Miss,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server_url: &str, api_key: Option<&str>) -> OpenWeatherClient {
        let cache = Arc::new(TtlCache::new(Duration::from_secs(300)));
        OpenWeatherClient::with_base_url(
            api_key.map(String::from),
            cache,
            server_url.to_string(),
        )
        .expect("client should build")
    }

    #[tokio::test]
    async fn second_fetch_is_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("id", "1850147"))
            .and(query_param("units", "metric"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "main": { "temp": 20.0 } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), Some("test-key"));

        let first = client.fetch_current(1850147).await.unwrap();
        assert_eq!(first.cache, CacheStatus::Miss);

        let second = client.fetch_current(1850147).await.unwrap();
        assert_eq!(second.cache, CacheStatus::Hit);
        assert_eq!(second.data, first.data);
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), None);

        let err = client.fetch_current(1850147).await.unwrap_err();
        assert!(matches!(err, WeatherError::MissingApiKey));
    }

    #[tokio::test]
    async fn upstream_failure_is_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), Some("test-key"));

        let err = client.fetch_current(1).await.unwrap_err();
        assert!(matches!(err, WeatherError::UpstreamStatus(_)));

        // No negative caching: the retry goes upstream again.
        assert!(client.fetch_current(1).await.is_err());
    }

    #[tokio::test]
    async fn current_and_forecast_use_separate_keys() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "kind": "current" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "kind": "forecast" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), Some("test-key"));

        assert_eq!(
            client.fetch_current(7).await.unwrap().cache,
            CacheStatus::Miss
        );
        assert_eq!(
            client.fetch_forecast(7).await.unwrap().cache,
            CacheStatus::Miss
        );

        // Both populated independently; both now hit.
        assert_eq!(
            client.fetch_current(7).await.unwrap().cache,
            CacheStatus::Hit
        );
        assert_eq!(
            client.fetch_forecast(7).await.unwrap().cache,
            CacheStatus::Hit
        );
    }
}
