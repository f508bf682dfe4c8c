use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use std::time::Duration;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::Retry;
use tracing::debug;

use crate::config::FetcherConfig;
use crate::{AppError, Result};

/// Capability for retrieving raw page content for a url.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP fetcher with a browser-like request identity, a bounded per-request
/// timeout, and fixed-delay retry on transient failures.
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetcherConfig,
}

impl HttpFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| AppError::Validation(format!("invalid user agent: {}", e)))?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .map_err(|e| AppError::Validation(format!("invalid accept language: {}", e)))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        Ok(Self { client, config })
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        debug!(url = %url, "fetching page");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let strategy = FixedInterval::from_millis(self.config.retry_delay_ms)
            .take(self.config.retry_attempts as usize);

        Retry::spawn(strategy, || self.fetch_once(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> FetcherConfig {
        FetcherConfig {
            request_timeout: 5,
            retry_attempts: 2,
            retry_delay_ms: 10,
            user_agent: "TestAgent/1.0".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(test_config()).unwrap();
        let body = fetcher.fetch(&format!("{}/item", server.uri())).await.unwrap();

        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_identity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item"))
            .and(header("user-agent", "TestAgent/1.0"))
            .and(header("accept-language", "en-US,en;q=0.9"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(test_config()).unwrap();
        fetcher.fetch(&format!("{}/item", server.uri())).await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_error_status_exhausts_retries() {
        let server = MockServer::start().await;
        // Initial attempt plus two retries
        Mock::given(method("GET"))
            .and(path("/item"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(test_config()).unwrap();
        let result = fetcher.fetch(&format!("{}/item", server.uri())).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_recovers_on_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/item"))
            .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(test_config()).unwrap();
        let body = fetcher.fetch(&format!("{}/item", server.uri())).await.unwrap();

        assert_eq!(body, "recovered");
    }

    #[tokio::test]
    async fn test_invalid_user_agent_rejected() {
        let mut config = test_config();
        config.user_agent = "bad\nagent".to_string();

        assert!(HttpFetcher::new(config).is_err());
    }
}
