use crate::domain::ports::HttpSettings;
use crate::utils::error::{EtlError, Result};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

/// GET-only HTTP client with a per-request timeout and bounded retries.
///
/// Connection failures, timeouts, 429 and 5xx responses are retried with
/// exponential backoff. Anything else, or running out of attempts, is a
/// [`EtlError::RetrievalError`] naming the URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    settings: HttpSettings,
}

impl HttpFetcher {
    pub fn new(settings: HttpSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("movie-names/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EtlError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client, settings })
    }

    pub async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self.send(url, query).await?;
        response
            .text()
            .await
            .map_err(|e| EtlError::retrieval(url, format!("failed to read body: {}", e)))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self.send(url, query).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| EtlError::retrieval(url, format!("unexpected response body: {}", e)))
    }

    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.send(url, &[]).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| EtlError::retrieval(url, format!("failed to read body: {}", e)))?;
        Ok(bytes.to_vec())
    }

    async fn send(&self, url: &str, query: &[(&str, &str)]) -> Result<Response> {
        let mut attempt = 0u32;
        loop {
            tracing::debug!("GET {} (attempt {})", url, attempt + 1);
            let result = self.client.get(url).query(query).send().await;

            let retryable = match &result {
                Ok(response) => is_transient_status(response.status()),
                Err(e) => e.is_timeout() || e.is_connect(),
            };

            if retryable && attempt < self.settings.retry_attempts {
                let delay = self.settings.retry_delay * 2u32.saturating_pow(attempt);
                tracing::warn!(
                    "Transient failure fetching {}, retrying in {:?}",
                    url,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            let response = result.map_err(|e| self.describe(url, e))?;
            tracing::debug!("{} -> {}", url, response.status());

            if !response.status().is_success() {
                return Err(EtlError::retrieval(url, format!("HTTP {}", response.status())));
            }
            return Ok(response);
        }
    }

    fn describe(&self, url: &str, error: reqwest::Error) -> EtlError {
        if error.is_timeout() {
            EtlError::retrieval(
                url,
                format!("request timed out after {:?}", self.settings.timeout),
            )
        } else {
            EtlError::retrieval(url, error)
        }
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}
