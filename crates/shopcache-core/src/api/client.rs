//! API client for the remote products catalog.
//!
//! One read-only call: `GET <endpoint>` returning a JSON array of products.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use tracing::{debug, warn};

use crate::models::CatalogSnapshot;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Products endpoint used when nothing else is configured
pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";

/// HTTP request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Anything that can produce a catalog snapshot.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> Result<CatalogSnapshot, ApiError>;
}

/// Catalog API client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: String,
    initial_backoff: Duration,
}

impl ApiClient {
    /// Create a client for the default endpoint
    pub fn new() -> Result<Self, ApiError> {
        Self::with_endpoint(DEFAULT_CATALOG_URL, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        })
    }

    /// Override the first rate-limit backoff delay. Each retry doubles it.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Check the status, returning the response only for a plain 200.
    /// Returns Ok(None) for rate limit (should retry).
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, ApiError> {
        let status = response.status();
        if status == StatusCode::OK {
            return Ok(Some(response));
        }

        let body = response.text().await.unwrap_or_default();
        match ApiError::from_status(status, &body) {
            ApiError::RateLimited => Ok(None),
            err => Err(err),
        }
    }

    /// Fetch the whole catalog, in server order, along with the array as sent.
    pub async fn fetch_products(&self) -> Result<CatalogSnapshot, ApiError> {
        let mut retries = 0;
        let mut backoff = self.initial_backoff;

        loop {
            let response = self
                .client
                .get(&self.endpoint)
                .header(header::ACCEPT, "application/json")
                .send()
                .await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    let body = response.text().await?;
                    let snapshot = CatalogSnapshot::from_json(&body).map_err(|e| {
                        ApiError::InvalidResponse(format!(
                            "Failed to parse product list from {}: {}",
                            self.endpoint, e
                        ))
                    })?;
                    debug!(count = snapshot.len(), endpoint = %self.endpoint, "Catalog fetched");
                    return Ok(snapshot);
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(
                        endpoint = %self.endpoint,
                        retry = retries,
                        backoff_ms = backoff.as_millis() as u64,
                        "Rate limited, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }
        }
    }
}

#[async_trait]
impl CatalogSource for ApiClient {
    async fn fetch_catalog(&self) -> Result<CatalogSnapshot, ApiError> {
        self.fetch_products().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let client = ApiClient::new().unwrap();
        assert_eq!(client.endpoint(), DEFAULT_CATALOG_URL);
    }

    #[test]
    fn test_with_endpoint() {
        let client =
            ApiClient::with_endpoint("http://127.0.0.1:9/products", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:9/products");
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Port 9 (discard) is not listening on test machines.
        let client =
            ApiClient::with_endpoint("http://127.0.0.1:9/products", Duration::from_secs(2)).unwrap();
        let err = client.fetch_products().await.unwrap_err();
        assert!(matches!(err, ApiError::NetworkError(_)), "got {:?}", err);
        assert!(!err.is_server_error());
    }
}
