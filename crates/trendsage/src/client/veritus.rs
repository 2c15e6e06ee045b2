//! Veritus scholarly-search client.
//!
//! Single-attempt GET against the paper search endpoint with bearer auth, a
//! fixed timeout, and an in-process response cache keyed by request.

use moka::future::Cache;
use reqwest::Client;

use super::{DocumentProvider, check_status};
use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::{SearchResult, VeritusResponse};

/// Live Veritus document provider.
#[derive(Clone)]
pub struct VeritusClient {
    /// HTTP client with auth headers.
    client: Client,

    /// Raw response cache.
    cache: Cache<String, serde_json::Value>,

    /// API base URL.
    api_url: String,

    /// Request timeout (reported on timeout errors).
    timeout: std::time::Duration,
}

impl VeritusClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the key is missing, is not a valid header value, or the
    /// HTTP client cannot be built.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let key = config
            .veritus_api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Veritus API key is not configured"))?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers.insert(reqwest::header::AUTHORIZATION, format!("Bearer {key}").parse()?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.document_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(config.cache_max_size)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            client,
            cache,
            api_url: config.veritus_api_url.trim_end_matches('/').to_string(),
            timeout: config.document_timeout,
        })
    }

    /// Fetch the raw search payload, using the cache when possible.
    async fn fetch(&self, query: &str) -> ClientResult<serde_json::Value> {
        let url = format!("{}{}", self.api_url, api::PAPER_SEARCH_PATH);
        let params = [("title", query)];

        let cache_key = cache_key(&url, &params);
        if let Some(cached) = self.cache.get(&cache_key).await {
            tracing::debug!(query, "Veritus cache hit");
            return Ok(cached);
        }

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ClientError::transport(e, self.timeout))?;

        let response = check_status(response).await?;
        let value: serde_json::Value =
            response.json().await.map_err(|e| ClientError::transport(e, self.timeout))?;

        self.cache.insert(cache_key, value.clone()).await;
        Ok(value)
    }
}

#[async_trait::async_trait]
impl DocumentProvider for VeritusClient {
    fn name(&self) -> &str {
        "veritus"
    }

    async fn search(&self, query: &str, limit: usize) -> ClientResult<SearchResult> {
        let value = match self.fetch(query).await {
            Ok(value) => value,
            Err(err) => {
                tracing::error!(query, error = %err, "Veritus search failed");
                return Err(err);
            }
        };

        let raw: VeritusResponse = serde_json::from_value(value)?;
        let result = raw.normalize(limit);

        tracing::info!(
            query,
            returned = result.documents.len(),
            total = result.total_results,
            "Veritus search completed"
        );
        Ok(result)
    }
}

/// MD5 of the request, used as the cache key.
fn cache_key(url: &str, params: &[(&str, &str)]) -> String {
    use md5::{Digest, Md5};

    let mut hasher = Md5::new();
    hasher.update(b"GET|");
    hasher.update(url.as_bytes());
    hasher.update(b"|");

    for (k, v) in params {
        hasher.update(k.as_bytes());
        hasher.update(b"=");
        hasher.update(v.as_bytes());
        hasher.update(b"&");
    }

    format!("{:x}", hasher.finalize())
}

impl std::fmt::Debug for VeritusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VeritusClient").field("api_url", &self.api_url).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_depends_on_query() {
        let url = "https://example.test/v1/papers/search";
        let a = cache_key(url, &[("title", "ai in healthcare")]);
        let b = cache_key(url, &[("title", "ai in healthcare")]);
        let c = cache_key(url, &[("title", "web3 funding")]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_new_requires_key() {
        assert!(VeritusClient::new(&Config::default()).is_err());
        assert!(VeritusClient::new(&Config::for_testing("http://localhost:1")).is_ok());
    }
}
