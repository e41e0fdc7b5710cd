//! NIH RePORTER API client.
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Optional retry middleware for transient failures (off by default)
//! - Typed failures for network, upstream status, and decode errors

use std::time::Duration;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::{ApiResponse, Pagination, ProjectRecord, PublicationRecord, SearchCriteria, SearchResult};
use crate::normalize::Normalizer;
use crate::request::{ProjectRequestBuilder, PublicationRequestBuilder, RequestBuilder, SearchRequest};

/// NIH RePORTER API client.
#[derive(Clone)]
pub struct ReporterClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Endpoint, key and timeout settings.
    config: Config,

    /// Response normalizer.
    normalizer: Normalizer,
}

impl ReporterClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        if let Some(ref key) = config.api_key {
            headers.insert(api::API_KEY_HEADER, key.parse()?);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let mut builder = ClientBuilder::new(client);
        if config.max_retries > 0 {
            let retry_policy = ExponentialBackoff::builder()
                .retry_bounds(Duration::from_millis(500), Duration::from_secs(5))
                .build_with_max_retries(config.max_retries);
            builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
        }

        Ok(Self {
            client: builder.build(),
            normalizer: Normalizer::new(config.fallbacks.clone()),
            config,
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.config.has_api_key()
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Search projects and normalize the page.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn search_projects(
        &self,
        criteria: &SearchCriteria,
        page: Pagination,
        include_abstracts: bool,
    ) -> ClientResult<SearchResult<ProjectRecord>> {
        let request = ProjectRequestBuilder { include_abstracts }.build(criteria, page);
        let response = self.execute(&request).await?;
        Ok(self.normalizer.normalize_projects(&response, page))
    }

    /// Search publication links and normalize the page.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn search_publications(
        &self,
        criteria: &SearchCriteria,
        page: Pagination,
    ) -> ClientResult<SearchResult<PublicationRecord>> {
        let request = PublicationRequestBuilder.build(criteria, page);
        let response = self.execute(&request).await?;
        Ok(self.normalizer.normalize_publications(&response, page))
    }

    /// Send one search request. Single HTTP call; retries only if configured.
    ///
    /// # Errors
    ///
    /// `Transport`/`Timeout` on network failure, `Upstream` on non-2xx,
    /// `Decode` on a body that is not a RePORTER envelope.
    pub async fn execute(&self, request: &SearchRequest) -> ClientResult<ApiResponse> {
        let url = self.config.endpoint(request.path());
        let body = serde_json::to_string(request)?;

        tracing::debug!(domain = %request.domain(), url = %url, body = %body, "Sending RePORTER request");

        let response = self
            .client
            .post(&url)
            .body(body)
            .send()
            .await
            .map_err(|e| ClientError::from_middleware(e, self.config.request_timeout))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::from_reqwest(&e, self.config.request_timeout))?;

        if !status.is_success() {
            tracing::warn!(domain = %request.domain(), status = status.as_u16(), body = %text, "RePORTER returned error status");
            return Err(ClientError::upstream(status.as_u16(), text));
        }

        parse_response(&text).inspect_err(|e| {
            if let ClientError::Decode { message, snippet } = e {
                tracing::error!(domain = %request.domain(), error = %message, raw = %snippet, "Failed to decode RePORTER response");
            }
        })
    }
}

/// Parse a response body into the RePORTER envelope.
fn parse_response(text: &str) -> ClientResult<ApiResponse> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ClientError::decode(e.to_string(), text))?;

    if !value.is_object() {
        return Err(ClientError::decode("expected a JSON object", text));
    }

    serde_json::from_value(value).map_err(|e| ClientError::decode(e.to_string(), text))
}

impl std::fmt::Debug for ReporterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReporterClient")
            .field("base_url", &self.config.base_url)
            .field("has_api_key", &self.has_api_key())
            .finish()
    }
}
