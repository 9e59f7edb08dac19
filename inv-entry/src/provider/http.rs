//! HTTP suggestion service client
//!
//! Queries `{base_url}{endpoint}` with the selected ancestors as query
//! parameters. Identifiers come from `{base_url}{identifier_endpoint}?model=<seed>`.
//!
//! Payloads are normalized by [`super::normalize`]; a payload of any other
//! shape is reported as [`ProviderError::Malformed`].

use super::normalize::{normalize_identifier, normalize_options};
use super::{ProviderError, SuggestionProvider};
use crate::context::SelectionContext;
use async_trait::async_trait;
use inv_common::config::ProviderConfig;
use reqwest::{header, Client, Response};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Suggestion service client
pub struct HttpSuggestionProvider {
    /// HTTP client for API requests
    http_client: Client,
    /// Base URL without trailing slash
    base_url: String,
    /// Level key → request path
    endpoints: BTreeMap<String, String>,
    /// Request path for identifier generation
    identifier_endpoint: String,
    timeout: Duration,
}

impl HttpSuggestionProvider {
    /// Create a client from provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let timeout = Duration::from_millis(config.timeout_ms);

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http_client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            endpoints: config.endpoints.clone(),
            identifier_endpoint: config.identifier_endpoint.clone(),
            timeout,
        })
    }

    /// Full URL for a level's suggestions
    pub fn endpoint_url(&self, level: &str) -> Result<String, ProviderError> {
        let path = self.endpoints.get(level).ok_or_else(|| {
            ProviderError::NotConfigured(format!("No endpoint configured for level: {}", level))
        })?;
        Ok(format!("{}{}", self.base_url, path))
    }

    pub fn identifier_url(&self) -> String {
        format!("{}{}", self.base_url, self.identifier_endpoint)
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, ProviderError> {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let response = check_status(response).await?;

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::Malformed(format!("Response is not JSON: {}", e)))
    }

    fn transport_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.timeout)
        } else {
            ProviderError::Network(format!("Request failed: {}", e))
        }
    }
}

async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Api(format!("Service returned {}: {}", status, body)))
}

#[async_trait]
impl SuggestionProvider for HttpSuggestionProvider {
    fn name(&self) -> &'static str {
        "HTTP"
    }

    async fn fetch_options(
        &self,
        level: &str,
        context: &SelectionContext,
    ) -> Result<Vec<String>, ProviderError> {
        let url = self.endpoint_url(level)?;
        let query: Vec<(&str, &str)> = context.selected().collect();

        debug!(level = %level, url = %url, params = query.len(), "Requesting suggestions");

        let payload = self.get_json(&url, &query).await?;
        let options = normalize_options(&payload).ok_or_else(|| {
            ProviderError::Malformed(format!("Unrecognized suggestion payload for {}", level))
        })?;

        debug!(level = %level, count = options.len(), "Suggestions received");
        Ok(options)
    }

    async fn fetch_identifier(&self, seed: &str) -> Result<String, ProviderError> {
        let url = self.identifier_url();
        debug!(seed = %seed, url = %url, "Requesting identifier");

        let payload = self.get_json(&url, &[("model", seed)]).await?;
        normalize_identifier(&payload)
            .ok_or_else(|| ProviderError::Malformed("Identifier payload has no uuid/id/serial".to_string()))
    }
}
