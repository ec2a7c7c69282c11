// src/core/upstream/edamam.rs

//! A `RecipeProvider` backed by the Edamam recipes v2 HTTP API.

use super::RecipeProvider;
use super::types::SearchPage;
use crate::config::UpstreamConfig;
use crate::core::{LarderError, metrics};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const SEARCH_ENDPOINT: &str = "search";
const LOOKUP_ENDPOINT: &str = "lookup";

#[derive(Debug, Clone)]
pub struct EdamamClient {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl EdamamClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, LarderError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    /// Builds an endpoint URL carrying the public type and the app credentials.
    fn authorized_url(&self, base: &str, extra: (&str, &str)) -> Result<Url, LarderError> {
        let url = Url::parse_with_params(
            base,
            &[
                ("type", "public"),
                ("app_id", self.config.app_id.as_str()),
                ("app_key", self.config.app_key.as_str()),
                extra,
            ],
        )?;
        Ok(url)
    }

    /// Issues a GET and decodes a result page, retrying transport failures,
    /// 5xx and 429 responses with exponential backoff.
    async fn get_page(&self, endpoint: &'static str, url: &str) -> Result<SearchPage, LarderError> {
        let mut attempt: u32 = 0;
        loop {
            metrics::UPSTREAM_REQUESTS_TOTAL
                .with_label_values(&[endpoint])
                .inc();

            let failure = match self.client.get(url).send().await {
                Ok(res) if res.status().is_success() => {
                    return res.json::<SearchPage>().await.map_err(|e| {
                        metrics::UPSTREAM_FAILURES_TOTAL
                            .with_label_values(&[endpoint])
                            .inc();
                        LarderError::UpstreamUnavailable(format!(
                            "malformed {endpoint} response: {e}"
                        ))
                    });
                }
                Ok(res) => {
                    let status = res.status();
                    UpstreamFailure {
                        retryable: is_retryable_status(status),
                        message: format!("{endpoint} responded with status {status}"),
                    }
                }
                Err(e) => UpstreamFailure {
                    retryable: e.is_timeout() || e.is_connect() || e.is_request(),
                    message: format!("{endpoint} request failed: {e}"),
                },
            };

            if failure.retryable && attempt < self.config.max_retries {
                let delay = backoff_delay(self.config.retry_backoff(), attempt);
                warn!(
                    "Upstream {} (attempt {}/{}), retrying in {:?}.",
                    failure.message,
                    attempt + 1,
                    self.config.max_retries + 1,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            metrics::UPSTREAM_FAILURES_TOTAL
                .with_label_values(&[endpoint])
                .inc();
            return Err(LarderError::UpstreamUnavailable(failure.message));
        }
    }
}

struct UpstreamFailure {
    retryable: bool,
    message: String,
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// `base * 2^attempt`, capped so a misconfigured retry count cannot overflow.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(1u32 << attempt.min(10))
}

#[async_trait]
impl RecipeProvider for EdamamClient {
    fn base_url(&self) -> &str {
        &self.config.search_url
    }

    fn search_url(&self, query: &str) -> Result<String, LarderError> {
        Ok(self
            .authorized_url(&self.config.search_url, ("q", query))?
            .into())
    }

    async fn search(&self, url: &str) -> Result<SearchPage, LarderError> {
        debug!("Fetching search page from upstream.");
        self.get_page(SEARCH_ENDPOINT, url).await
    }

    async fn lookup_by_uri(&self, uri: &str) -> Result<SearchPage, LarderError> {
        let url = self.authorized_url(&self.config.by_uri_url, ("uri", uri))?;
        debug!("Looking up recipe '{}' upstream.", uri);
        self.get_page(LOOKUP_ENDPOINT, url.as_str()).await
    }
}
