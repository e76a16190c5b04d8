//! Topic enumeration through a Kafka REST proxy.
//!
//! The proxy answers `GET /topics` with a JSON array of topic names.
//! Endpoints without a scheme are assumed to be plain HTTP.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{EnumeratorError, LiveEnumerator};

/// Settings for [`RestProxyEnumerator`].
#[derive(Debug, Clone)]
pub struct RestProxyConfig {
    /// Request timeout (default: 10 seconds).
    pub timeout: Duration,
    /// Path of the topic listing, appended to the endpoint (default: `/topics`).
    pub topics_path: String,
    /// Whether to report internal topics whose names start with `_`.
    pub include_internal: bool,
}

impl Default for RestProxyConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            topics_path: "/topics".to_string(),
            include_internal: false,
        }
    }
}

impl RestProxyConfig {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_topics_path(mut self, path: impl Into<String>) -> Self {
        self.topics_path = path.into();
        self
    }

    #[must_use]
    pub fn with_include_internal(mut self, include: bool) -> Self {
        self.include_internal = include;
        self
    }
}

pub struct RestProxyEnumerator {
    http_client: Client,
    config: RestProxyConfig,
}

impl RestProxyEnumerator {
    /// Builds the enumerator and its HTTP client.
    pub fn new(config: RestProxyConfig) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http_client,
            config,
        })
    }

    fn topics_url(&self, endpoint: &str) -> String {
        let base = endpoint.trim_end_matches('/');
        let base = if base.contains("://") {
            base.to_string()
        } else {
            format!("http://{base}")
        };
        let path = self.config.topics_path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

#[async_trait]
impl LiveEnumerator for RestProxyEnumerator {
    async fn list_live_children(&self, endpoint: &str) -> Result<BTreeSet<String>, EnumeratorError> {
        let url = self.topics_url(endpoint);
        debug!(url = %url, "Listing topics");

        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| EnumeratorError::connectivity(endpoint, e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(EnumeratorError::connectivity(
                endpoint,
                format!("status {status}"),
            ));
        }
        if !status.is_success() {
            return Err(EnumeratorError::protocol(endpoint, format!("status {status}")));
        }

        let topics: Vec<String> = response
            .json()
            .await
            .map_err(|e| EnumeratorError::protocol(endpoint, e.to_string()))?;

        Ok(topics
            .into_iter()
            .filter(|topic| self.config.include_internal || !topic.starts_with('_'))
            .collect())
    }

    fn name(&self) -> &'static str {
        "rest_proxy"
    }
}
