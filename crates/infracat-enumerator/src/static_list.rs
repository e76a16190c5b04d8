//! In-process enumerator backed by a table of endpoint -> children.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{EnumeratorError, LiveEnumerator};

#[derive(Debug, Clone)]
enum EndpointState {
    Reachable(BTreeSet<String>),
    Unreachable,
}

/// Enumerator whose live sets are set programmatically.
///
/// Endpoints that were never configured, or were marked unreachable,
/// fail with [`EnumeratorError::Connectivity`].
#[derive(Debug, Default)]
pub struct StaticEnumerator {
    endpoints: RwLock<HashMap<String, EndpointState>>,
}

impl StaticEnumerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the live set reported for `endpoint`.
    pub async fn set_children<I, S>(&self, endpoint: &str, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(Into::into).collect();
        self.endpoints
            .write()
            .await
            .insert(endpoint.to_string(), EndpointState::Reachable(names));
    }

    pub async fn mark_unreachable(&self, endpoint: &str) {
        self.endpoints
            .write()
            .await
            .insert(endpoint.to_string(), EndpointState::Unreachable);
    }
}

#[async_trait]
impl LiveEnumerator for StaticEnumerator {
    async fn list_live_children(&self, endpoint: &str) -> Result<BTreeSet<String>, EnumeratorError> {
        match self.endpoints.read().await.get(endpoint) {
            Some(EndpointState::Reachable(names)) => Ok(names.clone()),
            Some(EndpointState::Unreachable) => Err(EnumeratorError::connectivity(
                endpoint,
                "endpoint marked unreachable",
            )),
            None => Err(EnumeratorError::connectivity(endpoint, "unknown endpoint")),
        }
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_configured_children() {
        let enumerator = StaticEnumerator::new();
        enumerator
            .set_children("localhost:9092", ["topic1", "topic2"])
            .await;

        let live = enumerator.list_live_children("localhost:9092").await.unwrap();
        assert_eq!(live.len(), 2);
        assert!(live.contains("topic1"));
    }

    #[tokio::test]
    async fn test_unreachable_and_unknown_endpoints_fail() {
        let enumerator = StaticEnumerator::new();
        enumerator.set_children("a:1", ["t"]).await;
        enumerator.mark_unreachable("a:1").await;

        assert!(enumerator.list_live_children("a:1").await.unwrap_err().is_connectivity());
        assert!(enumerator.list_live_children("b:2").await.unwrap_err().is_connectivity());
    }
}
