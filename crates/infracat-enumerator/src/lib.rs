//! Enumeration of the live children of a parent system.
//!
//! A [`LiveEnumerator`] asks an external system which child resources it
//! currently has, e.g. the topics of a Kafka broker. Two implementations
//! are provided:
//!
//! - [`StaticEnumerator`] - an in-process table, for tests and demos
//! - [`RestProxyEnumerator`] - lists topics through a Kafka REST proxy

mod error;
pub mod rest_proxy;
pub mod static_list;

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;

pub use error::EnumeratorError;
pub use rest_proxy::{RestProxyConfig, RestProxyEnumerator};
pub use static_list::StaticEnumerator;

/// Lists the identifiers of the child resources an external system currently has.
#[async_trait]
pub trait LiveEnumerator: Send + Sync {
    /// Returns the names of every live child reachable through `endpoint`.
    ///
    /// # Errors
    ///
    /// Any error means the live set is unknown; callers must not treat it
    /// as an empty set.
    async fn list_live_children(&self, endpoint: &str) -> Result<BTreeSet<String>, EnumeratorError>;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

pub type DynEnumerator = Arc<dyn LiveEnumerator>;
