//! Discovery of parent systems.
//!
//! Parents reach the registry two ways: a sweep of the catalog at startup
//! (pull) and element-change events while running (push). Both end in
//! [`Discovery::observe`], so the order they arrive in does not matter.

use std::sync::Arc;

use infracat_catalog::{Catalog, CatalogError, DynCatalog};
use infracat_core::{ElementEvent, ElementEventType, ElementHeader};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::audit::AuditCode;
use crate::registry::ParentRegistry;

#[derive(Debug, Clone)]
pub struct Discovery {
    registry: Arc<ParentRegistry>,
}

impl Discovery {
    pub fn new(registry: Arc<ParentRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ParentRegistry> {
        &self.registry
    }

    /// Registers the element if it is a monitored kind of parent.
    pub fn observe(&self, header: &ElementHeader) -> bool {
        let added = self.registry.register(&header.id, &header.element_type);
        if added {
            audit!(
                AuditCode::ParentRegistered,
                parent_id = %header.id,
                type_name = %header.element_type.type_name,
                "Monitoring parent system"
            );
        }
        added
    }

    /// Pages through the catalogued parents, optionally filtered by name,
    /// and observes each. Returns the number newly registered.
    pub async fn sweep(
        &self,
        catalog: &dyn Catalog,
        name: Option<&str>,
        page_size: usize,
    ) -> Result<usize, CatalogError> {
        let mut start_from = 0;
        let mut added = 0;
        loop {
            let page = catalog.find_parents(name, start_from, page_size).await?;
            if page.is_empty() {
                break;
            }
            start_from += page.len();
            for record in &page {
                if self.observe(&record.header) {
                    added += 1;
                }
            }
        }
        debug!(seen = start_from, added, "Startup sweep finished");
        Ok(added)
    }

    /// Handles one element-change event.
    ///
    /// Deletions are ignored: monitored parents are never deregistered.
    pub fn handle_event(&self, event: &ElementEvent) -> bool {
        match event.event_type {
            ElementEventType::Created | ElementEventType::Updated => self.observe(&event.header),
            ElementEventType::Deleted => false,
        }
    }
}

/// Where the listener re-reads parents after it has missed events.
#[derive(Clone)]
pub struct SweepSource {
    pub catalog: DynCatalog,
    /// Name filter passed to [`Discovery::sweep`].
    pub name: Option<String>,
    pub page_size: usize,
}

/// Background task feeding element-change events into [`Discovery`].
///
/// Events dropped because the listener fell behind are recovered by
/// sweeping the [`SweepSource`], when one is configured.
pub struct DiscoveryListener {
    discovery: Discovery,
    resync: Option<SweepSource>,
}

impl DiscoveryListener {
    pub fn new(discovery: Discovery) -> Self {
        Self {
            discovery,
            resync: None,
        }
    }

    #[must_use]
    pub fn with_resync(mut self, source: SweepSource) -> Self {
        self.resync = Some(source);
        self
    }

    /// Spawns the listener. It stops when every sender is dropped.
    pub fn spawn(self, receiver: broadcast::Receiver<ElementEvent>) -> JoinHandle<()> {
        tokio::spawn(self.run(receiver))
    }

    pub async fn run(self, mut receiver: broadcast::Receiver<ElementEvent>) {
        info!("Starting discovery listener");

        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.discovery.handle_event(&event);
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(missed = n, "Discovery listener lagged, missed events");
                    self.resync().await;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!("Discovery channel closed, stopping listener");
                    break;
                }
            }
        }
    }

    async fn resync(&self) {
        let Some(source) = &self.resync else {
            return;
        };
        match self
            .discovery
            .sweep(source.catalog.as_ref(), source.name.as_deref(), source.page_size)
            .await
        {
            Ok(added) => info!(added, "Resynchronised parents after missed events"),
            Err(error) => warn!(error = %error, "Unable to resynchronise parents"),
        }
    }
}
