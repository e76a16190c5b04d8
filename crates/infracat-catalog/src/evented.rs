//! EventedCatalog - a catalog wrapper that emits element events after mutations.
//!
//! This wrapper delegates every call to an inner catalog and publishes an
//! [`ElementEvent`](infracat_core::ElementEvent) to a broadcaster after each
//! successful mutation. The discovery listener subscribes to the same
//! broadcaster, so parents catalogued while the controller runs are picked
//! up without waiting for a restart.
//!
//! # Example
//!
//! ```ignore
//! use infracat_catalog::EventedCatalog;
//! use infracat_core::ElementEventBroadcaster;
//!
//! let broadcaster = ElementEventBroadcaster::new_shared();
//! let catalog = EventedCatalog::new(InMemoryCatalog::new(), broadcaster.clone());
//!
//! // Subscribers of `broadcaster` now see a "created" event.
//! catalog.create_parent(&platform).await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use infracat_core::{ElementEventBroadcaster, ElementHeader, ElementId, ElementType};
use tracing::debug;

use crate::error::CatalogError;
use crate::traits::Catalog;
use crate::types::{
    AssetUseType, CapabilityProperties, CatalogEntry, ChildProperties, ParentProperties,
    ParentRecord, TemplateProperties,
};

/// A catalog wrapper that emits events after successful mutations.
///
/// Events are emitted **after** the inner call succeeds, so every event
/// corresponds to a change that actually happened.
pub struct EventedCatalog<C: Catalog> {
    inner: C,
    broadcaster: Arc<ElementEventBroadcaster>,
}

impl<C: Catalog> EventedCatalog<C> {
    pub fn new(inner: C, broadcaster: Arc<ElementEventBroadcaster>) -> Self {
        Self { inner, broadcaster }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn broadcaster(&self) -> &Arc<ElementEventBroadcaster> {
        &self.broadcaster
    }

    fn emit_created(&self, header: ElementHeader) {
        if !self.broadcaster.has_subscribers() {
            return;
        }
        let element_id = header.id.clone();
        let count = self.broadcaster.send_created(header);
        debug!(element_id = %element_id, subscribers = count, "Emitted ElementCreated event");
    }

    fn emit_deleted(&self, header: ElementHeader) {
        if !self.broadcaster.has_subscribers() {
            return;
        }
        let element_id = header.id.clone();
        let count = self.broadcaster.send_deleted(header);
        debug!(element_id = %element_id, subscribers = count, "Emitted ElementDeleted event");
    }

    /// Header of a named element, used to describe copies and deletions.
    async fn lookup_header(&self, id: &ElementId, qualified_name: &str) -> Option<ElementHeader> {
        self.inner
            .find_by_name(qualified_name)
            .await
            .ok()?
            .into_iter()
            .find(|entry| entry.id() == id)
            .map(|entry| entry.header)
    }
}

#[async_trait]
impl<C: Catalog> Catalog for EventedCatalog<C> {
    async fn find_by_name(&self, name: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.inner.find_by_name(name).await
    }

    async fn create(&self, properties: &ChildProperties) -> Result<ElementId, CatalogError> {
        let id = self.inner.create(properties).await?;
        self.emit_created(ElementHeader::new(
            id.clone(),
            ElementType::new(&properties.type_name),
        ));
        Ok(id)
    }

    async fn create_from_template(
        &self,
        template_id: &ElementId,
        properties: &TemplateProperties,
    ) -> Result<ElementId, CatalogError> {
        let id = self
            .inner
            .create_from_template(template_id, properties)
            .await?;
        if self.broadcaster.has_subscribers()
            && let Some(header) = self.lookup_header(&id, &properties.qualified_name).await
        {
            self.emit_created(header);
        }
        Ok(id)
    }

    async fn delete(&self, id: &ElementId, qualified_name: &str) -> Result<(), CatalogError> {
        let header = if self.broadcaster.has_subscribers() {
            self.lookup_header(id, qualified_name).await
        } else {
            None
        };
        self.inner.delete(id, qualified_name).await?;
        if let Some(header) = header {
            self.emit_deleted(header);
        }
        Ok(())
    }

    async fn list_for_parent(
        &self,
        parent_id: &ElementId,
        start_from: usize,
        page_size: usize,
    ) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.inner
            .list_for_parent(parent_id, start_from, page_size)
            .await
    }

    async fn create_parent(&self, properties: &ParentProperties) -> Result<ElementId, CatalogError> {
        let id = self.inner.create_parent(properties).await?;
        self.emit_created(ElementHeader::new(
            id.clone(),
            ElementType::new(&properties.type_name)
                .with_super_types(properties.super_type_names.iter().cloned()),
        ));
        Ok(id)
    }

    async fn find_parents(
        &self,
        name: Option<&str>,
        start_from: usize,
        page_size: usize,
    ) -> Result<Vec<ParentRecord>, CatalogError> {
        self.inner.find_parents(name, start_from, page_size).await
    }

    async fn get_parent(&self, id: &ElementId) -> Result<Option<ParentRecord>, CatalogError> {
        self.inner.get_parent(id).await
    }

    async fn create_capability(
        &self,
        parent_id: &ElementId,
        properties: &CapabilityProperties,
    ) -> Result<ElementId, CatalogError> {
        let id = self.inner.create_capability(parent_id, properties).await?;
        self.emit_created(ElementHeader::new(
            id.clone(),
            ElementType::new(&properties.type_name),
        ));
        Ok(id)
    }

    async fn link_to_capability(
        &self,
        capability_id: &ElementId,
        child_id: &ElementId,
        use_type: AssetUseType,
    ) -> Result<(), CatalogError> {
        self.inner
            .link_to_capability(capability_id, child_id, use_type)
            .await
    }

    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }
}
