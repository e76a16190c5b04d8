//! The catalog client contract.

use async_trait::async_trait;
use infracat_core::ElementId;

use crate::error::CatalogError;
use crate::types::{
    AssetUseType, CapabilityProperties, CatalogEntry, ChildProperties, ParentProperties,
    ParentRecord, TemplateProperties,
};

/// Access to the catalog that infracat keeps in sync.
///
/// Implementations must be thread-safe (`Send + Sync`); one instance is
/// shared by every concurrent reconciliation pass. Timeouts are the
/// implementation's responsibility, callers never impose one.
#[async_trait]
pub trait Catalog: Send + Sync {
    // ==================== Children ====================

    /// Looks up elements whose name matches `name`.
    ///
    /// The match may be looser than equality; callers needing an exact
    /// qualified-name match filter the result themselves.
    async fn find_by_name(&self, name: &str) -> Result<Vec<CatalogEntry>, CatalogError>;

    /// Creates a child element from explicit properties.
    async fn create(&self, properties: &ChildProperties) -> Result<ElementId, CatalogError>;

    /// Creates a child element by copying `template_id` and applying `properties`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the template does not exist.
    async fn create_from_template(
        &self,
        template_id: &ElementId,
        properties: &TemplateProperties,
    ) -> Result<ElementId, CatalogError>;

    /// Removes a child element. `qualified_name` must match the element.
    async fn delete(&self, id: &ElementId, qualified_name: &str) -> Result<(), CatalogError>;

    /// Returns one page of the children catalogued under `parent_id`.
    ///
    /// An empty page means there is nothing left after `start_from`.
    async fn list_for_parent(
        &self,
        parent_id: &ElementId,
        start_from: usize,
        page_size: usize,
    ) -> Result<Vec<CatalogEntry>, CatalogError>;

    // ==================== Parents ====================

    /// Catalogues a parent system.
    async fn create_parent(&self, properties: &ParentProperties) -> Result<ElementId, CatalogError>;

    /// Returns one page of catalogued parent systems, optionally filtered by name.
    async fn find_parents(
        &self,
        name: Option<&str>,
        start_from: usize,
        page_size: usize,
    ) -> Result<Vec<ParentRecord>, CatalogError>;

    /// Reads a parent system. Returns `None` if it is not catalogued.
    async fn get_parent(&self, id: &ElementId) -> Result<Option<ParentRecord>, CatalogError>;

    // ==================== Capabilities ====================

    /// Creates a capability record and deploys it on `parent_id`.
    async fn create_capability(
        &self,
        parent_id: &ElementId,
        properties: &CapabilityProperties,
    ) -> Result<ElementId, CatalogError>;

    /// Relates a child element to a capability.
    ///
    /// Linking a pair that is already linked is not an error.
    async fn link_to_capability(
        &self,
        capability_id: &ElementId,
        child_id: &ElementId,
        use_type: AssetUseType,
    ) -> Result<(), CatalogError>;

    // ==================== Metadata ====================

    /// Name of this backend for logging.
    fn backend_name(&self) -> &'static str;
}
