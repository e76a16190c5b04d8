use std::collections::HashSet;

use async_trait::async_trait;
use infracat_catalog::{
    AssetUseType, CapabilityProperties, Catalog, CatalogEntry, CatalogError, ChildProperties,
    ParentProperties, ParentRecord, TemplateProperties,
};
use infracat_core::{ElementHeader, ElementId, ElementType};
use papaya::HashMap as PapayaHashMap;
use tokio::sync::RwLock;
use tracing::trace;
use uuid::Uuid;

/// A capability record together with the parent it is deployed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCapability {
    pub id: ElementId,
    pub parent_id: ElementId,
    pub properties: CapabilityProperties,
}

/// A capability-to-child relationship.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoredLink {
    pub capability_id: ElementId,
    pub child_id: ElementId,
    pub use_type: AssetUseType,
}

/// In-memory catalog using papaya lock-free maps.
///
/// Children and templates share one map; parents and capabilities live in
/// their own. Paging orders children by qualified name so consecutive pages
/// are stable while nothing is mutated in between.
#[derive(Default)]
pub struct InMemoryCatalog {
    entries: PapayaHashMap<ElementId, CatalogEntry>,
    parents: PapayaHashMap<ElementId, ParentRecord>,
    capabilities: PapayaHashMap<ElementId, StoredCapability>,
    links: RwLock<HashSet<StoredLink>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id() -> ElementId {
        ElementId::new(Uuid::new_v4().to_string())
    }

    /// Inserts an entry as-is, e.g. a template or a pre-existing child.
    pub fn insert_entry(&self, entry: CatalogEntry) {
        self.entries.pin().insert(entry.header.id.clone(), entry);
    }

    /// Inserts a parent record as-is.
    pub fn insert_parent(&self, record: ParentRecord) {
        self.parents.pin().insert(record.header.id.clone(), record);
    }

    /// Every child catalogued under `parent_id`, ordered by qualified name.
    pub fn children_of(&self, parent_id: &ElementId) -> Vec<CatalogEntry> {
        let guard = self.entries.pin();
        let mut children: Vec<CatalogEntry> = guard
            .iter()
            .filter(|(_, entry)| entry.parent_id.as_ref() == Some(parent_id))
            .map(|(_, entry)| entry.clone())
            .collect();
        children.sort_by(|a, b| {
            a.qualified_name
                .cmp(&b.qualified_name)
                .then_with(|| a.header.id.cmp(&b.header.id))
        });
        children
    }

    /// Capabilities deployed on `parent_id`.
    pub fn capabilities_of(&self, parent_id: &ElementId) -> Vec<StoredCapability> {
        self.capabilities
            .pin()
            .iter()
            .filter(|(_, capability)| &capability.parent_id == parent_id)
            .map(|(_, capability)| capability.clone())
            .collect()
    }

    /// Snapshot of every relationship link.
    pub async fn links(&self) -> Vec<StoredLink> {
        self.links.read().await.iter().cloned().collect()
    }

    fn require_parent(&self, parent_id: &ElementId) -> Result<(), CatalogError> {
        if self.parents.pin().contains_key(parent_id) {
            Ok(())
        } else {
            Err(CatalogError::not_found(parent_id.as_str()))
        }
    }
}

fn validate_name(qualified_name: &str) -> Result<(), CatalogError> {
    if qualified_name.trim().is_empty() {
        return Err(CatalogError::validation("qualifiedName must not be blank"));
    }
    Ok(())
}

fn page<T>(items: Vec<T>, start_from: usize, page_size: usize) -> Vec<T> {
    items.into_iter().skip(start_from).take(page_size).collect()
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn find_by_name(&self, name: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        let guard = self.entries.pin();
        Ok(guard
            .iter()
            .filter(|(_, entry)| {
                entry.qualified_name == name || entry.display_name.as_deref() == Some(name)
            })
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    async fn create(&self, properties: &ChildProperties) -> Result<ElementId, CatalogError> {
        validate_name(&properties.qualified_name)?;
        self.require_parent(&properties.parent_id)?;

        let id = Self::next_id();
        let entry = CatalogEntry {
            header: ElementHeader::new(id.clone(), ElementType::new(&properties.type_name)),
            qualified_name: properties.qualified_name.clone(),
            display_name: properties.display_name.clone(),
            parent_id: Some(properties.parent_id.clone()),
            additional_properties: properties.additional_properties.clone(),
        };
        self.entries.pin().insert(id.clone(), entry);
        trace!(id = %id, name = %properties.qualified_name, "Created entry");
        Ok(id)
    }

    async fn create_from_template(
        &self,
        template_id: &ElementId,
        properties: &TemplateProperties,
    ) -> Result<ElementId, CatalogError> {
        validate_name(&properties.qualified_name)?;
        self.require_parent(&properties.parent_id)?;

        let template = self
            .entries
            .pin()
            .get(template_id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(template_id.as_str()))?;

        let id = Self::next_id();
        let entry = CatalogEntry {
            header: ElementHeader::new(id.clone(), template.header.element_type.clone()),
            qualified_name: properties.qualified_name.clone(),
            display_name: properties
                .display_name
                .clone()
                .or_else(|| Some(properties.qualified_name.clone())),
            parent_id: Some(properties.parent_id.clone()),
            additional_properties: template.additional_properties.clone(),
        };
        self.entries.pin().insert(id.clone(), entry);
        trace!(id = %id, template = %template_id, "Created entry from template");
        Ok(id)
    }

    async fn delete(&self, id: &ElementId, qualified_name: &str) -> Result<(), CatalogError> {
        {
            let guard = self.entries.pin();
            match guard.get(id) {
                None => return Err(CatalogError::not_found(id.as_str())),
                Some(entry) if entry.qualified_name != qualified_name => {
                    return Err(CatalogError::validation(format!(
                        "element {id} is named {}, not {qualified_name}",
                        entry.qualified_name
                    )));
                }
                Some(_) => {
                    guard.remove(id);
                }
            }
        }
        self.links.write().await.retain(|link| &link.child_id != id);
        trace!(id = %id, name = %qualified_name, "Deleted entry");
        Ok(())
    }

    async fn list_for_parent(
        &self,
        parent_id: &ElementId,
        start_from: usize,
        page_size: usize,
    ) -> Result<Vec<CatalogEntry>, CatalogError> {
        if page_size == 0 {
            return Err(CatalogError::validation("page size must be > 0"));
        }
        Ok(page(self.children_of(parent_id), start_from, page_size))
    }

    async fn create_parent(&self, properties: &ParentProperties) -> Result<ElementId, CatalogError> {
        validate_name(&properties.qualified_name)?;

        let id = Self::next_id();
        let record = ParentRecord {
            header: ElementHeader::new(
                id.clone(),
                ElementType::new(&properties.type_name)
                    .with_super_types(properties.super_type_names.iter().cloned()),
            ),
            qualified_name: properties.qualified_name.clone(),
            display_name: properties.display_name.clone(),
            platform_type: properties.platform_type.clone(),
            endpoints: properties.endpoints.clone(),
        };
        self.parents.pin().insert(id.clone(), record);
        Ok(id)
    }

    async fn find_parents(
        &self,
        name: Option<&str>,
        start_from: usize,
        page_size: usize,
    ) -> Result<Vec<ParentRecord>, CatalogError> {
        if page_size == 0 {
            return Err(CatalogError::validation("page size must be > 0"));
        }
        let guard = self.parents.pin();
        let mut records: Vec<ParentRecord> = guard
            .iter()
            .filter(|(_, record)| match name {
                None => true,
                Some(name) => {
                    record.qualified_name == name || record.display_name.as_deref() == Some(name)
                }
            })
            .map(|(_, record)| record.clone())
            .collect();
        records.sort_by(|a, b| a.header.id.cmp(&b.header.id));
        Ok(page(records, start_from, page_size))
    }

    async fn get_parent(&self, id: &ElementId) -> Result<Option<ParentRecord>, CatalogError> {
        Ok(self.parents.pin().get(id).cloned())
    }

    async fn create_capability(
        &self,
        parent_id: &ElementId,
        properties: &CapabilityProperties,
    ) -> Result<ElementId, CatalogError> {
        validate_name(&properties.qualified_name)?;
        self.require_parent(parent_id)?;

        let id = Self::next_id();
        self.capabilities.pin().insert(
            id.clone(),
            StoredCapability {
                id: id.clone(),
                parent_id: parent_id.clone(),
                properties: properties.clone(),
            },
        );
        Ok(id)
    }

    async fn link_to_capability(
        &self,
        capability_id: &ElementId,
        child_id: &ElementId,
        use_type: AssetUseType,
    ) -> Result<(), CatalogError> {
        if !self.capabilities.pin().contains_key(capability_id) {
            return Err(CatalogError::not_found(capability_id.as_str()));
        }
        if !self.entries.pin().contains_key(child_id) {
            return Err(CatalogError::not_found(child_id.as_str()));
        }
        self.links.write().await.insert(StoredLink {
            capability_id: capability_id.clone(),
            child_id: child_id.clone(),
            use_type,
        });
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

impl std::fmt::Debug for InMemoryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCatalog")
            .field("entries", &self.entries.pin().len())
            .field("parents", &self.parents.pin().len())
            .field("capabilities", &self.capabilities.pin().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use infracat_catalog::EventedCatalog;
    use infracat_core::{ElementEventBroadcaster, ElementEventType};

    fn broker() -> ParentProperties {
        ParentProperties {
            type_name: "SoftwareServerPlatform".into(),
            super_type_names: vec!["ITInfrastructure".into()],
            qualified_name: "Apache Kafka Server:localhost".into(),
            display_name: Some("Apache Kafka Server".into()),
            platform_type: Some("Apache Kafka Server".into()),
            endpoints: vec!["localhost:9092".into()],
        }
    }

    fn template() -> CatalogEntry {
        let mut additional = BTreeMap::new();
        additional.insert("partitions".into(), "3".into());
        CatalogEntry {
            header: ElementHeader::new("tmpl-1", ElementType::new("KafkaTopic")),
            qualified_name: "KafkaTopic:template".into(),
            display_name: Some("Kafka topic template".into()),
            parent_id: None,
            additional_properties: additional,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_children() {
        let catalog = InMemoryCatalog::new();
        let parent = catalog.create_parent(&broker()).await.unwrap();

        for name in ["b", "a", "c"] {
            catalog
                .create(&ChildProperties::named("KafkaTopic", name, parent.clone()))
                .await
                .unwrap();
        }

        let page = catalog.list_for_parent(&parent, 0, 10).await.unwrap();
        let names: Vec<_> = page.iter().map(|e| e.qualified_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_paging_ends_with_empty_page() {
        let catalog = InMemoryCatalog::new();
        let parent = catalog.create_parent(&broker()).await.unwrap();
        for i in 0..5 {
            catalog
                .create(&ChildProperties::named("KafkaTopic", &format!("t{i}"), parent.clone()))
                .await
                .unwrap();
        }

        assert_eq!(catalog.list_for_parent(&parent, 0, 2).await.unwrap().len(), 2);
        assert_eq!(catalog.list_for_parent(&parent, 4, 2).await.unwrap().len(), 1);
        assert!(catalog.list_for_parent(&parent, 5, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_requires_known_parent() {
        let catalog = InMemoryCatalog::new();
        let err = catalog
            .create(&ChildProperties::named("KafkaTopic", "t", ElementId::from("missing")))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_from_template_copies_shape() {
        let catalog = InMemoryCatalog::new();
        let parent = catalog.create_parent(&broker()).await.unwrap();
        catalog.insert_entry(template());

        let id = catalog
            .create_from_template(
                &ElementId::from("tmpl-1"),
                &TemplateProperties {
                    qualified_name: "orders".into(),
                    display_name: None,
                    parent_id: parent.clone(),
                },
            )
            .await
            .unwrap();

        let children = catalog.children_of(&parent);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id(), &id);
        assert_eq!(children[0].header.element_type.type_name, "KafkaTopic");
        assert_eq!(children[0].additional_properties["partitions"], "3");
        assert_eq!(children[0].display_name.as_deref(), Some("orders"));
    }

    #[tokio::test]
    async fn test_delete_checks_name() {
        let catalog = InMemoryCatalog::new();
        let parent = catalog.create_parent(&broker()).await.unwrap();
        let id = catalog
            .create(&ChildProperties::named("KafkaTopic", "orders", parent.clone()))
            .await
            .unwrap();

        let err = catalog.delete(&id, "payments").await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation { .. }));

        catalog.delete(&id, "orders").await.unwrap();
        assert!(catalog.children_of(&parent).is_empty());
        assert!(catalog.delete(&id, "orders").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_links_are_idempotent_and_dropped_with_child() {
        let catalog = InMemoryCatalog::new();
        let parent = catalog.create_parent(&broker()).await.unwrap();
        let capability = catalog
            .create_capability(
                &parent,
                &CapabilityProperties {
                    type_name: "SoftwareService".into(),
                    qualified_name: "broker:Topic Manager".into(),
                    display_name: None,
                    description: None,
                    additional_properties: BTreeMap::new(),
                },
            )
            .await
            .unwrap();
        let child = catalog
            .create(&ChildProperties::named("KafkaTopic", "orders", parent.clone()))
            .await
            .unwrap();

        catalog
            .link_to_capability(&capability, &child, AssetUseType::Owns)
            .await
            .unwrap();
        catalog
            .link_to_capability(&capability, &child, AssetUseType::Owns)
            .await
            .unwrap();
        assert_eq!(catalog.links().await.len(), 1);
        assert_eq!(catalog.capabilities_of(&parent).len(), 1);

        catalog.delete(&child, "orders").await.unwrap();
        assert!(catalog.links().await.is_empty());
    }

    #[tokio::test]
    async fn test_find_parents_by_name() {
        let catalog = InMemoryCatalog::new();
        catalog.create_parent(&broker()).await.unwrap();
        let mut other = broker();
        other.qualified_name = "Egeria OMAG Server Platform".into();
        other.display_name = None;
        catalog.create_parent(&other).await.unwrap();

        let all = catalog.find_parents(None, 0, 10).await.unwrap();
        assert_eq!(all.len(), 2);

        let kafka = catalog
            .find_parents(Some("Apache Kafka Server"), 0, 10)
            .await
            .unwrap();
        assert_eq!(kafka.len(), 1);
        assert_eq!(kafka[0].primary_endpoint(), Some("localhost:9092"));
    }

    #[tokio::test]
    async fn test_evented_catalog_emits_parent_creation() {
        let broadcaster = ElementEventBroadcaster::new_shared();
        let mut receiver = broadcaster.subscribe();
        let catalog = EventedCatalog::new(InMemoryCatalog::new(), broadcaster);

        let id = catalog.create_parent(&broker()).await.unwrap();

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event_type, ElementEventType::Created);
        assert_eq!(event.element_id(), &id);
        assert!(event.element_type().lineage().any(|t| t == "ITInfrastructure"));
    }

    #[tokio::test]
    async fn test_evented_catalog_emits_child_deletion() {
        let broadcaster = ElementEventBroadcaster::new_shared();
        let catalog = EventedCatalog::new(InMemoryCatalog::new(), broadcaster.clone());
        let parent = catalog.create_parent(&broker()).await.unwrap();
        let child = catalog
            .create(&ChildProperties::named("KafkaTopic", "orders", parent))
            .await
            .unwrap();

        let mut receiver = broadcaster.subscribe();
        catalog.delete(&child, "orders").await.unwrap();

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event_type, ElementEventType::Deleted);
        assert_eq!(event.element_id(), &child);
        assert_eq!(event.element_type().type_name, "KafkaTopic");
    }
}
