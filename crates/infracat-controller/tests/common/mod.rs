#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use infracat_catalog::{
    AssetUseType, CapabilityProperties, Catalog, CatalogEntry, CatalogError, ChildProperties,
    DynCatalog, ParentProperties, ParentRecord, TemplateProperties,
};
use infracat_catalog_memory::InMemoryCatalog;
use infracat_controller::{ControllerSettings, MonitoredParent, ParentRegistry};
use infracat_core::{ElementId, ElementType, ParentKind, ParentKindSet};

pub const KAFKA: &str = "Apache Kafka Server";

/// A catalog call as seen by [`RecordingCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FindByName(String),
    Create(String),
    CreateFromTemplate(String),
    Delete(String),
    List { start_from: usize },
    GetParent(ElementId),
    CreateCapability(String),
    Link(ElementId),
}

/// Catalog operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Create,
    Delete,
    List,
    GetParent,
    CreateCapability,
    Link,
}

/// In-memory catalog that logs every call and fails on demand.
#[derive(Default)]
pub struct RecordingCatalog {
    pub inner: InMemoryCatalog,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<(Op, Option<String>), CatalogError>>,
}

impl RecordingCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes `op` fail with a server error for the child named `name`.
    pub fn fail_on(&self, op: Op, name: &str) {
        let error = CatalogError::server(format!("injected {op:?} failure for {name}"));
        self.fail_with(op, name, error);
    }

    /// Makes `op` fail with `error` for the child named `name`.
    pub fn fail_with(&self, op: Op, name: &str, error: CatalogError) {
        self.failures
            .lock()
            .unwrap()
            .insert((op, Some(name.to_string())), error);
    }

    /// Makes every `op` fail with a server error.
    pub fn fail_all(&self, op: Op) {
        let error = CatalogError::server(format!("injected {op:?} failure"));
        self.failures.lock().unwrap().insert((op, None), error);
    }

    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Calls that change children.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    call,
                    Call::Create(_) | Call::CreateFromTemplate(_) | Call::Delete(_)
                )
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    pub fn names_under(&self, parent: &ElementId) -> BTreeSet<String> {
        self.inner
            .children_of(parent)
            .into_iter()
            .map(|entry| entry.qualified_name)
            .collect()
    }

    /// Catalogues `names` under `parent` without recording calls.
    pub async fn seed_children(&self, parent: &ElementId, names: &[&str]) {
        for name in names {
            self.inner
                .create(&ChildProperties::named("KafkaTopic", name, parent.clone()))
                .await
                .unwrap();
        }
    }

    /// Catalogues a Kafka broker platform without recording calls.
    pub async fn seed_broker(&self, name: &str, endpoint: &str) -> ElementId {
        self.inner
            .create_parent(&broker_properties(name, endpoint))
            .await
            .unwrap()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, op: Op, name: &str) -> Result<(), CatalogError> {
        let failures = self.failures.lock().unwrap();
        match failures
            .get(&(op, Some(name.to_string())))
            .or_else(|| failures.get(&(op, None)))
        {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Catalog for RecordingCatalog {
    async fn find_by_name(&self, name: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.record(Call::FindByName(name.to_string()));
        self.inner.find_by_name(name).await
    }

    async fn create(&self, properties: &ChildProperties) -> Result<ElementId, CatalogError> {
        self.record(Call::Create(properties.qualified_name.clone()));
        self.check(Op::Create, &properties.qualified_name)?;
        self.inner.create(properties).await
    }

    async fn create_from_template(
        &self,
        template_id: &ElementId,
        properties: &TemplateProperties,
    ) -> Result<ElementId, CatalogError> {
        self.record(Call::CreateFromTemplate(properties.qualified_name.clone()));
        self.check(Op::Create, &properties.qualified_name)?;
        self.inner.create_from_template(template_id, properties).await
    }

    async fn delete(&self, id: &ElementId, qualified_name: &str) -> Result<(), CatalogError> {
        self.record(Call::Delete(qualified_name.to_string()));
        self.check(Op::Delete, qualified_name)?;
        self.inner.delete(id, qualified_name).await
    }

    async fn list_for_parent(
        &self,
        parent_id: &ElementId,
        start_from: usize,
        page_size: usize,
    ) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.record(Call::List { start_from });
        self.check(Op::List, parent_id.as_str())?;
        self.inner.list_for_parent(parent_id, start_from, page_size).await
    }

    async fn create_parent(&self, properties: &ParentProperties) -> Result<ElementId, CatalogError> {
        self.inner.create_parent(properties).await
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
        self.record(Call::GetParent(id.clone()));
        self.check(Op::GetParent, id.as_str())?;
        self.inner.get_parent(id).await
    }

    async fn create_capability(
        &self,
        parent_id: &ElementId,
        properties: &CapabilityProperties,
    ) -> Result<ElementId, CatalogError> {
        self.record(Call::CreateCapability(properties.qualified_name.clone()));
        self.check(Op::CreateCapability, &properties.qualified_name)?;
        self.inner.create_capability(parent_id, properties).await
    }

    async fn link_to_capability(
        &self,
        capability_id: &ElementId,
        child_id: &ElementId,
        use_type: AssetUseType,
    ) -> Result<(), CatalogError> {
        self.record(Call::Link(child_id.clone()));
        self.check(Op::Link, child_id.as_str())?;
        self.inner
            .link_to_capability(capability_id, child_id, use_type)
            .await
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

pub fn broker_properties(name: &str, endpoint: &str) -> ParentProperties {
    ParentProperties {
        type_name: "SoftwareServerPlatform".into(),
        super_type_names: vec!["ITInfrastructure".into()],
        qualified_name: name.into(),
        display_name: Some(name.into()),
        platform_type: Some(KAFKA.into()),
        endpoints: vec![endpoint.into()],
    }
}

pub fn settings() -> ControllerSettings {
    ControllerSettings {
        platform_type: Some(KAFKA.to_string()),
        page_size: 10,
        ..ControllerSettings::default()
    }
}

pub fn dyn_catalog(catalog: &Arc<RecordingCatalog>) -> DynCatalog {
    catalog.clone()
}

/// Registers `id` as a platform and returns its registry entry.
pub fn monitor(id: &ElementId) -> Arc<MonitoredParent> {
    let registry = ParentRegistry::new(ParentKindSet::from(ParentKind::SoftwareServerPlatform));
    registry.register(id, &ElementType::new("SoftwareServerPlatform"));
    registry.get(id).unwrap()
}
