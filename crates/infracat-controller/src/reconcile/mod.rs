//! Reconciliation of one parent's catalogued children with its live children.
//!
//! A pass runs in this order:
//!
//! 1. Re-read the parent's catalog record and pick its endpoint.
//! 2. Enumerate the live children. A failure aborts the pass.
//! 3. Page through every catalogued child of the parent. A failure aborts
//!    the pass.
//! 4. Create the parent's capability if it has none yet.
//! 5. Delete the catalogued children that are not live.
//! 6. Create the live children that are not catalogued.
//! 7. Link created and matched children to the capability.
//!
//! Every delete, create and link in steps 5-7 is attempted independently;
//! failures are collected in the [`ReconcileReport`].

mod report;

use std::collections::BTreeSet;
use std::sync::Arc;

use infracat_catalog::{
    AssetUseType, CatalogEntry, CatalogError, ChildProperties, DynCatalog, TemplateProperties,
};
use infracat_core::ElementId;
use infracat_enumerator::DynEnumerator;
use tracing::{debug, info};

pub use report::{ChildAction, ChildFailure, ReconcileReport};

use crate::audit::AuditCode;
use crate::capability::capability_properties;
use crate::error::ReconcileError;
use crate::registry::{MonitoredParent, ParentSystem};
use crate::settings::ControllerSettings;

/// The catalog changes needed to make a parent's catalogued children match
/// its live children.
///
/// A catalogued child's liveness is the list it lands in: `matched` entries
/// are live, `to_delete` entries are not. Entries carry no flag of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildDiff {
    /// Catalogued children that are no longer live.
    pub to_delete: Vec<CatalogEntry>,
    /// Live children with no catalogued entry.
    pub to_create: Vec<String>,
    /// Catalogued children that are still live.
    pub matched: Vec<CatalogEntry>,
}

/// Compares live child names with catalogued entries by exact qualified name.
///
/// Several catalogued entries sharing a live name are all kept.
pub fn diff(live: &BTreeSet<String>, catalogued: Vec<CatalogEntry>) -> ChildDiff {
    let mut residual = live.clone();
    let mut result = ChildDiff::default();

    for entry in catalogued {
        if live.contains(&entry.qualified_name) {
            residual.remove(&entry.qualified_name);
            result.matched.push(entry);
        } else {
            result.to_delete.push(entry);
        }
    }

    result.to_create = residual.into_iter().collect();
    result
}

/// Runs reconciliation passes against one catalog and one enumerator.
pub struct Reconciler {
    catalog: DynCatalog,
    enumerator: DynEnumerator,
    settings: Arc<ControllerSettings>,
    template_id: Option<ElementId>,
}

impl Reconciler {
    pub fn new(
        catalog: DynCatalog,
        enumerator: DynEnumerator,
        settings: Arc<ControllerSettings>,
    ) -> Self {
        Self {
            catalog,
            enumerator,
            settings,
            template_id: None,
        }
    }

    /// Creates children by copying `template_id` instead of from properties.
    #[must_use]
    pub fn with_template(mut self, template_id: Option<ElementId>) -> Self {
        self.template_id = template_id;
        self
    }

    pub fn template_id(&self) -> Option<&ElementId> {
        self.template_id.as_ref()
    }

    /// Runs one pass for `parent`, waiting for any pass already running on it.
    pub async fn reconcile(
        &self,
        parent: &MonitoredParent,
    ) -> Result<ReconcileReport, ReconcileError> {
        let mut state = parent.lock().await;
        self.reconcile_locked(&mut state).await
    }

    async fn reconcile_locked(
        &self,
        parent: &mut ParentSystem,
    ) -> Result<ReconcileReport, ReconcileError> {
        if let Some(reason) = self.refresh_parent(parent).await? {
            debug!(parent_id = %parent.id, reason = %reason, "Skipping parent");
            return Ok(ReconcileReport::skipped(parent.id.clone(), reason));
        }

        let endpoint = parent
            .endpoint
            .clone()
            .ok_or_else(|| ReconcileError::NoEndpoint {
                parent_id: parent.id.clone(),
            })?;

        let live = match self.enumerator.list_live_children(&endpoint).await {
            Ok(live) => live,
            Err(source) => {
                audit!(
                    AuditCode::UnableToRetrieveChildren,
                    parent_id = %parent.id,
                    endpoint = %endpoint,
                    error = %source,
                    "Unable to retrieve children"
                );
                return Err(ReconcileError::Connectivity {
                    parent_id: parent.id.clone(),
                    source,
                });
            }
        };
        audit!(
            AuditCode::RetrievedChildren,
            parent_id = %parent.id,
            endpoint = %endpoint,
            count = live.len(),
            enumerator = self.enumerator.name(),
            "Retrieved live children"
        );

        let catalogued = self.catalogued_children(&parent.id).await?;

        // Only a pass that can complete creates the capability.
        let mut report = ReconcileReport::new(parent.id.clone());
        self.ensure_capability(parent, &mut report).await;

        let ChildDiff {
            to_delete,
            to_create,
            matched,
        } = diff(&live, catalogued);

        // Deletes go first so a name retired and reused can be recreated.
        for entry in &to_delete {
            self.delete_child(parent, entry, &mut report).await;
        }

        for name in &to_create {
            if let Some(child_id) = self.create_child(parent, name, &mut report).await {
                self.link_child(parent, &child_id, name, &mut report).await;
            }
        }

        for entry in &matched {
            self.link_child(parent, entry.id(), &entry.qualified_name, &mut report)
                .await;
        }

        info!(
            parent_id = %parent.id,
            created = report.created_count(),
            deleted = report.deleted_count(),
            linked = report.linked,
            failures = report.failures.len(),
            "Children reconciled"
        );

        Ok(report)
    }

    /// Re-reads the parent's record. Returns a reason when the parent is
    /// out of scope for this pass.
    async fn refresh_parent(
        &self,
        parent: &mut ParentSystem,
    ) -> Result<Option<String>, ReconcileError> {
        let record = self
            .catalog
            .get_parent(&parent.id)
            .await
            .map_err(|source| ReconcileError::Catalog {
                parent_id: parent.id.clone(),
                source,
            })?;

        let Some(record) = record else {
            audit!(
                AuditCode::UnknownParent,
                parent_id = %parent.id,
                "Monitored parent is no longer catalogued"
            );
            return Err(ReconcileError::UnknownParent {
                parent_id: parent.id.clone(),
            });
        };

        if let Some(expected) = &self.settings.platform_type
            && record.platform_type.as_deref() != Some(expected.as_str())
        {
            return Ok(Some(format!(
                "platform type {} is not {expected}",
                record.platform_type.as_deref().unwrap_or("unset")
            )));
        }

        parent.endpoint = self
            .settings
            .endpoint_override
            .clone()
            .or_else(|| record.primary_endpoint().map(str::to_string));
        parent.qualified_name = Some(record.qualified_name);
        parent.display_name = record.display_name;
        Ok(None)
    }

    async fn ensure_capability(&self, parent: &mut ParentSystem, report: &mut ReconcileReport) {
        if parent.capability_id.is_some() {
            return;
        }

        let parent_name = parent
            .qualified_name
            .clone()
            .unwrap_or_else(|| parent.id.to_string());
        let properties = capability_properties(&self.settings.capability, &parent_name);

        match self
            .catalog
            .create_capability(&parent.id, &properties)
            .await
        {
            Ok(capability_id) => {
                audit!(
                    AuditCode::CapabilityCreated,
                    parent_id = %parent.id,
                    capability_id = %capability_id,
                    name = %properties.qualified_name,
                    "Created capability"
                );
                parent.capability_id = Some(capability_id);
                report.capability_created = true;
            }
            Err(error) => {
                audit!(
                    AuditCode::ChildActionFailed,
                    parent_id = %parent.id,
                    action = %ChildAction::CreateCapability,
                    name = %properties.qualified_name,
                    error = %error,
                    "Unable to create capability"
                );
                report.fail(properties.qualified_name, ChildAction::CreateCapability, error);
            }
        }
    }

    /// Every child catalogued under `parent_id`, read before anything changes.
    async fn catalogued_children(
        &self,
        parent_id: &ElementId,
    ) -> Result<Vec<CatalogEntry>, ReconcileError> {
        let page_size = self.settings.page_size;
        let mut children = Vec::new();
        loop {
            let page = self
                .catalog
                .list_for_parent(parent_id, children.len(), page_size)
                .await
                .map_err(|source| ReconcileError::Catalog {
                    parent_id: parent_id.clone(),
                    source,
                })?;
            if page.is_empty() {
                break;
            }
            children.extend(page);
        }
        Ok(children)
    }

    async fn delete_child(
        &self,
        parent: &ParentSystem,
        entry: &CatalogEntry,
        report: &mut ReconcileReport,
    ) {
        match self.catalog.delete(entry.id(), &entry.qualified_name).await {
            Ok(()) => {
                audit!(
                    AuditCode::ChildDeleted,
                    parent_id = %parent.id,
                    child_id = %entry.id(),
                    name = %entry.qualified_name,
                    "Deleted stale child"
                );
                report.deleted.push(entry.qualified_name.clone());
            }
            Err(error) => {
                self.child_failed(parent, &entry.qualified_name, ChildAction::Delete, error, report);
            }
        }
    }

    async fn create_child(
        &self,
        parent: &ParentSystem,
        name: &str,
        report: &mut ReconcileReport,
    ) -> Option<ElementId> {
        let (action, result) = match &self.template_id {
            Some(template_id) => {
                let properties = TemplateProperties {
                    qualified_name: name.to_string(),
                    display_name: Some(name.to_string()),
                    parent_id: parent.id.clone(),
                };
                (
                    ChildAction::CreateFromTemplate,
                    self.catalog
                        .create_from_template(template_id, &properties)
                        .await,
                )
            }
            None => {
                let properties =
                    ChildProperties::named(&self.settings.child_type_name, name, parent.id.clone());
                (ChildAction::Create, self.catalog.create(&properties).await)
            }
        };

        match result {
            Ok(child_id) => {
                let code = match action {
                    ChildAction::CreateFromTemplate => AuditCode::ChildCreatedFromTemplate,
                    _ => AuditCode::ChildCreated,
                };
                audit!(
                    code,
                    parent_id = %parent.id,
                    child_id = %child_id,
                    name = %name,
                    "Created child"
                );
                report.created.push(name.to_string());
                Some(child_id)
            }
            Err(error) => {
                self.child_failed(parent, name, action, error, report);
                None
            }
        }
    }

    async fn link_child(
        &self,
        parent: &ParentSystem,
        child_id: &ElementId,
        name: &str,
        report: &mut ReconcileReport,
    ) {
        let Some(capability_id) = &parent.capability_id else {
            return;
        };
        match self
            .catalog
            .link_to_capability(capability_id, child_id, AssetUseType::Owns)
            .await
        {
            Ok(()) => report.linked += 1,
            Err(error) => self.child_failed(parent, name, ChildAction::Link, error, report),
        }
    }

    fn child_failed(
        &self,
        parent: &ParentSystem,
        name: &str,
        action: ChildAction,
        error: CatalogError,
        report: &mut ReconcileReport,
    ) {
        audit!(
            AuditCode::ChildActionFailed,
            parent_id = %parent.id,
            name = %name,
            action = %action,
            category = %error.category(),
            error = %error,
            "Child action failed"
        );
        report.fail(name, action, error);
    }
}
