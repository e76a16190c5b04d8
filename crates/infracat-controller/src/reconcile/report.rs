use std::fmt;

use infracat_catalog::CatalogError;
use infracat_core::ElementId;

/// The catalog call a child failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildAction {
    Create,
    CreateFromTemplate,
    Delete,
    Link,
    CreateCapability,
}

impl fmt::Display for ChildAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self {
            ChildAction::Create => "create",
            ChildAction::CreateFromTemplate => "create_from_template",
            ChildAction::Delete => "delete",
            ChildAction::Link => "link",
            ChildAction::CreateCapability => "create_capability",
        };
        f.write_str(action)
    }
}

/// One catalog call that failed during a pass. The pass carried on.
#[derive(Debug, Clone)]
pub struct ChildFailure {
    pub name: String,
    pub action: ChildAction,
    pub error: CatalogError,
}

/// Outcome of one reconciliation pass for one parent.
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    pub parent_id: ElementId,
    /// Names of the children created.
    pub created: Vec<String>,
    /// Names of the stale children deleted.
    pub deleted: Vec<String>,
    /// Children linked to the parent's capability.
    pub linked: usize,
    /// Whether this pass created the parent's capability.
    pub capability_created: bool,
    pub failures: Vec<ChildFailure>,
    /// Set when the pass did nothing because the parent is out of scope.
    pub skipped: Option<String>,
}

impl ReconcileReport {
    pub fn new(parent_id: ElementId) -> Self {
        Self {
            parent_id,
            created: Vec::new(),
            deleted: Vec::new(),
            linked: 0,
            capability_created: false,
            failures: Vec::new(),
            skipped: None,
        }
    }

    pub fn skipped(parent_id: ElementId, reason: impl Into<String>) -> Self {
        Self {
            skipped: Some(reason.into()),
            ..Self::new(parent_id)
        }
    }

    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }

    /// No child call failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn fail(&mut self, name: impl Into<String>, action: ChildAction, error: CatalogError) {
        self.failures.push(ChildFailure {
            name: name.into(),
            action,
            error,
        });
    }
}
