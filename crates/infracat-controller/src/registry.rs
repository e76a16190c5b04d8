//! The deduplicated set of monitored parent systems.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use infracat_core::{ElementId, ElementType, ParentKind, ParentKindSet};
use tokio::sync::{Mutex, MutexGuard};

/// What the controller knows about one monitored parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentSystem {
    pub id: ElementId,
    pub type_name: String,
    pub kind: ParentKind,
    pub qualified_name: Option<String>,
    pub display_name: Option<String>,
    /// Address the live children are enumerated from.
    pub endpoint: Option<String>,
    /// Capability record scoping this parent's children, once created.
    pub capability_id: Option<ElementId>,
}

impl ParentSystem {
    fn new(id: ElementId, type_name: String, kind: ParentKind) -> Self {
        Self {
            id,
            type_name,
            kind,
            qualified_name: None,
            display_name: None,
            endpoint: None,
            capability_id: None,
        }
    }

    /// Display name, then qualified name, then id.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.qualified_name.as_deref())
            .unwrap_or(self.id.as_str())
    }
}

/// A registry entry.
///
/// The state sits behind an async mutex that a reconciliation pass holds
/// for its whole duration, so passes for the same parent never overlap.
#[derive(Debug)]
pub struct MonitoredParent {
    id: ElementId,
    kind: ParentKind,
    state: Mutex<ParentSystem>,
}

impl MonitoredParent {
    fn new(id: ElementId, type_name: String, kind: ParentKind) -> Self {
        Self {
            id: id.clone(),
            kind,
            state: Mutex::new(ParentSystem::new(id, type_name, kind)),
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn kind(&self) -> ParentKind {
        self.kind
    }

    /// Exclusive access to the parent's state; waits for a running pass.
    pub async fn lock(&self) -> MutexGuard<'_, ParentSystem> {
        self.state.lock().await
    }

    pub async fn snapshot(&self) -> ParentSystem {
        self.state.lock().await.clone()
    }
}

/// Monitored parents keyed by element id.
///
/// Shared by `Arc` between the discovery paths and the refresh loop.
/// Parents are never removed.
#[derive(Debug)]
pub struct ParentRegistry {
    parents: DashMap<ElementId, Arc<MonitoredParent>>,
    kinds: ParentKindSet,
}

impl ParentRegistry {
    pub fn new(kinds: ParentKindSet) -> Self {
        Self {
            parents: DashMap::new(),
            kinds,
        }
    }

    pub fn kinds(&self) -> &ParentKindSet {
        &self.kinds
    }

    /// Starts monitoring `id` if its type is a monitored kind and it is not
    /// monitored already. Returns whether a new parent was added.
    ///
    /// Check and insert happen under the same shard lock, so concurrent
    /// registrations of one id add it exactly once.
    pub fn register(&self, id: &ElementId, element_type: &ElementType) -> bool {
        let Some(kind) = self.kinds.classify(element_type) else {
            return false;
        };

        match self.parents.entry(id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::new(MonitoredParent::new(
                    id.clone(),
                    element_type.type_name.clone(),
                    kind,
                )));
                true
            }
        }
    }

    pub fn get(&self, id: &ElementId) -> Option<Arc<MonitoredParent>> {
        self.parents.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.parents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Every monitored parent, ordered by id.
    pub fn snapshot(&self) -> Vec<Arc<MonitoredParent>> {
        let mut parents: Vec<_> = self
            .parents
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        parents.sort_by(|a, b| a.id().cmp(b.id()));
        parents
    }
}
