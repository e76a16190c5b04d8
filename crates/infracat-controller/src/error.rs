use infracat_catalog::CatalogError;
use infracat_core::ElementId;
use infracat_enumerator::EnumeratorError;

/// Failures that abort one reconciliation pass.
///
/// The parent stays registered; the next refresh tries again.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Unable to retrieve children of {parent_id}: {source}")]
    Connectivity {
        parent_id: ElementId,
        #[source]
        source: EnumeratorError,
    },

    #[error("Parent system {parent_id} is no longer catalogued")]
    UnknownParent { parent_id: ElementId },

    #[error("Parent system {parent_id} has no usable endpoint")]
    NoEndpoint { parent_id: ElementId },

    #[error("Unable to read catalog for {parent_id}: {source}")]
    Catalog {
        parent_id: ElementId,
        #[source]
        source: CatalogError,
    },
}

impl ReconcileError {
    pub fn parent_id(&self) -> &ElementId {
        match self {
            Self::Connectivity { parent_id, .. }
            | Self::UnknownParent { parent_id }
            | Self::NoEndpoint { parent_id }
            | Self::Catalog { parent_id, .. } => parent_id,
        }
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }
}

/// The configured template could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("No element is named {qualified_name}")]
    NotFound { qualified_name: String },

    #[error("Unable to look up {qualified_name}: {source}")]
    Lookup {
        qualified_name: String,
        #[source]
        source: CatalogError,
    },
}

/// Startup failures. They are reported, the controller keeps running.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("Controller already started")]
    AlreadyStarted,

    #[error("Startup sweep failed: {0}")]
    Sweep(#[from] CatalogError),
}
