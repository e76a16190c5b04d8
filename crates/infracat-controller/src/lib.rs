//! Catalog reconciliation controller.
//!
//! Keeps the children catalogued under each monitored parent system equal to
//! the children the parent reports itself:
//!
//! - [`ParentRegistry`] - deduplicated set of monitored parents
//! - [`Discovery`] / [`DiscoveryListener`] - feed the registry from a startup
//!   sweep and from element-change events
//! - [`Reconciler`] - one diff-and-apply pass for one parent
//! - [`CatalogController`] - lifecycle and the periodic refresh

#[macro_use]
mod audit;
mod capability;
mod controller;
mod discovery;
mod error;
pub mod reconcile;
mod registry;
mod settings;
mod template;

pub use audit::{AuditCode, AuditSeverity};
pub use capability::capability_properties;
pub use controller::{CatalogController, ParentPass, RefreshSchedule, RefreshSummary};
pub use discovery::{Discovery, DiscoveryListener, SweepSource};
pub use error::{ControllerError, ReconcileError, TemplateError};
pub use reconcile::{ChildAction, ChildDiff, ChildFailure, ReconcileReport, Reconciler, diff};
pub use registry::{MonitoredParent, ParentRegistry, ParentSystem};
pub use settings::{CapabilitySettings, ControllerSettings};
pub use template::resolve_template;
