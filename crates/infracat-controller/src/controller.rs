//! Lifecycle of the catalog controller and its periodic refresh.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use infracat_catalog::DynCatalog;
use infracat_core::{ElementEventBroadcaster, ElementId};
use infracat_enumerator::DynEnumerator;
use tokio::sync::{Mutex, RwLock, Semaphore, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, warn};

use crate::audit::AuditCode;
use crate::discovery::{Discovery, DiscoveryListener, SweepSource};
use crate::error::{ControllerError, ReconcileError};
use crate::reconcile::{ReconcileReport, Reconciler};
use crate::registry::ParentRegistry;
use crate::settings::ControllerSettings;
use crate::template::resolve_template;

/// When the refresh loop fires.
#[derive(Debug, Clone, Copy)]
pub struct RefreshSchedule {
    pub interval: Duration,
    /// Run a refresh immediately instead of waiting one interval.
    pub run_on_start: bool,
}

/// The result of one parent's pass within a refresh.
#[derive(Debug)]
pub struct ParentPass {
    pub parent_id: ElementId,
    pub label: String,
    pub outcome: Result<ReconcileReport, ReconcileError>,
}

#[derive(Debug, Default)]
pub struct RefreshSummary {
    /// One entry per monitored parent, ordered by parent id.
    pub passes: Vec<ParentPass>,
}

impl RefreshSummary {
    pub fn created(&self) -> usize {
        self.reports().map(ReconcileReport::created_count).sum()
    }

    pub fn deleted(&self) -> usize {
        self.reports().map(ReconcileReport::deleted_count).sum()
    }

    pub fn child_failures(&self) -> usize {
        self.reports().map(|report| report.failures.len()).sum()
    }

    /// Passes that were aborted.
    pub fn failed_passes(&self) -> usize {
        self.passes.iter().filter(|pass| pass.outcome.is_err()).count()
    }

    fn reports(&self) -> impl Iterator<Item = &ReconcileReport> {
        self.passes.iter().filter_map(|pass| pass.outcome.as_ref().ok())
    }
}

/// Keeps the catalog in step with the live children of every monitored parent.
pub struct CatalogController {
    settings: Arc<ControllerSettings>,
    catalog: DynCatalog,
    enumerator: DynEnumerator,
    discovery: Discovery,
    events: Option<Arc<ElementEventBroadcaster>>,
    reconciler: RwLock<Arc<Reconciler>>,
    listener: Mutex<Option<JoinHandle<()>>>,
    started: AtomicBool,
}

impl CatalogController {
    pub fn new(
        settings: ControllerSettings,
        catalog: DynCatalog,
        enumerator: DynEnumerator,
    ) -> Self {
        let settings = Arc::new(settings);
        let registry = Arc::new(ParentRegistry::new(settings.parent_kinds.clone()));
        let reconciler = Reconciler::new(
            Arc::clone(&catalog),
            Arc::clone(&enumerator),
            Arc::clone(&settings),
        );
        Self {
            settings,
            catalog,
            enumerator,
            discovery: Discovery::new(registry),
            events: None,
            reconciler: RwLock::new(Arc::new(reconciler)),
            listener: Mutex::new(None),
            started: AtomicBool::new(false),
        }
    }

    /// Listens on `events` for newly catalogued parents once started.
    #[must_use]
    pub fn with_events(mut self, events: Arc<ElementEventBroadcaster>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn registry(&self) -> &Arc<ParentRegistry> {
        self.discovery.registry()
    }

    pub fn discovery(&self) -> &Discovery {
        &self.discovery
    }

    /// Resolves the template, starts the discovery listener and sweeps the
    /// catalog for parents. Returns the number of parents the sweep added.
    ///
    /// A missing template is not an error: children are then created directly.
    pub async fn start(&self) -> Result<usize, ControllerError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(ControllerError::AlreadyStarted);
        }

        let settings = &self.settings;
        audit!(
            AuditCode::ConnectorConfiguration,
            connector = %settings.connector_name,
            parent_kinds = ?settings.parent_kinds,
            platform_name = ?settings.platform_name,
            platform_type = ?settings.platform_type,
            template = ?settings.template_qualified_name,
            endpoint_override = ?settings.endpoint_override,
            enumerator = self.enumerator.name(),
            catalog = self.catalog.backend_name(),
            "Connector configuration"
        );

        let template_id = match &settings.template_qualified_name {
            Some(name) => match resolve_template(self.catalog.as_ref(), name).await {
                Ok(id) => Some(id),
                Err(e) => {
                    audit!(
                        AuditCode::MissingTemplate,
                        connector = %settings.connector_name,
                        template = %name,
                        error = %e,
                        "Template unavailable, children will be created directly"
                    );
                    None
                }
            },
            None => None,
        };
        let reconciler = Reconciler::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.enumerator),
            Arc::clone(&self.settings),
        )
        .with_template(template_id);
        *self.reconciler.write().await = Arc::new(reconciler);

        // Subscribe before sweeping so no parent falls between the two paths.
        if let Some(events) = &self.events {
            let source = SweepSource {
                catalog: Arc::clone(&self.catalog),
                name: settings.platform_name.clone(),
                page_size: settings.page_size,
            };
            let handle = DiscoveryListener::new(self.discovery.clone())
                .with_resync(source)
                .spawn(events.subscribe());
            *self.listener.lock().await = Some(handle);
        }

        let swept = self
            .discovery
            .sweep(
                self.catalog.as_ref(),
                settings.platform_name.as_deref(),
                settings.page_size,
            )
            .await;

        audit!(
            AuditCode::ConnectorStarted,
            connector = %settings.connector_name,
            monitored = self.registry().len(),
            "Connector started"
        );

        swept.map_err(ControllerError::from)
    }

    /// Runs one pass per monitored parent.
    ///
    /// Passes for different parents run concurrently up to
    /// `max_concurrent_passes`; failures are reported in the summary.
    pub async fn refresh(&self) -> RefreshSummary {
        let reconciler = Arc::clone(&*self.reconciler.read().await);
        let permits = Arc::new(Semaphore::new(self.settings.max_concurrent_passes.max(1)));
        let mut join_set = JoinSet::new();

        for parent in self.registry().snapshot() {
            let reconciler = Arc::clone(&reconciler);
            let permits = Arc::clone(&permits);
            join_set.spawn(async move {
                let _permit = permits.acquire().await;
                let outcome = reconciler.reconcile(&parent).await;
                let label = parent.snapshot().await.label().to_string();
                ParentPass {
                    parent_id: parent.id().clone(),
                    label,
                    outcome,
                }
            });
        }

        let mut passes = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(pass) => {
                    if let Err(e) = &pass.outcome {
                        warn!(parent_id = %pass.parent_id, error = %e, "Reconciliation pass aborted");
                    }
                    passes.push(pass);
                }
                Err(e) => error!(error = %e, "Reconciliation task failed"),
            }
        }
        passes.sort_by(|a, b| a.parent_id.cmp(&b.parent_id));

        RefreshSummary { passes }
    }

    /// Refreshes on `schedule` until `shutdown` turns true or its sender drops.
    ///
    /// A refresh in progress always completes before the loop stops.
    pub async fn run(&self, schedule: RefreshSchedule, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(schedule.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        if !schedule.run_on_start {
            ticker.tick().await;
        }

        info!(
            interval_secs = schedule.interval.as_secs(),
            "Refresh loop started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let summary = self.refresh().await;
                    info!(
                        parents = summary.passes.len(),
                        created = summary.created(),
                        deleted = summary.deleted(),
                        failed_passes = summary.failed_passes(),
                        child_failures = summary.child_failures(),
                        "Refresh complete"
                    );
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Refresh loop stopped");
    }

    /// Stops the discovery listener.
    pub async fn disconnect(&self) {
        audit!(
            AuditCode::ConnectorStopping,
            connector = %self.settings.connector_name,
            monitored = self.registry().len(),
            "Connector stopping"
        );
        if let Some(handle) = self.listener.lock().await.take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for CatalogController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogController")
            .field("connector", &self.settings.connector_name)
            .field("monitored", &self.registry().len())
            .finish_non_exhaustive()
    }
}
