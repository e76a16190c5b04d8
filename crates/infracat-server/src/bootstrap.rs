//! Wiring of the catalog, enumerator and controller from configuration.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use infracat_catalog::EventedCatalog;
use infracat_catalog_memory::{CatalogSeed, InMemoryCatalog};
use infracat_controller::{CatalogController, RefreshSchedule};
use infracat_core::ElementEventBroadcaster;
use infracat_enumerator::{DynEnumerator, RestProxyEnumerator, StaticEnumerator};
use serde::Deserialize;
use tracing::info;

use crate::config::{AppConfig, EnumeratorKind};

/// Seed file: catalog contents plus the live children the static
/// enumerator reports per endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DemoSeed {
    #[serde(flatten)]
    pub catalog: CatalogSeed,
    #[serde(default)]
    pub live: BTreeMap<String, Vec<String>>,
    /// Endpoints the static enumerator cannot reach.
    #[serde(default)]
    pub unreachable: Vec<String>,
}

impl DemoSeed {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing seed file {}", path.display()))
    }
}

/// Everything a command needs to drive the controller.
pub struct Runtime {
    pub controller: Arc<CatalogController>,
    pub catalog: Arc<EventedCatalog<InMemoryCatalog>>,
    pub schedule: RefreshSchedule,
}

pub async fn build_runtime(cfg: &AppConfig) -> anyhow::Result<Runtime> {
    let settings = cfg.controller_settings().map_err(anyhow::Error::msg)?;

    let seed = match &cfg.seed.path {
        Some(path) => DemoSeed::load(Path::new(path))?,
        None => DemoSeed::default(),
    };

    let memory = InMemoryCatalog::new();
    let seeded = seed.catalog.apply(&memory);
    info!(elements = seeded, "Seeded in-memory catalog");

    let broadcaster = ElementEventBroadcaster::new_shared();
    let catalog = Arc::new(EventedCatalog::new(memory, broadcaster.clone()));
    let enumerator = build_enumerator(cfg, &seed).await?;

    let controller = CatalogController::new(settings, catalog.clone(), enumerator)
        .with_events(broadcaster);

    Ok(Runtime {
        controller: Arc::new(controller),
        catalog,
        schedule: cfg.refresh_schedule(),
    })
}

async fn build_enumerator(cfg: &AppConfig, seed: &DemoSeed) -> anyhow::Result<DynEnumerator> {
    match cfg.enumerator.kind {
        EnumeratorKind::Static => {
            let enumerator = StaticEnumerator::new();
            for (endpoint, names) in &seed.live {
                enumerator.set_children(endpoint, names.iter().cloned()).await;
            }
            for endpoint in &seed.unreachable {
                enumerator.mark_unreachable(endpoint).await;
            }
            Ok(Arc::new(enumerator))
        }
        EnumeratorKind::RestProxy => {
            let enumerator = RestProxyEnumerator::new(cfg.rest_proxy_config())
                .context("building REST proxy client")?;
            Ok(Arc::new(enumerator))
        }
    }
}
