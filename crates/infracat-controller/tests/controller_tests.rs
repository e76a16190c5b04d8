mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{Call, RecordingCatalog, broker_properties, dyn_catalog, settings};
use infracat_catalog::{Catalog, CatalogEntry, DynCatalog, EventedCatalog};
use infracat_catalog_memory::InMemoryCatalog;
use infracat_controller::{
    CatalogController, ControllerError, ControllerSettings, RefreshSchedule,
};
use infracat_core::{ElementEventBroadcaster, ElementHeader, ElementType};
use infracat_enumerator::{DynEnumerator, StaticEnumerator};
use tokio::sync::watch;

async fn eventually<F: Fn() -> bool>(condition: F) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within 1s");
}

fn controller(
    catalog: DynCatalog,
    enumerator: &Arc<StaticEnumerator>,
    settings: ControllerSettings,
) -> CatalogController {
    let enumerator: DynEnumerator = enumerator.clone();
    CatalogController::new(settings, catalog, enumerator)
}

#[tokio::test]
async fn unresolved_template_falls_back_to_direct_creation() {
    let catalog = RecordingCatalog::new();
    catalog.seed_broker("kafka-1", "k1:9092").await;
    let live = Arc::new(StaticEnumerator::new());
    live.set_children("k1:9092", ["orders"]).await;
    let settings = ControllerSettings {
        template_qualified_name: Some("KafkaTopic:missing".into()),
        ..settings()
    };

    let controller = controller(dyn_catalog(&catalog), &live, settings);
    assert_eq!(controller.start().await.unwrap(), 1);

    let summary = controller.refresh().await;
    assert_eq!(summary.created(), 1);
    assert!(catalog.calls().contains(&Call::FindByName("KafkaTopic:missing".into())));
    assert_eq!(catalog.mutations(), vec![Call::Create("orders".into())]);
}

#[tokio::test]
async fn resolved_template_is_used_for_creation() {
    let catalog = RecordingCatalog::new();
    catalog.seed_broker("kafka-1", "k1:9092").await;
    catalog.inner.insert_entry(CatalogEntry {
        header: ElementHeader::new("tmpl", ElementType::new("KafkaTopic")),
        qualified_name: "KafkaTopic:template".into(),
        display_name: None,
        parent_id: None,
        additional_properties: Default::default(),
    });
    let live = Arc::new(StaticEnumerator::new());
    live.set_children("k1:9092", ["orders"]).await;
    let settings = ControllerSettings {
        template_qualified_name: Some("KafkaTopic:template".into()),
        ..settings()
    };

    let controller = controller(dyn_catalog(&catalog), &live, settings);
    controller.start().await.unwrap();
    controller.refresh().await;

    assert_eq!(
        catalog.mutations(),
        vec![Call::CreateFromTemplate("orders".into())]
    );
}

#[tokio::test]
async fn start_twice_is_rejected() {
    let catalog = RecordingCatalog::new();
    let live = Arc::new(StaticEnumerator::new());
    let controller = controller(dyn_catalog(&catalog), &live, settings());

    controller.start().await.unwrap();
    assert!(matches!(
        controller.start().await,
        Err(ControllerError::AlreadyStarted)
    ));
}

#[tokio::test]
async fn sweep_honours_platform_name() {
    let catalog = RecordingCatalog::new();
    catalog.seed_broker("kafka-1", "k1:9092").await;
    catalog.seed_broker("kafka-2", "k2:9092").await;
    let live = Arc::new(StaticEnumerator::new());
    let settings = ControllerSettings {
        platform_name: Some("kafka-2".into()),
        ..settings()
    };

    let controller = controller(dyn_catalog(&catalog), &live, settings);
    assert_eq!(controller.start().await.unwrap(), 1);
    assert_eq!(controller.registry().len(), 1);
}

#[tokio::test]
async fn one_unreachable_parent_does_not_block_the_others() {
    let catalog = RecordingCatalog::new();
    let up = catalog.seed_broker("kafka-up", "up:9092").await;
    let down = catalog.seed_broker("kafka-down", "down:9092").await;
    let live = Arc::new(StaticEnumerator::new());
    live.set_children("up:9092", ["a", "b"]).await;
    live.mark_unreachable("down:9092").await;

    let controller = controller(dyn_catalog(&catalog), &live, settings());
    assert_eq!(controller.start().await.unwrap(), 2);
    let summary = controller.refresh().await;

    assert_eq!(summary.passes.len(), 2);
    assert_eq!(summary.failed_passes(), 1);
    assert_eq!(summary.created(), 2);
    assert_eq!(catalog.names_under(&up).len(), 2);

    let failed = summary
        .passes
        .iter()
        .find(|pass| pass.parent_id == down)
        .unwrap();
    assert!(failed.outcome.as_ref().unwrap_err().is_connectivity());
    // The parent stays monitored.
    assert!(controller.registry().contains(&down));
}

#[tokio::test]
async fn parents_catalogued_after_start_are_discovered() {
    let broadcaster = ElementEventBroadcaster::new_shared();
    let evented = Arc::new(EventedCatalog::new(
        InMemoryCatalog::new(),
        broadcaster.clone(),
    ));
    let catalog: DynCatalog = evented.clone();
    let live = Arc::new(StaticEnumerator::new());
    live.set_children("late:9092", ["t1"]).await;

    let controller = controller(catalog, &live, settings()).with_events(broadcaster);
    assert_eq!(controller.start().await.unwrap(), 0);

    let late = evented
        .create_parent(&broker_properties("kafka-late", "late:9092"))
        .await
        .unwrap();
    eventually(|| controller.registry().contains(&late)).await;

    let summary = controller.refresh().await;
    assert_eq!(summary.created(), 1);
    assert_eq!(evented.inner().children_of(&late).len(), 1);

    controller.disconnect().await;
}

#[tokio::test]
async fn run_loop_refreshes_until_shutdown() {
    let catalog = RecordingCatalog::new();
    let broker = catalog.seed_broker("kafka-1", "k1:9092").await;
    let live = Arc::new(StaticEnumerator::new());
    live.set_children("k1:9092", ["a"]).await;

    let controller = Arc::new(controller(dyn_catalog(&catalog), &live, settings()));
    controller.start().await.unwrap();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let runner = Arc::clone(&controller);
    let handle = tokio::spawn(async move {
        runner
            .run(
                RefreshSchedule {
                    interval: Duration::from_secs(3600),
                    run_on_start: true,
                },
                shutdown_rx,
            )
            .await;
    });

    eventually(|| !catalog.names_under(&broker).is_empty()).await;
    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("run loop stops")
        .unwrap();
    controller.disconnect().await;
}
