//! Steady-state tests: startup followed by a live watch loop.

use std::sync::Arc;
use std::time::Duration;

use controller_config::cluster::{
    ClusterObject, InMemoryStore, ObjectKey, ObjectKind, ObjectMeta, ObjectStore, Operation,
    StaticCapabilities, Unstructured, WatchEvent,
};
use controller_config::controller::reference::DEFAULT_CONFIG_MAP_NAME;
use controller_config::resilience::TimedStore;
use controller_config::{
    watch_controller_config, ConfigStore, ControllerConfig, Shutdown, SyncSettings, WatchLoop,
};

mod common;
use common::NAMESPACE;

const WAIT: Duration = Duration::from_secs(2);

struct Running {
    cluster: Arc<InMemoryStore>,
    config: ControllerConfig,
    store: Arc<ConfigStore>,
    shutdown: Shutdown,
}

async fn start(initial: &[(&str, &str)]) -> Running {
    common::init_tracing();
    let cluster = Arc::new(InMemoryStore::new());
    cluster.seed(common::config_map(DEFAULT_CONFIG_MAP_NAME, initial));

    let config = watch_controller_config(
        &common::namespace_only_env(),
        cluster.clone(),
        &StaticCapabilities::plain(),
        &SyncSettings::default(),
    )
    .await
    .unwrap();

    let mut shutdown = Shutdown::new();
    let filter = config.event_filter(cluster.clone());
    shutdown.spawn(WatchLoop::<TimedStore<Arc<InMemoryStore>>>::new(
        filter,
        cluster.subscribe(),
    ));

    Running {
        store: config.store(),
        cluster,
        config,
        shutdown,
    }
}

fn tracked_key() -> ObjectKey {
    ObjectKey::new(NAMESPACE, DEFAULT_CONFIG_MAP_NAME)
}

#[tokio::test]
async fn test_cluster_updates_reach_the_store() {
    let r = start(&[("devworkspace.sidecar.image_pull_policy", "IfNotPresent")]).await;
    assert_eq!(r.store.sidecar_pull_policy(), "IfNotPresent");

    r.cluster
        .update(
            common::config_map(
                DEFAULT_CONFIG_MAP_NAME,
                &[("devworkspace.sidecar.image_pull_policy", "Never")],
            )
            .into(),
        )
        .await
        .unwrap();

    let store = r.store.clone();
    assert!(common::eventually(WAIT, || store.sidecar_pull_policy() == "Never").await);
    assert_eq!(r.config.reference().namespace, NAMESPACE);

    r.shutdown.drain(WAIT).await;
}

/// Wait until every event published so far has been handled.
///
/// Publishes a partial notification for the tracked object while reads are
/// failing; its re-read attempt is the marker, and the failure keeps the
/// cache untouched.
async fn drain(r: &Running) {
    let reads = r.cluster.call_count(Operation::Get, ObjectKind::ConfigMap);
    r.cluster
        .inject_failure(Operation::Get, ObjectKind::ConfigMap, "drain marker");
    r.cluster.publish(WatchEvent::Other(ClusterObject::ConfigMap(
        common::config_map(DEFAULT_CONFIG_MAP_NAME, &[]),
    )));
    r.cluster.publish(WatchEvent::Updated(ClusterObject::Unstructured(Unstructured {
        kind: ObjectKind::ConfigMap,
        metadata: ObjectMeta::new(NAMESPACE, DEFAULT_CONFIG_MAP_NAME),
        body: serde_json::Value::Null,
    })));

    let cluster = r.cluster.clone();
    assert!(
        common::eventually(WAIT, || {
            cluster.call_count(Operation::Get, ObjectKind::ConfigMap) == reads + 1
        })
        .await
    );
    r.cluster.clear_failure(Operation::Get, ObjectKind::ConfigMap);
}

#[tokio::test]
async fn test_deletion_keeps_last_known_configuration() {
    let r = start(&[("devworkspace.default_routing_class", "web-terminal")]).await;
    let before = r.store.snapshot().unwrap();

    r.cluster
        .delete(ObjectKind::ConfigMap, &tracked_key())
        .await
        .unwrap();
    drain(&r).await;

    assert!(Arc::ptr_eq(&before, &r.store.snapshot().unwrap()));
    assert_eq!(r.store.default_routing_class(), "web-terminal");

    let handled = r.shutdown.drain(WAIT).await;
    assert_eq!(handled, 3);
}

#[tokio::test]
async fn test_recreated_config_map_replaces_cache() {
    let r = start(&[("devworkspace.pvc.name", "first")]).await;

    r.cluster
        .delete(ObjectKind::ConfigMap, &tracked_key())
        .await
        .unwrap();
    r.cluster
        .create(common::config_map(DEFAULT_CONFIG_MAP_NAME, &[("devworkspace.pvc.name", "second")]).into())
        .await
        .unwrap();

    let store = r.store.clone();
    assert!(common::eventually(WAIT, || store.workspace_pvc_name() == "second").await);

    r.shutdown.drain(WAIT).await;
}

#[tokio::test]
async fn test_partial_notification_triggers_refetch() {
    let r = start(&[]).await;
    r.cluster.seed(common::config_map(
        DEFAULT_CONFIG_MAP_NAME,
        &[("devworkspace.pvc.storage_class.name", "fast-ssd")],
    ));

    r.cluster.publish(WatchEvent::Updated(ClusterObject::Unstructured(Unstructured {
        kind: ObjectKind::ConfigMap,
        metadata: ObjectMeta::new(NAMESPACE, DEFAULT_CONFIG_MAP_NAME),
        body: serde_json::json!({}),
    })));

    let store = r.store.clone();
    assert!(
        common::eventually(WAIT, || store.pvc_storage_class_name().as_deref() == Some("fast-ssd"))
            .await
    );
    // one read at startup, one re-read for the partial notification
    assert_eq!(r.cluster.call_count(Operation::Get, ObjectKind::ConfigMap), 2);

    r.shutdown.drain(WAIT).await;
}

#[tokio::test]
async fn test_failed_refetch_keeps_serving_previous_values() {
    let r = start(&[("devworkspace.idle_timeout", "20m")]).await;
    r.cluster
        .inject_failure(Operation::Get, ObjectKind::ConfigMap, "apiserver unavailable");

    r.cluster.publish(WatchEvent::Updated(ClusterObject::Unstructured(Unstructured {
        kind: ObjectKind::ConfigMap,
        metadata: ObjectMeta::new(NAMESPACE, DEFAULT_CONFIG_MAP_NAME),
        body: serde_json::Value::Null,
    })));

    let cluster = r.cluster.clone();
    assert!(
        common::eventually(WAIT, || cluster.call_count(Operation::Get, ObjectKind::ConfigMap) == 2)
            .await
    );
    assert_eq!(r.store.workspace_idle_timeout(), "20m");

    r.shutdown.drain(WAIT).await;
}

#[tokio::test]
async fn test_unrelated_config_maps_are_ignored() {
    let r = start(&[("devworkspace.idle_timeout", "20m")]).await;
    let before = r.store.snapshot().unwrap();

    r.cluster
        .create(common::config_map("someone-else", &[("devworkspace.idle_timeout", "1m")]).into())
        .await
        .unwrap();
    r.cluster
        .update(common::config_map("someone-else", &[("devworkspace.idle_timeout", "2m")]).into())
        .await
        .unwrap();

    drain(&r).await;

    assert!(Arc::ptr_eq(&before, &r.store.snapshot().unwrap()));
    assert_eq!(r.store.workspace_idle_timeout(), "20m");

    r.shutdown.drain(WAIT).await;
}
