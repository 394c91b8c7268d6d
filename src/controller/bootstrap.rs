//! Get-or-create of the tracked ConfigMap.
//!
//! # Responsibilities
//! - Read the ConfigMap through the direct (uncached) client
//! - Create a labelled, empty default when auto-creation is allowed
//!
//! # Design Decisions
//! - An explicitly named ConfigMap is never substituted: a miss is fatal
//! - An existing ConfigMap is returned untouched, so repeated runs are no-ops
//! - Store errors other than not-found are propagated unchanged

use std::collections::BTreeMap;

use crate::cluster::{get_config_map, ClusterObject, ConfigMap, ObjectMeta, ObjectStore};
use crate::controller::error::{SyncError, SyncResult};
use crate::controller::reference::{ConfigReference, ResolvedReference};

/// Labels applied to every object the controller creates.
pub fn controller_app_labels() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "app.kubernetes.io/name".to_string(),
            "devworkspace-controller".to_string(),
        ),
        (
            "app.kubernetes.io/part-of".to_string(),
            "devworkspace-operator".to_string(),
        ),
    ])
}

/// The ConfigMap created when none exists and auto-creation is allowed.
pub fn default_config_map(reference: &ConfigReference) -> ConfigMap {
    ConfigMap {
        metadata: ObjectMeta {
            name: reference.name.clone(),
            namespace: reference.namespace.clone(),
            labels: controller_app_labels(),
        },
        data: BTreeMap::new(),
    }
}

/// Return the tracked ConfigMap, creating a default one if allowed.
///
/// `store` must be the direct client: a watch cache may not be warm yet.
pub async fn get_or_create<S>(store: &S, resolved: &ResolvedReference) -> SyncResult<ConfigMap>
where
    S: ObjectStore + ?Sized,
{
    let reference = &resolved.reference;
    let key = reference.key();

    tracing::info!(
        name = %reference.name,
        namespace = %reference.namespace,
        "Searching for config map"
    );

    match get_config_map(store, &key).await {
        Ok(cm) => {
            tracing::info!(
                name = %cm.metadata.name,
                namespace = %cm.metadata.namespace,
                "Found config map"
            );
            Ok(cm)
        }
        Err(err) if err.is_not_found() => {
            if resolved.explicitly_named {
                return Err(SyncError::ObjectNotFoundAndCreateDisallowed { key });
            }

            let default = default_config_map(reference);
            let created = store
                .create(ClusterObject::ConfigMap(default.clone()))
                .await
                .map_err(|source| SyncError::CreateFailed {
                    key: key.clone(),
                    source,
                })?;

            tracing::info!(
                name = %reference.name,
                namespace = %reference.namespace,
                "Created config map"
            );
            Ok(created.into_config_map().unwrap_or(default))
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{InMemoryStore, ObjectKind, Operation, StoreError};

    fn resolved(explicit: bool) -> ResolvedReference {
        ResolvedReference {
            reference: ConfigReference::new("ops", "controller-config"),
            explicitly_named: explicit,
        }
    }

    #[tokio::test]
    async fn test_existing_config_map_is_returned_unchanged() {
        let store = InMemoryStore::new();
        let existing = ConfigMap::new("ops", "controller-config").with_entry("k", "v");
        store.seed(existing.clone());

        let cm = get_or_create(&store, &resolved(true)).await.unwrap();
        assert_eq!(cm, existing);
        assert_eq!(store.call_count(Operation::Create, ObjectKind::ConfigMap), 0);
    }

    #[tokio::test]
    async fn test_explicit_miss_never_creates() {
        let store = InMemoryStore::new();

        let err = get_or_create(&store, &resolved(true)).await.unwrap_err();
        assert!(matches!(err, SyncError::ObjectNotFoundAndCreateDisallowed { .. }));
        assert!(store.is_empty());
        assert_eq!(store.call_count(Operation::Create, ObjectKind::ConfigMap), 0);
    }

    #[tokio::test]
    async fn test_default_is_created_when_allowed() {
        let store = InMemoryStore::new();

        let cm = get_or_create(&store, &resolved(false)).await.unwrap();
        assert_eq!(cm.metadata.name, "controller-config");
        assert_eq!(cm.metadata.namespace, "ops");
        assert_eq!(cm.metadata.labels, controller_app_labels());
        assert!(cm.data.is_empty());
        assert!(store.contains(ObjectKind::ConfigMap, &cm.metadata.key()));
    }

    #[tokio::test]
    async fn test_bootstrap_twice_is_idempotent() {
        let store = InMemoryStore::new();

        let first = get_or_create(&store, &resolved(false)).await.unwrap();
        let mut stored = first.clone();
        stored.data.insert("devworkspace.idle_timeout".into(), "30m".into());
        store.seed(stored.clone());

        let second = get_or_create(&store, &resolved(false)).await.unwrap();
        assert_eq!(second.metadata, first.metadata);
        assert_eq!(second, stored);
        assert_eq!(store.call_count(Operation::Create, ObjectKind::ConfigMap), 1);
    }

    #[tokio::test]
    async fn test_create_failure_is_reported() {
        let store = InMemoryStore::new();
        store.inject_failure(Operation::Create, ObjectKind::ConfigMap, "forbidden");

        let err = get_or_create(&store, &resolved(false)).await.unwrap_err();
        match err {
            SyncError::CreateFailed { key, source } => {
                assert_eq!(key.name, "controller-config");
                assert!(matches!(source, StoreError::Backend(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_other_read_errors_propagate_unchanged() {
        let store = InMemoryStore::new();
        store.inject_failure(Operation::Get, ObjectKind::ConfigMap, "unauthorized");

        let err = get_or_create(&store, &resolved(false)).await.unwrap_err();
        assert!(matches!(err, SyncError::Store(StoreError::Backend(ref msg)) if msg == "unauthorized"));
        assert_eq!(store.call_count(Operation::Create, ObjectKind::ConfigMap), 0);
    }
}
