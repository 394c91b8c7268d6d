//! In-process object store.
//!
//! Backs integration tests and embedders that have no cluster. Behaves like
//! the real API server for the parts the controller relies on: create
//! conflicts, not-found reads, platform-assigned route hosts, and change
//! notifications for every mutation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;

use crate::cluster::objects::{ClusterObject, ObjectKey, ObjectKind, WatchEvent};
use crate::cluster::store::{ObjectStore, StoreError, StoreResult};

/// Store operations, used for failure injection and call accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    Create,
    Update,
    Delete,
}

/// A thread-safe, `DashMap`-backed object store.
#[derive(Default)]
pub struct InMemoryStore {
    objects: DashMap<(ObjectKind, ObjectKey), ClusterObject>,
    /// Domain appended to route hosts assigned on create.
    routing_domain: Option<String>,
    failures: DashMap<(Operation, ObjectKind), String>,
    calls: DashMap<(Operation, ObjectKind), usize>,
    latency_ms: AtomicU64,
    subscribers: DashMap<u64, mpsc::UnboundedSender<WatchEvent>>,
    next_subscriber: AtomicU64,
}

impl InMemoryStore {
    /// Create an empty store whose platform assigns no route hosts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that assigns `<name>-<namespace>.<domain>` to
    /// routes created without a host.
    pub fn with_routing_domain(domain: impl Into<String>) -> Self {
        Self {
            routing_domain: Some(domain.into()),
            ..Self::default()
        }
    }

    /// Insert an object directly, without notifying subscribers.
    pub fn seed(&self, object: impl Into<ClusterObject>) {
        let object = object.into();
        self.objects.insert((object.kind(), object.key()), object);
    }

    pub fn contains(&self, kind: ObjectKind, key: &ObjectKey) -> bool {
        self.objects.contains_key(&(kind, key.clone()))
    }

    /// Read an object without going through the trait (no accounting).
    pub fn peek(&self, kind: ObjectKind, key: &ObjectKey) -> Option<ClusterObject> {
        self.objects.get(&(kind, key.clone())).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Make every `operation` on `kind` fail with a backend error.
    pub fn inject_failure(&self, operation: Operation, kind: ObjectKind, message: impl Into<String>) {
        self.failures.insert((operation, kind), message.into());
    }

    pub fn clear_failure(&self, operation: Operation, kind: ObjectKind) {
        self.failures.remove(&(operation, kind));
    }

    /// Delay every operation by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Number of times `operation` was invoked for `kind`.
    pub fn call_count(&self, operation: Operation, kind: ObjectKind) -> usize {
        self.calls
            .get(&(operation, kind))
            .map(|r| *r.value())
            .unwrap_or(0)
    }

    /// Subscribe to change notifications for every object in the store.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<WatchEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_subscriber.fetch_add(1, Ordering::Relaxed);
        self.subscribers.insert(id, tx);
        rx
    }

    /// Deliver an arbitrary notification to subscribers.
    pub fn publish(&self, event: WatchEvent) {
        self.subscribers.retain(|_, tx| tx.send(event.clone()).is_ok());
    }

    async fn enter(&self, operation: Operation, kind: ObjectKind) -> StoreResult<()> {
        *self.calls.entry((operation, kind)).or_insert(0) += 1;

        let latency = self.latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        match self.failures.get(&(operation, kind)) {
            Some(message) => Err(StoreError::Backend(message.value().clone())),
            None => Ok(()),
        }
    }

    fn assign_route_host(&self, object: &mut ClusterObject) {
        let (ClusterObject::Route(route), Some(domain)) = (object, &self.routing_domain) else {
            return;
        };
        if route.spec.host.is_empty() {
            route.spec.host = format!(
                "{}-{}.{}",
                route.metadata.name, route.metadata.namespace, domain
            );
        }
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn get(&self, kind: ObjectKind, key: &ObjectKey) -> StoreResult<ClusterObject> {
        self.enter(Operation::Get, kind).await?;
        self.peek(kind, key).ok_or_else(|| StoreError::NotFound {
            kind,
            key: key.clone(),
        })
    }

    async fn create(&self, mut object: ClusterObject) -> StoreResult<ClusterObject> {
        let kind = object.kind();
        self.enter(Operation::Create, kind).await?;

        let key = object.key();
        if self.contains(kind, &key) {
            return Err(StoreError::AlreadyExists { kind, key });
        }

        self.assign_route_host(&mut object);
        self.objects.insert((kind, key.clone()), object.clone());
        tracing::debug!(%kind, %key, "Object created");
        self.publish(WatchEvent::Created(object.clone()));
        Ok(object)
    }

    async fn update(&self, object: ClusterObject) -> StoreResult<ClusterObject> {
        let kind = object.kind();
        self.enter(Operation::Update, kind).await?;

        let key = object.key();
        match self.objects.get_mut(&(kind, key.clone())) {
            Some(mut slot) => *slot = object.clone(),
            None => return Err(StoreError::NotFound { kind, key }),
        }
        tracing::debug!(%kind, %key, "Object updated");
        self.publish(WatchEvent::Updated(object.clone()));
        Ok(object)
    }

    async fn delete(&self, kind: ObjectKind, key: &ObjectKey) -> StoreResult<()> {
        self.enter(Operation::Delete, kind).await?;

        let (_, removed) = self
            .objects
            .remove(&(kind, key.clone()))
            .ok_or_else(|| StoreError::NotFound {
                kind,
                key: key.clone(),
            })?;
        tracing::debug!(%kind, %key, "Object deleted");
        self.publish(WatchEvent::Deleted(removed));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::objects::{ConfigMap, ObjectMeta, Route};

    fn probe_route() -> Route {
        Route {
            metadata: ObjectMeta::new("ns", "probe"),
            ..Route::default()
        }
    }

    #[tokio::test]
    async fn test_crud_operations() {
        let store = InMemoryStore::new();
        let key = ObjectKey::new("ns", "cm");

        let err = store.get(ObjectKind::ConfigMap, &key).await.unwrap_err();
        assert!(err.is_not_found());

        store
            .create(ConfigMap::new("ns", "cm").with_entry("a", "1").into())
            .await
            .unwrap();
        let err = store.create(ConfigMap::new("ns", "cm").into()).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));

        store
            .update(ConfigMap::new("ns", "cm").with_entry("a", "2").into())
            .await
            .unwrap();
        let cm = store
            .get(ObjectKind::ConfigMap, &key)
            .await
            .unwrap()
            .into_config_map()
            .unwrap();
        assert_eq!(cm.data.get("a").map(String::as_str), Some("2"));

        store.delete(ObjectKind::ConfigMap, &key).await.unwrap();
        assert!(store.is_empty());
        assert!(store.delete(ObjectKind::ConfigMap, &key).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_route_host_assignment() {
        let store = InMemoryStore::with_routing_domain("apps.example.com");
        let created = store.create(probe_route().into()).await.unwrap();
        let route = created.into_route().unwrap();
        assert_eq!(route.spec.host, "probe-ns.apps.example.com");

        let plain = InMemoryStore::new();
        let created = plain.create(probe_route().into()).await.unwrap();
        assert!(created.into_route().unwrap().spec.host.is_empty());
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = InMemoryStore::new();
        store.inject_failure(Operation::Create, ObjectKind::Route, "quota exceeded");

        let err = store.create(probe_route().into()).await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        assert!(!store.contains(ObjectKind::Route, &ObjectKey::new("ns", "probe")));
        assert_eq!(store.call_count(Operation::Create, ObjectKind::Route), 1);

        store.clear_failure(Operation::Create, ObjectKind::Route);
        store.create(probe_route().into()).await.unwrap();
        assert_eq!(store.call_count(Operation::Create, ObjectKind::Route), 2);
    }

    #[tokio::test]
    async fn test_subscribers_receive_mutations() {
        let store = InMemoryStore::new();
        let mut events = store.subscribe();

        store.create(ConfigMap::new("ns", "cm").into()).await.unwrap();
        store
            .delete(ObjectKind::ConfigMap, &ObjectKey::new("ns", "cm"))
            .await
            .unwrap();

        assert!(matches!(events.recv().await, Some(WatchEvent::Created(_))));
        assert!(matches!(events.recv().await, Some(WatchEvent::Deleted(_))));
    }
}
