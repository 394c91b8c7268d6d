//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap object store calls with a deadline
//! - Cancel operations cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors (`StoreError::Timeout`)
//! - Applied as a store decorator so every call site gets the same bound

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;

use crate::cluster::{ClusterObject, ObjectKey, ObjectKind, ObjectStore, StoreError, StoreResult};

/// Run `fut` with a deadline, mapping expiry to `StoreError::Timeout`.
pub async fn with_deadline<T, F>(deadline: Duration, operation: &'static str, fut: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                operation,
                timeout_ms = deadline.as_millis() as u64,
                "Store call exceeded deadline"
            );
            Err(StoreError::Timeout {
                operation,
                after: deadline,
            })
        }
    }
}

/// Object store decorator applying one deadline to every call.
#[derive(Debug, Clone)]
pub struct TimedStore<S> {
    inner: S,
    deadline: Duration,
}

impl<S> TimedStore<S> {
    pub fn new(inner: S, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: ObjectStore> ObjectStore for TimedStore<S> {
    async fn get(&self, kind: ObjectKind, key: &ObjectKey) -> StoreResult<ClusterObject> {
        with_deadline(self.deadline, "get", self.inner.get(kind, key)).await
    }

    async fn create(&self, object: ClusterObject) -> StoreResult<ClusterObject> {
        with_deadline(self.deadline, "create", self.inner.create(object)).await
    }

    async fn update(&self, object: ClusterObject) -> StoreResult<ClusterObject> {
        with_deadline(self.deadline, "update", self.inner.update(object)).await
    }

    async fn delete(&self, kind: ObjectKind, key: &ObjectKey) -> StoreResult<()> {
        with_deadline(self.deadline, "delete", self.inner.delete(kind, key)).await
    }
}
