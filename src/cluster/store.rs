//! Object store client abstraction.
//!
//! # Responsibilities
//! - Define the CRUD surface the controller needs from the cluster
//! - Provide typed helpers over the untyped `ClusterObject` results
//!
//! # Design Decisions
//! - Async trait object-safe so stores can be shared as `Arc<dyn ObjectStore>`
//! - `NotFound` is a distinct variant so callers can branch on it

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::cluster::objects::{ClusterObject, ConfigMap, ObjectKey, ObjectKind};

/// Errors returned by an object store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("{kind} '{key}' not found")]
    NotFound { kind: ObjectKind, key: ObjectKey },

    #[error("{kind} '{key}' already exists")]
    AlreadyExists { kind: ObjectKind, key: ObjectKey },

    #[error("expected {expected} but store returned {actual}")]
    UnexpectedKind {
        expected: ObjectKind,
        actual: ObjectKind,
    },

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD access to cluster objects.
///
/// `create` and `update` return the object as persisted, including any
/// fields the platform filled in.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, kind: ObjectKind, key: &ObjectKey) -> StoreResult<ClusterObject>;

    async fn create(&self, object: ClusterObject) -> StoreResult<ClusterObject>;

    async fn update(&self, object: ClusterObject) -> StoreResult<ClusterObject>;

    async fn delete(&self, kind: ObjectKind, key: &ObjectKey) -> StoreResult<()>;
}

#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    async fn get(&self, kind: ObjectKind, key: &ObjectKey) -> StoreResult<ClusterObject> {
        (**self).get(kind, key).await
    }

    async fn create(&self, object: ClusterObject) -> StoreResult<ClusterObject> {
        (**self).create(object).await
    }

    async fn update(&self, object: ClusterObject) -> StoreResult<ClusterObject> {
        (**self).update(object).await
    }

    async fn delete(&self, kind: ObjectKind, key: &ObjectKey) -> StoreResult<()> {
        (**self).delete(kind, key).await
    }
}

/// Fetch a `ConfigMap`, rejecting any other kind the store hands back.
pub async fn get_config_map<S>(store: &S, key: &ObjectKey) -> StoreResult<ConfigMap>
where
    S: ObjectStore + ?Sized,
{
    match store.get(ObjectKind::ConfigMap, key).await? {
        ClusterObject::ConfigMap(cm) => Ok(cm),
        other => Err(StoreError::UnexpectedKind {
            expected: ObjectKind::ConfigMap,
            actual: other.kind(),
        }),
    }
}
