//! Change-notification filter for the tracked ConfigMap.
//!
//! # Responsibilities
//! - Recognize notifications about the tracked object
//! - Refresh the `ConfigStore` from the payload, or re-read when the payload
//!   is not a decoded `ConfigMap`
//!
//! # Design Decisions
//! - Deletes and generic notifications are ignored: the last known
//!   configuration stays authoritative
//! - Re-read failures keep the previous snapshot and are only logged
//! - `handle` never asks for reconciliation; it always returns `false`

use std::sync::Arc;

use crate::cluster::{get_config_map, ClusterObject, ObjectStore, WatchEvent};
use crate::controller::error::SyncError;
use crate::controller::reference::ConfigReference;
use crate::controller::store::ConfigStore;
use crate::observability::metrics;

/// Observer keeping a `ConfigStore` in sync with watch notifications.
pub struct ConfigEventFilter<S: ?Sized> {
    reference: ConfigReference,
    config: Arc<ConfigStore>,
    client: Arc<S>,
}

impl<S: ?Sized> Clone for ConfigEventFilter<S> {
    fn clone(&self) -> Self {
        Self {
            reference: self.reference.clone(),
            config: self.config.clone(),
            client: self.client.clone(),
        }
    }
}

impl<S: ObjectStore + ?Sized> ConfigEventFilter<S> {
    /// `client` is used only for defensive re-reads.
    pub fn new(reference: ConfigReference, config: Arc<ConfigStore>, client: Arc<S>) -> Self {
        Self {
            reference,
            config,
            client,
        }
    }

    pub fn reference(&self) -> &ConfigReference {
        &self.reference
    }

    /// Process one notification. Always returns `false` (nothing to enqueue).
    pub async fn handle(&self, event: &WatchEvent) -> bool {
        match event {
            WatchEvent::Created(object) | WatchEvent::Updated(object) => {
                if self.reference.matches(object.metadata()) {
                    self.sync(object).await;
                }
            }
            WatchEvent::Deleted(_) | WatchEvent::Other(_) => {}
        }
        false
    }

    async fn sync(&self, object: &ClusterObject) {
        if let ClusterObject::ConfigMap(cm) = object {
            self.config.update_from_config_map(cm);
            return;
        }

        let key = self.reference.key();
        match get_config_map(self.client.as_ref(), &key).await {
            Ok(cm) => self.config.update_from_config_map(&cm),
            Err(source) => {
                let err = SyncError::RefetchFailed { key, source };
                tracing::error!(error = %err, "Keeping the last known controller configuration");
                metrics::record_refetch_failure();
            }
        }
    }
}
