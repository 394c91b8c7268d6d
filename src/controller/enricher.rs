//! Routing suffix discovery.
//!
//! # Responsibilities
//! - Create a throwaway probe `Route` and read the host the platform assigns
//! - Derive the cluster routing suffix from that host
//! - Persist the suffix into the tracked ConfigMap
//!
//! # Design Decisions
//! - Skipped entirely when the platform has no routing layer
//! - The probe is held by `ProbeGuard`: released with an awaited delete on
//!   every normal path, and deleted from `Drop` if the future is abandoned
//! - Probe deletion failures are logged, never returned
//! - An empty host leaves the suffix unset; no retry

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::cluster::{
    ClusterObject, ConfigMap, ObjectKey, ObjectKind, ObjectMeta, ObjectStore,
    PlatformCapabilities, Route, RouteSpec, RouteTarget,
};
use crate::controller::error::{SyncError, SyncResult};
use crate::controller::properties::ROUTING_SUFFIX;
use crate::observability::metrics;

/// Name of the probe route and of the service it points at.
pub const PROBE_ROUTE_NAME: &str = "devworkspace-controller-test-route";

/// Probe route in `namespace`, targeting a service that does not exist.
pub fn probe_route(namespace: &str) -> Route {
    Route {
        metadata: ObjectMeta::new(namespace, PROBE_ROUTE_NAME),
        spec: RouteSpec {
            host: String::new(),
            to: RouteTarget {
                kind: "Service".to_string(),
                name: PROBE_ROUTE_NAME.to_string(),
            },
        },
    }
}

/// Strip `"<probe-name>-<namespace>."` from an assigned host.
///
/// Returns `None` for an empty host.
pub fn derive_routing_suffix(host: &str, namespace: &str) -> Option<String> {
    if host.is_empty() {
        return None;
    }
    let prefix = format!("{}-{}.", PROBE_ROUTE_NAME, namespace);
    Some(host.strip_prefix(&prefix).unwrap_or(host).to_string())
}

/// Scoped ownership of a created probe route.
struct ProbeGuard<S: ObjectStore + ?Sized + 'static> {
    store: Arc<S>,
    key: ObjectKey,
    released: bool,
}

impl<S: ObjectStore + ?Sized + 'static> ProbeGuard<S> {
    /// Create `probe` and take ownership of it.
    async fn acquire(store: &Arc<S>, probe: Route) -> SyncResult<(Self, Route)> {
        let key = probe.metadata.key();
        let created = store
            .create(ClusterObject::Route(probe.clone()))
            .await
            .map_err(|source| SyncError::ProbeFailed {
                key: key.clone(),
                source,
            })?;
        let guard = Self {
            store: store.clone(),
            key,
            released: false,
        };
        Ok((guard, created.into_route().unwrap_or(probe)))
    }

    /// Delete the probe and wait for the result.
    ///
    /// Ownership is given up only once the delete has returned, so a
    /// release cancelled mid-flight still falls back to `Drop`.
    async fn release(mut self) {
        let result = self.store.delete(ObjectKind::Route, &self.key).await;
        self.released = true;
        if let Err(e) = result {
            tracing::warn!(route = %self.key, error = %e, "Failed to delete probe route");
            metrics::record_probe_cleanup_failure();
        }
    }
}

impl<S: ObjectStore + ?Sized + 'static> Drop for ProbeGuard<S> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let store = self.store.clone();
        let key = self.key.clone();
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = store.delete(ObjectKind::Route, &key).await {
                        tracing::warn!(route = %key, error = %e, "Failed to delete abandoned probe route");
                        metrics::record_probe_cleanup_failure();
                    }
                });
            }
            Err(_) => {
                tracing::warn!(route = %self.key, "No runtime to delete abandoned probe route");
                metrics::record_probe_cleanup_failure();
            }
        }
    }
}

/// Fill the routing suffix into `config_map` when the platform supports it.
///
/// The probe is deleted before the suffix is written back; the host is all
/// that is needed from it. On success `config_map` reflects what was
/// persisted.
pub async fn fill_routing_suffix_if_necessary<S>(
    store: &Arc<S>,
    capabilities: &dyn PlatformCapabilities,
    config_map: &mut ConfigMap,
) -> SyncResult<()>
where
    S: ObjectStore + ?Sized + 'static,
{
    if !capabilities.routing_available() {
        tracing::debug!("Routing layer not available, skipping routing suffix discovery");
        return Ok(());
    }

    let namespace = config_map.metadata.namespace.clone();
    let (probe, created) = ProbeGuard::acquire(store, probe_route(&namespace)).await?;

    probe.release().await;

    persist_routing_suffix(store.as_ref(), config_map, &created.spec.host).await
}

async fn persist_routing_suffix<S>(
    store: &S,
    config_map: &mut ConfigMap,
    host: &str,
) -> SyncResult<()>
where
    S: ObjectStore + ?Sized,
{
    let key = config_map.metadata.key();
    let Some(suffix) = derive_routing_suffix(host, &key.namespace) else {
        tracing::warn!(
            route = PROBE_ROUTE_NAME,
            namespace = %key.namespace,
            "Platform assigned no host to probe route, routing suffix left unset"
        );
        return Ok(());
    };

    tracing::info!(suffix = %suffix, "Discovered routing suffix");
    let mut updated = config_map.clone();
    updated.data.insert(ROUTING_SUFFIX.to_string(), suffix);

    let persisted = store
        .update(ClusterObject::ConfigMap(updated.clone()))
        .await
        .map_err(|source| SyncError::EnrichmentFailed { key, source })?;

    *config_map = persisted.into_config_map().unwrap_or(updated);
    Ok(())
}
