//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the tracked ConfigMap's identity
//! - Get or create it through the direct client
//! - Discover the routing suffix when the platform routes
//! - Prime the shared `ConfigStore`
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and returned unchanged
//! - Steps run in order, never concurrently, before the watch loop starts
//! - Every store call runs under the configured request deadline

use std::sync::Arc;

use crate::cluster::{ObjectStore, PlatformCapabilities};
use crate::config::SyncSettings;
use crate::controller::bootstrap::get_or_create;
use crate::controller::enricher::fill_routing_suffix_if_necessary;
use crate::controller::{
    resolve_reference, ConfigEventFilter, ConfigReference, ConfigStore, EnvLookup,
    ResolvedReference, SyncResult,
};
use crate::observability::metrics;
use crate::resilience::TimedStore;

/// Result of a successful startup: the tracked identity and the primed cache.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    resolved: ResolvedReference,
    store: Arc<ConfigStore>,
    settings: SyncSettings,
}

impl ControllerConfig {
    pub fn reference(&self) -> &ConfigReference {
        &self.resolved.reference
    }

    pub fn explicitly_named(&self) -> bool {
        self.resolved.explicitly_named
    }

    /// Shared cache to hand to every reader.
    pub fn store(&self) -> Arc<ConfigStore> {
        self.store.clone()
    }

    /// Event filter bound to this configuration.
    ///
    /// `client` serves the defensive re-reads and gets the same deadline as
    /// the startup calls.
    pub fn event_filter<S>(&self, client: S) -> ConfigEventFilter<TimedStore<S>>
    where
        S: ObjectStore,
    {
        ConfigEventFilter::new(
            self.resolved.reference.clone(),
            self.store.clone(),
            Arc::new(TimedStore::new(client, self.settings.timeouts.request_timeout())),
        )
    }
}

/// Run the startup sequence for the controller configuration.
///
/// `direct` must bypass any watch cache.
pub async fn watch_controller_config<E, S>(
    env: &E,
    direct: S,
    capabilities: &dyn PlatformCapabilities,
    settings: &SyncSettings,
) -> SyncResult<ControllerConfig>
where
    E: EnvLookup,
    S: ObjectStore + 'static,
{
    metrics::describe_metrics();

    let resolved = resolve_reference(env)?;
    let direct = Arc::new(TimedStore::new(direct, settings.timeouts.request_timeout()));

    let mut config_map = get_or_create(direct.as_ref(), &resolved).await?;
    fill_routing_suffix_if_necessary(&direct, capabilities, &mut config_map).await?;

    let store = Arc::new(ConfigStore::from_config_map(&config_map));

    tracing::info!(
        name = %resolved.reference.name,
        namespace = %resolved.reference.namespace,
        explicitly_named = resolved.explicitly_named,
        "Controller configuration ready"
    );

    Ok(ControllerConfig {
        resolved,
        store,
        settings: settings.clone(),
    })
}
