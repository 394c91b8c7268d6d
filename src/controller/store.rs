//! In-memory cache of the tracked ConfigMap.
//!
//! # Responsibilities
//! - Hold the last synchronized property bag
//! - Answer presence-aware and default-falling-back lookups
//!
//! # Design Decisions
//! - Snapshots are immutable; `update` swaps the whole `Arc` atomically, so
//!   readers see either the old or the new bag, never a mix
//! - Before the first sync there is no snapshot and every lookup falls back
//! - Nothing ever clears the snapshot; the last known value wins

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::cluster::{ConfigMap, ObjectKey};
use crate::config::validation::{validate_properties, ValidationError, PROPERTY_CHECKS};
use crate::observability::metrics;

/// One immutable version of the tracked ConfigMap's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSnapshot {
    source: ObjectKey,
    data: BTreeMap<String, String>,
}

impl ConfigSnapshot {
    pub fn new(source: ObjectKey, data: BTreeMap<String, String>) -> Self {
        Self { source, data }
    }

    pub fn from_config_map(cm: &ConfigMap) -> Self {
        Self::new(cm.metadata.key(), cm.data.clone())
    }

    /// Object this snapshot was read from.
    pub fn source(&self) -> &ObjectKey {
        &self.source
    }

    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.data.get(name).map(String::as_str)
    }
}

/// Shared cache of the controller configuration.
///
/// Construct once and share through `Arc`.
#[derive(Debug, Default)]
pub struct ConfigStore {
    current: ArcSwapOption<ConfigSnapshot>,
}

impl ConfigStore {
    /// Create an empty store; every lookup falls back until the first update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store primed from `cm`.
    pub fn from_config_map(cm: &ConfigMap) -> Self {
        let store = Self::new();
        store.update_from_config_map(cm);
        store
    }

    /// Replace the cached snapshot.
    pub fn update(&self, snapshot: ConfigSnapshot) {
        tracing::info!(
            name = %snapshot.source.name,
            namespace = %snapshot.source.namespace,
            properties = snapshot.data.len(),
            "Updating the configuration from config map"
        );
        metrics::record_config_update(&snapshot.source.namespace, &snapshot.source.name);
        self.current.store(Some(Arc::new(snapshot)));
    }

    pub fn update_from_config_map(&self, cm: &ConfigMap) {
        self.update(ConfigSnapshot::from_config_map(cm));
    }

    /// The current snapshot, for reading several keys from one version.
    pub fn snapshot(&self) -> Option<Arc<ConfigSnapshot>> {
        self.current.load_full()
    }

    /// Stored value of `name`, including an empty one, or `None` when absent.
    pub fn get_property(&self, name: &str) -> Option<String> {
        self.snapshot()
            .and_then(|snapshot| snapshot.get(name).map(str::to_owned))
    }

    /// Stored value of `name`, or `default` when absent.
    pub fn get_property_or_default(&self, name: &str, default: &str) -> String {
        self.get_property(name)
            .unwrap_or_else(|| default.to_string())
    }

    /// Run the registered property checks against the current snapshot.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        match self.snapshot() {
            Some(snapshot) => validate_properties(snapshot.data(), PROPERTY_CHECKS),
            None => Ok(()),
        }
    }
}
