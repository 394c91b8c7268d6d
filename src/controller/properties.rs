//! Named properties of the controller ConfigMap.
//!
//! Each property either has a universal default (read through
//! `get_property_or_default`) or none, in which case absence is meaningful
//! and the accessor returns `Option`.

use crate::controller::store::ConfigStore;

/// Image pull policy applied to every sidecar container.
pub const SIDECAR_PULL_POLICY: &str = "devworkspace.sidecar.image_pull_policy";
pub const DEFAULT_SIDECAR_PULL_POLICY: &str = "Always";

/// PVC shared by all workspaces within a namespace.
pub const WORKSPACE_PVC_NAME: &str = "devworkspace.pvc.name";
pub const DEFAULT_WORKSPACE_PVC_NAME: &str = "claim-devworkspace";

/// Storage class for the workspace PVC; absent means the cluster default.
pub const WORKSPACE_PVC_STORAGE_CLASS_NAME: &str = "devworkspace.pvc.storage_class.name";

/// Routing class used when a workspace does not name one.
pub const ROUTING_CLASS: &str = "devworkspace.default_routing_class";
pub const DEFAULT_ROUTING_CLASS: &str = "basic";

/// Base domain for routes created on the cluster. Filled in by the enricher.
pub const ROUTING_SUFFIX: &str = "devworkspace.routing.cluster_host_suffix";

/// Enables experimental features. Only the literal `"true"` turns them on.
pub const EXPERIMENTAL_FEATURES_ENABLED: &str = "devworkspace.experimental_features_enabled";
pub const DEFAULT_EXPERIMENTAL_FEATURES_ENABLED: &str = "false";

/// Idle time after which a workspace is stopped.
pub const WORKSPACE_IDLE_TIMEOUT: &str = "devworkspace.idle_timeout";
pub const DEFAULT_WORKSPACE_IDLE_TIMEOUT: &str = "15m";

impl ConfigStore {
    pub fn workspace_pvc_name(&self) -> String {
        self.get_property_or_default(WORKSPACE_PVC_NAME, DEFAULT_WORKSPACE_PVC_NAME)
    }

    pub fn default_routing_class(&self) -> String {
        self.get_property_or_default(ROUTING_CLASS, DEFAULT_ROUTING_CLASS)
    }

    /// Whether experimental features are enabled.
    ///
    /// Do not turn this on in production: experimental features are not well
    /// tested and may be removed without announcement.
    pub fn experimental_features_enabled(&self) -> bool {
        self.get_property_or_default(
            EXPERIMENTAL_FEATURES_ENABLED,
            DEFAULT_EXPERIMENTAL_FEATURES_ENABLED,
        ) == "true"
    }

    pub fn pvc_storage_class_name(&self) -> Option<String> {
        self.get_property(WORKSPACE_PVC_STORAGE_CLASS_NAME)
    }

    pub fn sidecar_pull_policy(&self) -> String {
        self.get_property_or_default(SIDECAR_PULL_POLICY, DEFAULT_SIDECAR_PULL_POLICY)
    }

    pub fn workspace_idle_timeout(&self) -> String {
        self.get_property_or_default(WORKSPACE_IDLE_TIMEOUT, DEFAULT_WORKSPACE_IDLE_TIMEOUT)
    }

    pub fn routing_suffix(&self) -> Option<String> {
        self.get_property(ROUTING_SUFFIX)
    }
}
