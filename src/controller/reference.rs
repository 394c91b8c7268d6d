//! Resolution of the tracked ConfigMap's identity.
//!
//! # Responsibilities
//! - Read the name and namespace overrides from the environment
//! - Default the name, require the namespace
//! - Record whether the identity was supplied explicitly
//!
//! # Design Decisions
//! - Pure function over an `EnvLookup`, no process-global state
//! - Present-but-empty variables count as absent

use std::collections::HashMap;

use crate::cluster::{ObjectKey, ObjectMeta};
use crate::controller::error::{SyncError, SyncResult};

pub const CONFIG_MAP_NAME_ENV_VAR: &str = "CONTROLLER_CONFIG_MAP_NAME";
pub const CONFIG_MAP_NAMESPACE_ENV_VAR: &str = "CONTROLLER_CONFIG_MAP_NAMESPACE";
pub const DEFAULT_CONFIG_MAP_NAME: &str = "devworkspace-controller-configmap";

/// Source of environment values.
pub trait EnvLookup {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvLookup for HashMap<&str, &str> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.to_string())
    }
}

/// Identity of the tracked ConfigMap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigReference {
    pub namespace: String,
    pub name: String,
}

impl ConfigReference {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(self.namespace.clone(), self.name.clone())
    }

    /// Whether `meta` identifies the tracked object.
    pub fn matches(&self, meta: &ObjectMeta) -> bool {
        meta.name == self.name && meta.namespace == self.namespace
    }
}

/// A resolved reference and the mode it was resolved in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReference {
    pub reference: ConfigReference,
    /// True when either override was supplied; disables auto-creation.
    pub explicitly_named: bool,
}

fn non_empty(env: &impl EnvLookup, key: &str) -> Option<String> {
    env.lookup(key).filter(|value| !value.is_empty())
}

/// Resolve the tracked ConfigMap's identity from `env`.
pub fn resolve_reference(env: &impl EnvLookup) -> SyncResult<ResolvedReference> {
    let name = non_empty(env, CONFIG_MAP_NAME_ENV_VAR);
    let namespace = non_empty(env, CONFIG_MAP_NAMESPACE_ENV_VAR);
    let explicitly_named = name.is_some() || namespace.is_some();

    let namespace = namespace.ok_or(SyncError::ReferenceUnresolved {
        env_var: CONFIG_MAP_NAMESPACE_ENV_VAR,
    })?;
    let name = name.unwrap_or_else(|| DEFAULT_CONFIG_MAP_NAME.to_string());

    Ok(ResolvedReference {
        reference: ConfigReference { namespace, name },
        explicitly_named,
    })
}
