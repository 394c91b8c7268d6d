//! Cluster object model.
//!
//! Only the kinds this crate touches are modelled: the tracked `ConfigMap`,
//! the probe `Route`, and a partially-typed `Unstructured` payload for
//! notifications that arrive without a decoded body.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Object kinds known to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    ConfigMap,
    Route,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigMap => write!(f, "ConfigMap"),
            Self::Route => write!(f, "Route"),
        }
    }
}

/// Namespaced identity of an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Metadata shared by every object kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            labels: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(self.namespace.clone(), self.name.clone())
    }
}

/// String-to-string property bag stored in the cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMap {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl ConfigMap {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta::new(namespace, name),
            data: BTreeMap::new(),
        }
    }

    /// Builder-style helper for seeding data.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// Route exposing a service on an externally visible host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub metadata: ObjectMeta,
    pub spec: RouteSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    /// Host assigned by the platform when left empty on create.
    #[serde(default)]
    pub host: String,
    pub to: RouteTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTarget {
    pub kind: String,
    pub name: String,
}

/// An object whose body was not decoded into a concrete type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unstructured {
    pub kind: ObjectKind,
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub body: serde_json::Value,
}

/// Any object the store can hold or deliver in a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClusterObject {
    ConfigMap(ConfigMap),
    Route(Route),
    Unstructured(Unstructured),
}

impl ClusterObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::ConfigMap(_) => ObjectKind::ConfigMap,
            Self::Route(_) => ObjectKind::Route,
            Self::Unstructured(u) => u.kind,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Self::ConfigMap(cm) => &cm.metadata,
            Self::Route(route) => &route.metadata,
            Self::Unstructured(u) => &u.metadata,
        }
    }

    pub fn key(&self) -> ObjectKey {
        self.metadata().key()
    }

    pub fn into_config_map(self) -> Option<ConfigMap> {
        match self {
            Self::ConfigMap(cm) => Some(cm),
            _ => None,
        }
    }

    pub fn into_route(self) -> Option<Route> {
        match self {
            Self::Route(route) => Some(route),
            _ => None,
        }
    }
}

impl From<ConfigMap> for ClusterObject {
    fn from(cm: ConfigMap) -> Self {
        Self::ConfigMap(cm)
    }
}

impl From<Route> for ClusterObject {
    fn from(route: Route) -> Self {
        Self::Route(route)
    }
}

/// A change notification delivered by the watch subsystem.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    Created(ClusterObject),
    Updated(ClusterObject),
    Deleted(ClusterObject),
    Other(ClusterObject),
}

impl WatchEvent {
    pub fn object(&self) -> &ClusterObject {
        match self {
            Self::Created(obj) | Self::Updated(obj) | Self::Deleted(obj) | Self::Other(obj) => obj,
        }
    }
}
