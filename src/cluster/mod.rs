//! Cluster collaborators.
//!
//! # Data Flow
//! ```text
//! controller ──get/create/update/delete──▶ ObjectStore (trait)
//!                                            ├── InMemoryStore (dashmap)
//!                                            └── TimedStore (deadline wrapper, resilience)
//!
//! ObjectStore mutations ──WatchEvent──▶ lifecycle::watch ──▶ controller::events
//! ```
//!
//! # Design Decisions
//! - The real API client is an embedder concern; only the trait lives here
//! - Platform capability detection is a separate trait so tests can pin it

pub mod capabilities;
pub mod memory;
pub mod objects;
pub mod store;

pub use capabilities::{PlatformCapabilities, StaticCapabilities};
pub use memory::{InMemoryStore, Operation};
pub use objects::{
    ClusterObject, ConfigMap, ObjectKey, ObjectKind, ObjectMeta, Route, RouteSpec, RouteTarget,
    Unstructured, WatchEvent,
};
pub use store::{get_config_map, ObjectStore, StoreError, StoreResult};
