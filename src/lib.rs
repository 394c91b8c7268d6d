//! Controller configuration sync.
//!
//! Keeps one cluster-resident ConfigMap cached in process memory for the
//! rest of a controller to read.
//!
//! # Architecture Overview
//!
//! ```text
//!   env ──▶ controller::reference ──▶ lifecycle::startup ──▶ Arc<ConfigStore> ◀── readers
//!                                       │  bootstrap             ▲
//!                                       │  enricher              │ update
//!                                       ▼                        │
//!                             cluster::ObjectStore ──WatchEvent──▶ lifecycle::watch
//!                             (wrapped by resilience::TimedStore)  └─ controller::events
//! ```

// Core subsystems
pub mod cluster;
pub mod config;
pub mod controller;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::SyncSettings;
pub use controller::{ConfigStore, SyncError};
pub use lifecycle::{watch_controller_config, ControllerConfig, Shutdown, WatchLoop};
