//! Controller configuration synchronization.
//!
//! # Data Flow
//! ```text
//! Startup (lifecycle::startup):
//!     reference.rs (env → ConfigReference)
//!     → bootstrap.rs (direct get, or create default)
//!     → enricher.rs (routing suffix probe, when the platform routes)
//!     → store.rs (ConfigStore primed)
//!
//! Steady state (lifecycle::watch):
//!     WatchEvent → events.rs (identity match) → ConfigStore::update
//!
//! Readers:
//!     any subsystem → properties.rs accessors → current snapshot
//! ```

pub mod bootstrap;
pub mod enricher;
pub mod error;
pub mod events;
pub mod properties;
pub mod reference;
pub mod store;

pub use error::{SyncError, SyncResult};
pub use events::ConfigEventFilter;
pub use reference::{resolve_reference, ConfigReference, EnvLookup, ProcessEnv, ResolvedReference};
pub use store::{ConfigSnapshot, ConfigStore};
