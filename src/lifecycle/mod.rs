//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolve reference → Get or create → Enrich → Prime ConfigStore
//!
//! Steady state (watch.rs):
//!     WatchEvent stream → ConfigEventFilter → ConfigStore
//!
//! Shutdown (shutdown.rs):
//!     spawn() loops → drain(grace) → loops exit or are aborted
//! ```
//!
//! # Design Decisions
//! - Ordered startup: nothing watches until the store is primed
//! - Watch loops own no state beyond their filter; stopping them never
//!   clears the cached configuration

pub mod shutdown;
pub mod startup;
pub mod watch;

pub use shutdown::Shutdown;
pub use startup::{watch_controller_config, ControllerConfig};
pub use watch::WatchLoop;
