//! Settings for the configuration sync layer.
//!
//! # Data Flow
//! ```text
//! settings file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SyncSettings (validated, immutable)
//!     → deadlines (resilience) and log setup (observability)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the file may be omitted entirely
//! - Validation separates syntactic (serde) from semantic checks
//! - The property-check registry in validation.rs also serves the tracked
//!   ConfigMap (`ConfigStore::validate`)

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, load_settings_or_default, ConfigError};
pub use schema::{LogFormat, ObservabilityConfig, SyncSettings, TimeoutConfig};
pub use validation::ValidationError;
