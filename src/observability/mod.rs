//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! bootstrap / enricher / store / event filter produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Structured fields (name, namespace) on every config event
//! - Library code only emits; subscriber and exporter are installed by the host

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
