//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to object store:
//!     → timeouts.rs (TimedStore enforces the request deadline)
//!     → On expiry: StoreError::Timeout, mapped by the caller to its error kind
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: startup failures are fatal, live re-fetch failures keep the
//!   last known configuration

pub mod timeouts;

pub use timeouts::{with_deadline, TimedStore};
