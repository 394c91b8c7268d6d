//! Error definitions for configuration sync.

use thiserror::Error;

use crate::cluster::{ObjectKey, StoreError};
use crate::config::ConfigError;

/// Errors raised while resolving, bootstrapping, enriching or refreshing the
/// controller configuration.
///
/// Everything except `RefetchFailed` is fatal at startup. `RefetchFailed` is
/// logged by the event filter and never returned upward.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The namespace of the tracked ConfigMap was not supplied.
    #[error("you should set the namespace of the controller config map through the '{env_var}' environment variable")]
    ReferenceUnresolved { env_var: &'static str },

    /// An explicitly named ConfigMap does not exist and must not be substituted.
    #[error("cannot find the '{}' ConfigMap in namespace '{}'", .key.name, .key.namespace)]
    ObjectNotFoundAndCreateDisallowed { key: ObjectKey },

    /// Creating the default ConfigMap failed.
    #[error("failed to create default ConfigMap '{key}': {source}")]
    CreateFailed {
        key: ObjectKey,
        #[source]
        source: StoreError,
    },

    /// Creating the routing probe failed.
    #[error("failed to create probe route '{key}': {source}")]
    ProbeFailed {
        key: ObjectKey,
        #[source]
        source: StoreError,
    },

    /// Persisting the derived routing suffix failed.
    #[error("failed to persist routing suffix to ConfigMap '{key}': {source}")]
    EnrichmentFailed {
        key: ObjectKey,
        #[source]
        source: StoreError,
    },

    /// Re-reading the ConfigMap during event handling failed.
    #[error("cannot re-read the '{}' ConfigMap in namespace '{}': {source}", .key.name, .key.namespace)]
    RefetchFailed {
        key: ObjectKey,
        #[source]
        source: StoreError,
    },

    /// Any other object store failure, propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("settings error: {0}")]
    Settings(#[from] ConfigError),
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
