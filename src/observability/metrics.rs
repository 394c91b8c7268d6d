//! Metrics collection.
//!
//! # Metrics
//! - `controller_config_updates_total` (counter): snapshot replacements, by source object
//! - `controller_config_refetch_failures_total` (counter): failed re-reads during event handling
//! - `controller_config_probe_cleanup_failures_total` (counter): probe routes left behind
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the exporter belongs to the host process
//! - Low-overhead metric updates (atomic operations)

use metrics::{counter, describe_counter};

pub const CONFIG_UPDATES_TOTAL: &str = "controller_config_updates_total";
pub const REFETCH_FAILURES_TOTAL: &str = "controller_config_refetch_failures_total";
pub const PROBE_CLEANUP_FAILURES_TOTAL: &str = "controller_config_probe_cleanup_failures_total";

/// Register metric descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(
        CONFIG_UPDATES_TOTAL,
        "Number of times the cached controller configuration was replaced"
    );
    describe_counter!(
        REFETCH_FAILURES_TOTAL,
        "Number of failed re-reads of the controller ConfigMap during event handling"
    );
    describe_counter!(
        PROBE_CLEANUP_FAILURES_TOTAL,
        "Number of probe routes that could not be deleted"
    );
}

pub fn record_config_update(namespace: &str, name: &str) {
    counter!(
        CONFIG_UPDATES_TOTAL,
        "namespace" => namespace.to_string(),
        "name" => name.to_string()
    )
    .increment(1);
}

pub fn record_refetch_failure() {
    counter!(REFETCH_FAILURES_TOTAL).increment(1);
}

pub fn record_probe_cleanup_failure() {
    counter!(PROBE_CLEANUP_FAILURES_TOTAL).increment(1);
}
