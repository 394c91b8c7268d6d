//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::time::Duration;

use controller_config::cluster::ConfigMap;
use controller_config::config::ObservabilityConfig;
use controller_config::controller::reference::{
    CONFIG_MAP_NAMESPACE_ENV_VAR, CONFIG_MAP_NAME_ENV_VAR,
};
use controller_config::observability::init_logging;

pub const NAMESPACE: &str = "mynamespace";

/// Install a test subscriber once; later calls are ignored.
pub fn init_tracing() {
    let _ = init_logging(&ObservabilityConfig {
        log_level: "debug".into(),
        ..ObservabilityConfig::default()
    });
}

/// Environment with only the namespace override set.
pub fn namespace_only_env() -> HashMap<String, String> {
    HashMap::from([(CONFIG_MAP_NAMESPACE_ENV_VAR.to_string(), NAMESPACE.to_string())])
}

/// Environment with both overrides set.
#[allow(dead_code)]
pub fn fully_named_env(name: &str) -> HashMap<String, String> {
    let mut env = namespace_only_env();
    env.insert(CONFIG_MAP_NAME_ENV_VAR.to_string(), name.to_string());
    env
}

/// Poll `check` until it holds or `timeout` elapses.
#[allow(dead_code)]
pub async fn eventually<F>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    check()
}

#[allow(dead_code)]
pub fn config_map(name: &str, pairs: &[(&str, &str)]) -> ConfigMap {
    pairs
        .iter()
        .fold(ConfigMap::new(NAMESPACE, name), |cm, (k, v)| cm.with_entry(*k, *v))
}
