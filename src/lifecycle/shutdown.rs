//! Shutdown coordination for config watch loops.
//!
//! # Responsibilities
//! - Spawn watch loops and keep their handles
//! - Signal every loop to stop, then wait for each within a grace period
//! - Abort loops that outlive the grace period
//!
//! # Design Decisions
//! - Stopping a loop never touches the cached configuration
//! - A loop that panicked is logged and does not stop the others from draining

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::cluster::ObjectStore;
use crate::lifecycle::watch::WatchLoop;

/// Owner of the running watch loops.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
    loops: Vec<JoinHandle<usize>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            loops: Vec::new(),
        }
    }

    /// Start `watch` on the current runtime and take ownership of it.
    pub fn spawn<S>(&mut self, watch: WatchLoop<S>)
    where
        S: ObjectStore + ?Sized + 'static,
    {
        self.loops.push(watch.spawn(self.tx.subscribe()));
    }

    /// Loops that have not exited yet.
    pub fn active_loops(&self) -> usize {
        self.loops.iter().filter(|handle| !handle.is_finished()).count()
    }

    /// Stop every loop and wait up to `grace` for each one.
    ///
    /// Returns the total number of events the loops handled.
    pub async fn drain(self, grace: Duration) -> usize {
        let _ = self.tx.send(());

        let mut handled = 0;
        for mut handle in self.loops {
            match tokio::time::timeout(grace, &mut handle).await {
                Ok(Ok(count)) => handled += count,
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "Config watch loop terminated abnormally");
                }
                Err(_) => {
                    tracing::warn!(
                        grace_ms = grace.as_millis() as u64,
                        "Config watch loop did not stop in time, aborting"
                    );
                    handle.abort();
                }
            }
        }

        tracing::info!(handled, "Config watch loops stopped");
        handled
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{ConfigMap, InMemoryStore, WatchEvent};
    use crate::controller::{ConfigEventFilter, ConfigReference, ConfigStore};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn watch_loop(
        config: Arc<ConfigStore>,
    ) -> (
        WatchLoop<InMemoryStore>,
        mpsc::UnboundedSender<WatchEvent>,
    ) {
        let filter = ConfigEventFilter::new(
            ConfigReference::new("ops", "cm"),
            config,
            Arc::new(InMemoryStore::new()),
        );
        let (tx, rx) = mpsc::unbounded_channel();
        (WatchLoop::new(filter, rx), tx)
    }

    #[tokio::test]
    async fn test_drain_stops_every_loop_and_sums_events() {
        let config = Arc::new(ConfigStore::new());
        let mut shutdown = Shutdown::new();

        let (first, first_tx) = watch_loop(config.clone());
        let (second, _second_tx) = watch_loop(config.clone());
        shutdown.spawn(first);
        shutdown.spawn(second);
        assert_eq!(shutdown.active_loops(), 2);

        first_tx
            .send(WatchEvent::Updated(
                ConfigMap::new("ops", "cm").with_entry("devworkspace.idle_timeout", "5m").into(),
            ))
            .unwrap();
        for _ in 0..50 {
            if config.workspace_idle_timeout() == "5m" {
                break;
            }
            tokio::task::yield_now().await;
        }

        let handled = shutdown.drain(Duration::from_secs(1)).await;
        assert_eq!(handled, 1);
        assert_eq!(config.workspace_idle_timeout(), "5m");
    }

    #[tokio::test]
    async fn test_drain_without_loops() {
        let shutdown = Shutdown::default();
        assert_eq!(shutdown.active_loops(), 0);
        assert_eq!(shutdown.drain(Duration::from_millis(10)).await, 0);
    }
}
