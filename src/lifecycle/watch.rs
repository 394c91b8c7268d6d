//! Watch dispatch loop.
//!
//! Feeds change notifications to a `ConfigEventFilter` until the event
//! source closes or shutdown is triggered.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::cluster::{ObjectStore, WatchEvent};
use crate::controller::ConfigEventFilter;

pub struct WatchLoop<S: ?Sized> {
    filter: ConfigEventFilter<S>,
    events: mpsc::UnboundedReceiver<WatchEvent>,
}

impl<S: ObjectStore + ?Sized + 'static> WatchLoop<S> {
    pub fn new(filter: ConfigEventFilter<S>, events: mpsc::UnboundedReceiver<WatchEvent>) -> Self {
        Self { filter, events }
    }

    /// Process events until the source closes or shutdown fires.
    ///
    /// Returns the number of events handled.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> usize {
        let reference = self.filter.reference().clone();
        tracing::info!(
            name = %reference.name,
            namespace = %reference.namespace,
            "Config watch loop starting"
        );

        let mut handled = 0;
        loop {
            tokio::select! {
                event = self.events.recv() => {
                    let Some(event) = event else {
                        tracing::info!("Watch event source closed");
                        break;
                    };
                    self.filter.handle(&event).await;
                    handled += 1;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Config watch loop received shutdown signal, exiting loop");
                    break;
                }
            }
        }
        handled
    }

    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> JoinHandle<usize> {
        tokio::spawn(self.run(shutdown))
    }
}
