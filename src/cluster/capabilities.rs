//! Platform capability detection.

/// Reports which optional platform features are available.
pub trait PlatformCapabilities: Send + Sync {
    /// Whether the platform assigns hosts to `Route` objects.
    fn routing_available(&self) -> bool;
}

/// Capabilities fixed at construction time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticCapabilities {
    routing: bool,
}

impl StaticCapabilities {
    pub fn new(routing: bool) -> Self {
        Self { routing }
    }

    /// Plain cluster without a routing layer.
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Cluster whose routing layer assigns `Route` hosts.
    pub fn with_routing() -> Self {
        Self::new(true)
    }
}

impl PlatformCapabilities for StaticCapabilities {
    fn routing_available(&self) -> bool {
        self.routing
    }
}
