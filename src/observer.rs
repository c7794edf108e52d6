use std::error::Error;
use std::sync::Arc;

/// Something a resource did while resolving a call.
///
/// Events carry borrowed data only and are emitted synchronously, in the
/// order the resource performs the corresponding steps.
#[derive(Debug, Clone, Copy)]
pub enum ResourceEvent<'a> {
    /// Value served from memory without any I/O
    MemoryHit { location: &'a str },
    /// Value (re)loaded from storage into memory
    Loaded { location: &'a str },
    /// Storage had nothing to load
    NotFound { location: &'a str },
    /// Raw content persisted and the in-memory value replaced
    Written { location: &'a str },
    /// In-memory value replaced without persisting
    ReplacedInMemory { location: &'a str },
    /// Persisted copy deleted and in-memory value cleared
    Deleted { location: &'a str },
    /// Network fetch is about to start
    FetchStarted { location: &'a str, reason: FetchReason },
    /// Fetch returned content
    FetchSucceeded { location: &'a str },
    /// Fetch returned no content. `error` is set when a fault was absorbed.
    FetchFailed { location: &'a str, error: Option<&'a (dyn Error + Send + Sync)> },
    /// Serving whatever the cache holds after a failed fetch
    FallingBackToCache { location: &'a str },
    /// Cache is fresh and the strategy does not require a fetch
    CacheFresh { location: &'a str },
}

/// Why a network resource decided to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchReason {
    Forced,
    NetworkFirst,
    Expired,
}

/// Receives [`ResourceEvent`]s. Any `Fn(&ResourceEvent)` closure is an observer.
pub trait ResourceObserver: Send + Sync {
    fn on_event(&self, event: &ResourceEvent<'_>);
}

impl<F> ResourceObserver for F
where
    F: Fn(&ResourceEvent<'_>) + Send + Sync,
{
    fn on_event(&self, event: &ResourceEvent<'_>) {
        self(event)
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ResourceObserver for NoopObserver {
    fn on_event(&self, _event: &ResourceEvent<'_>) {}
}

/// Observer that forwards events to `tracing`.
#[cfg(feature = "tracing")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

#[cfg(feature = "tracing")]
impl ResourceObserver for TracingObserver {
    fn on_event(&self, event: &ResourceEvent<'_>) {
        use tracing::{debug, trace, warn};

        match *event {
            ResourceEvent::MemoryHit { location } => trace!(location, "serving value from memory"),
            ResourceEvent::Loaded { location } => debug!(location, "loaded value from storage"),
            ResourceEvent::NotFound { location } => debug!(location, "nothing stored"),
            ResourceEvent::Written { location } => debug!(location, "persisted new content"),
            ResourceEvent::ReplacedInMemory { location } => {
                debug!(location, "replaced value in memory, skipped cache write")
            }
            ResourceEvent::Deleted { location } => debug!(location, "deleted stored content"),
            ResourceEvent::FetchStarted { location, reason } => debug!(location, ?reason, "fetching"),
            ResourceEvent::FetchSucceeded { location } => debug!(location, "fetch succeeded"),
            ResourceEvent::FetchFailed { location, error: Some(error) } => {
                warn!(location, error = %error, "fetch failed")
            }
            ResourceEvent::FetchFailed { location, error: None } => warn!(location, "fetch returned no content"),
            ResourceEvent::FallingBackToCache { location } => warn!(location, "falling back to cached value"),
            ResourceEvent::CacheFresh { location } => trace!(location, "cache is fresh, skipping fetch"),
        }
    }
}

/// Observer installed when none is given: [`TracingObserver`] with the `tracing` feature,
/// [`NoopObserver`] without it.
pub fn default_observer() -> Arc<dyn ResourceObserver> {
    #[cfg(feature = "tracing")]
    return Arc::new(TracingObserver);

    #[cfg(not(feature = "tracing"))]
    return Arc::new(NoopObserver);
}
