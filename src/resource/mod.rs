use std::future::Future;
use std::sync::Arc;
use crate::error::ResourceError;

/// Local resource, persisted through a storage adapter
pub mod local;
/// Network resource with a local cache copy
pub mod network;

pub use local::LocalResource;
pub use network::NetworkResource;

/// Anything that can produce the current value of a named resource.
///
/// Implemented by [`LocalResource`] and [`NetworkResource`], so callers can hold either.
pub trait Resource<T>: Send + Sync {
    /// Path, key or url identifying the resource
    fn location(&self) -> &str;

    /// Value held in memory, if any. Never performs I/O.
    fn current(&self) -> Option<Arc<T>>;

    /// Current value of the resource. `force_reload` bypasses the in-memory value.
    fn get(&self, force_reload: bool) -> impl Future<Output = Result<Option<Arc<T>>, ResourceError>> + Send;
}
