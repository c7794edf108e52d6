use std::future::Future;
use std::time::SystemTime;
use crate::content::RawContent;
use crate::error::BoxError;

/// Medium-specific access to one persisted resource.
///
/// Implementations decide where the bytes live (a file, a key in some store, ...).
/// [`LocalResource`](crate::resource::LocalResource) layers parsing and the
/// in-memory value on top of it.
///
/// # Contract
/// `last_modified` must return `None` exactly when `exists` returns `false`.
/// `read_raw` returns `Ok(None)` when nothing is stored.
/// `delete_underlying` on a missing resource is not an error.
pub trait StorageAdapter: Send + Sync {
    /// Path, key or other identifier of the persisted resource
    fn location(&self) -> &str;

    fn exists(&self) -> impl Future<Output = bool> + Send;

    fn last_modified(&self) -> impl Future<Output = Option<SystemTime>> + Send;

    fn read_raw(&self) -> impl Future<Output = Result<Option<RawContent>, BoxError>> + Send;

    /// Must not return before the content is persisted
    fn write_raw(&self, content: &RawContent) -> impl Future<Output = Result<(), BoxError>> + Send;

    fn delete_underlying(&self) -> impl Future<Output = Result<(), BoxError>> + Send;
}
