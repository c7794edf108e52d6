use std::future::Future;
use crate::content::RawContent;
use crate::error::BoxError;

/// Remote data provider trait.
/// Data provider fetches the current raw content of a remote resource.
///
/// `Ok(None)` means "no content" and lets the resource fall back to its cache.
/// Errors are either treated the same way or propagated, depending on the
/// resource's [`FetchFailurePolicy`](crate::config::FetchFailurePolicy).
/// # Errors
/// Any error can be returned by custom implementation.
pub trait DataProvider: Send + Sync {
    /// Try to fetch content
    fn fetch_contents(&self) -> impl Future<Output = Result<Option<RawContent>, BoxError>> + Send;
}
