use std::sync::Arc;
use std::time::SystemTime;
use arc_swap::ArcSwapOption;
use crate::content::RawContent;
use crate::error::{ResourceError, StorageOperation};
use crate::observer::{default_observer, ResourceEvent, ResourceObserver};
use crate::parser::{Identity, NoPreParse, Parser, PreParser};
use crate::resource::Resource;
use crate::storage::StorageAdapter;

/// A resource persisted through a [`StorageAdapter`], with its parsed value kept in memory.
///
/// The in-memory value is only changed through [`get`](Self::get), [`write`](Self::write)
/// and [`delete`](Self::delete), which keep it consistent with storage:
/// content is parsed before anything is mutated, persisted before it becomes
/// visible in memory, and memory is only cleared once the persisted copy is gone.
pub struct LocalResource<T, S, P = Identity> {
    storage: S,
    pre_parser: Box<dyn PreParser>,
    parser: P,
    value: ArcSwapOption<T>,
    observer: Arc<dyn ResourceObserver>,
}

impl<S: StorageAdapter> LocalResource<RawContent, S, Identity> {
    /// Resource whose value is the raw stored content
    pub fn raw(storage: S) -> Self {
        Self::new(storage, Identity)
    }
}

impl<T, S, P> LocalResource<T, S, P>
where
    T: Send + Sync,
    S: StorageAdapter,
    P: Parser<T>,
{
    pub fn new(storage: S, parser: P) -> Self {
        LocalResource {
            storage,
            pre_parser: Box::new(NoPreParse),
            parser,
            value: ArcSwapOption::empty(),
            observer: default_observer(),
        }
    }

    /// Run `pre_parser` on raw content before it is handed to the parser
    pub fn with_pre_parser(mut self, pre_parser: impl PreParser + 'static) -> Self {
        self.pre_parser = Box::new(pre_parser);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ResourceObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn location(&self) -> &str {
        self.storage.location()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current in-memory value, without any I/O
    pub fn current(&self) -> Option<Arc<T>> {
        self.value.load_full()
    }

    pub async fn exists(&self) -> bool {
        self.storage.exists().await
    }

    pub async fn last_modified(&self) -> Option<SystemTime> {
        self.storage.last_modified().await
    }

    /// Returns the in-memory value, loading it from storage first if there is none
    /// or `force_reload` is set.
    ///
    /// Returns `None` if storage holds nothing. A forced reload that finds nothing
    /// also clears the in-memory value, since it no longer reflects storage.
    pub async fn get(&self, force_reload: bool) -> Result<Option<Arc<T>>, ResourceError> {
        if !force_reload {
            if let Some(value) = self.current() {
                self.emit(ResourceEvent::MemoryHit { location: self.location() });
                return Ok(Some(value));
            }
        }

        let raw = self
            .storage
            .read_raw()
            .await
            .map_err(|e| ResourceError::storage(self.location(), StorageOperation::Read, e))?;
        let Some(raw) = raw else {
            if force_reload {
                self.value.store(None);
            }
            self.emit(ResourceEvent::NotFound { location: self.location() });
            return Ok(None);
        };

        let value = Arc::new(self.parse(raw)?);
        self.value.store(Some(value.clone()));
        self.emit(ResourceEvent::Loaded { location: self.location() });
        Ok(Some(value))
    }

    /// Persists `content` and makes its parsed value the in-memory value.
    ///
    /// Content that fails to parse is neither persisted nor kept.
    pub async fn write(&self, content: RawContent) -> Result<Arc<T>, ResourceError> {
        let value = Arc::new(self.parse(content.clone())?);
        self.storage
            .write_raw(&content)
            .await
            .map_err(|e| ResourceError::storage(self.location(), StorageOperation::Write, e))?;
        self.value.store(Some(value.clone()));
        self.emit(ResourceEvent::Written { location: self.location() });
        Ok(value)
    }

    /// Deletes the persisted copy, then clears the in-memory value.
    /// If deletion fails the in-memory value stays, so the call can be retried.
    pub async fn delete(&self) -> Result<(), ResourceError> {
        self.storage
            .delete_underlying()
            .await
            .map_err(|e| ResourceError::storage(self.location(), StorageOperation::Delete, e))?;
        self.value.store(None);
        self.emit(ResourceEvent::Deleted { location: self.location() });
        Ok(())
    }

    /// Parses `content` into the in-memory value without persisting it
    pub(crate) fn replace_in_memory(&self, content: RawContent) -> Result<Arc<T>, ResourceError> {
        let value = Arc::new(self.parse(content)?);
        self.value.store(Some(value.clone()));
        self.emit(ResourceEvent::ReplacedInMemory { location: self.location() });
        Ok(value)
    }

    fn parse(&self, content: RawContent) -> Result<T, ResourceError> {
        let content = self.pre_parser.pre_parse(content)?;
        Ok(self.parser.parse(content)?)
    }

    pub(crate) fn emit(&self, event: ResourceEvent<'_>) {
        self.observer.on_event(&event);
    }
}

impl<T, S, P> Resource<T> for LocalResource<T, S, P>
where
    T: Send + Sync,
    S: StorageAdapter,
    P: Parser<T>,
{
    fn location(&self) -> &str {
        LocalResource::location(self)
    }

    fn current(&self) -> Option<Arc<T>> {
        LocalResource::current(self)
    }

    async fn get(&self, force_reload: bool) -> Result<Option<Arc<T>>, ResourceError> {
        LocalResource::get(self, force_reload).await
    }
}
