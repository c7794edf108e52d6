use std::sync::Arc;
use std::time::Duration;
use crate::config::{FetchFailurePolicy, GetOptions, NetworkResourceConfig, Strategy};
use crate::content::RawContent;
use crate::data_providers::DataProvider;
use crate::error::ResourceError;
use crate::expiration::has_expired;
use crate::observer::{FetchReason, ResourceEvent, ResourceObserver};
use crate::parser::{Identity, Parser};
use crate::resource::local::LocalResource;
use crate::resource::Resource;
use crate::storage::StorageAdapter;

/// A remote resource with a local copy acting as its cache.
///
/// Every [`get_with`](Self::get_with) call is resolved in this order:
/// 1. If the cache holds a value in memory and no reload is forced, it is returned without I/O.
/// 2. If a reload is forced, the strategy is [`Strategy::NetworkFirst`], or the cached copy
///    has expired, the content is fetched. Fetched content is written to the cache
///    (or only kept in memory with `skip_cache_write`). If the fetch yields no content,
///    the cache is consulted instead, unless `allow_cache_fallback` is off.
/// 3. Otherwise the cached copy is returned.
///
/// Concurrent calls are not de-duplicated; overlapping fetches race and the last write wins.
pub struct NetworkResource<T, D, S, P = Identity> {
    location: String,
    provider: D,
    cache: LocalResource<T, S, P>,
    strategy: Strategy,
    max_age: Option<Duration>,
    fetch_failure_policy: FetchFailurePolicy,
}

impl<T, D, S, P> NetworkResource<T, D, S, P>
where
    T: Send + Sync,
    D: DataProvider,
    S: StorageAdapter,
    P: Parser<T>,
{
    /// Creates a resource fetching `location` through `provider`, cached in `cache`.
    ///
    /// # Errors
    /// [`ResourceError::InvalidConfiguration`] if the cache lives at the same location as the remote.
    pub fn new(
        location: impl Into<String>,
        provider: D,
        cache: LocalResource<T, S, P>,
        config: NetworkResourceConfig,
    ) -> Result<Self, ResourceError> {
        let location = location.into();
        if location == cache.location() {
            return Err(ResourceError::InvalidConfiguration(format!(
                "cache location must differ from the remote location '{location}'"
            )));
        }
        Ok(NetworkResource {
            location,
            provider,
            cache,
            strategy: config.strategy,
            max_age: config.max_age,
            fetch_failure_policy: config.fetch_failure_policy,
        })
    }

    /// Replaces the observer of this resource and its cache
    pub fn with_observer(mut self, observer: Arc<dyn ResourceObserver>) -> Self {
        self.cache = self.cache.with_observer(observer);
        self
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    pub fn provider(&self) -> &D {
        &self.provider
    }

    pub fn cache(&self) -> &LocalResource<T, S, P> {
        &self.cache
    }

    /// Value held in the cache's memory, without any I/O
    pub fn current(&self) -> Option<Arc<T>> {
        self.cache.current()
    }

    /// Whether the persisted cache copy is missing or older than `max_age`.
    /// Evaluated against the current time on every call.
    pub async fn is_expired(&self) -> bool {
        has_expired(self.cache.last_modified().await, self.max_age)
    }

    /// [`get_with`](Self::get_with) with default options
    pub async fn get(&self, force_reload: bool) -> Result<Option<Arc<T>>, ResourceError> {
        self.get_with(GetOptions::default().force_reload(force_reload)).await
    }

    pub async fn get_with(&self, options: GetOptions) -> Result<Option<Arc<T>>, ResourceError> {
        if !options.force_reload {
            if let Some(value) = self.cache.current() {
                self.cache.emit(ResourceEvent::MemoryHit { location: &self.location });
                return Ok(Some(value));
            }
        }

        let Some(reason) = self.fetch_reason(options).await else {
            self.cache.emit(ResourceEvent::CacheFresh { location: &self.location });
            return self.cache.get(false).await;
        };

        match self.fetch(reason).await? {
            Some(content) if options.skip_cache_write => self.cache.replace_in_memory(content).map(Some),
            Some(content) => self.cache.write(content).await.map(Some),
            None if options.allow_cache_fallback => {
                self.cache.emit(ResourceEvent::FallingBackToCache { location: &self.location });
                self.cache.get(false).await
            }
            None => Ok(None),
        }
    }

    /// Deletes the cached copy, both persisted and in memory
    pub async fn delete(&self) -> Result<(), ResourceError> {
        self.cache.delete().await
    }

    async fn fetch_reason(&self, options: GetOptions) -> Option<FetchReason> {
        if options.force_reload {
            return Some(FetchReason::Forced);
        }
        if self.strategy == Strategy::NetworkFirst {
            return Some(FetchReason::NetworkFirst);
        }
        if self.is_expired().await {
            return Some(FetchReason::Expired);
        }
        None
    }

    /// Fetches content, mapping empty payloads to `None` and handling
    /// provider errors according to the fetch failure policy
    async fn fetch(&self, reason: FetchReason) -> Result<Option<RawContent>, ResourceError> {
        self.cache.emit(ResourceEvent::FetchStarted { location: &self.location, reason });
        match self.provider.fetch_contents().await {
            Ok(Some(content)) if !content.is_empty() => {
                self.cache.emit(ResourceEvent::FetchSucceeded { location: &self.location });
                Ok(Some(content))
            }
            Ok(_) => {
                self.cache.emit(ResourceEvent::FetchFailed { location: &self.location, error: None });
                Ok(None)
            }
            Err(error) => match self.fetch_failure_policy {
                FetchFailurePolicy::Absorb => {
                    self.cache.emit(ResourceEvent::FetchFailed {
                        location: &self.location,
                        error: Some(&*error),
                    });
                    Ok(None)
                }
                FetchFailurePolicy::Propagate => Err(ResourceError::Fetch {
                    location: self.location.clone(),
                    source: error,
                }),
            },
        }
    }
}

#[cfg(feature = "http")]
impl<T, S, P> NetworkResource<T, crate::data_providers::http::HttpDataProvider, S, P>
where
    T: Send + Sync,
    S: StorageAdapter,
    P: Parser<T>,
{
    /// Resource fetched from `url` with a plain `GET` request
    pub fn from_url(
        client: reqwest::Client,
        url: reqwest::Url,
        cache: LocalResource<T, S, P>,
        config: NetworkResourceConfig,
    ) -> Result<Self, ResourceError> {
        let location = url.to_string();
        let provider = crate::data_providers::http::HttpDataProvider::new(client, url);
        Self::new(location, provider, cache, config)
    }
}

impl<T, D, S, P> Resource<T> for NetworkResource<T, D, S, P>
where
    T: Send + Sync,
    D: DataProvider,
    S: StorageAdapter,
    P: Parser<T>,
{
    fn location(&self) -> &str {
        NetworkResource::location(self)
    }

    fn current(&self) -> Option<Arc<T>> {
        NetworkResource::current(self)
    }

    async fn get(&self, force_reload: bool) -> Result<Option<Arc<T>>, ResourceError> {
        NetworkResource::get(self, force_reload).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::SystemTime;
    use crate::error::{BoxError, ParseError};
    use crate::storage::MemoryStorage;
    use super::*;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    #[derive(Clone, Copy)]
    enum Reply {
        Content(&'static str),
        Nothing,
        Fault,
    }

    struct FakeProvider {
        reply: Mutex<Reply>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(reply: Reply) -> Self {
            FakeProvider {
                reply: Mutex::new(reply),
                calls: AtomicUsize::new(0),
            }
        }

        fn set_reply(&self, reply: Reply) {
            *self.reply.lock().unwrap() = reply;
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DataProvider for FakeProvider {
        async fn fetch_contents(&self) -> Result<Option<RawContent>, BoxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = *self.reply.lock().unwrap();
            match reply {
                Reply::Content(text) => Ok(Some(RawContent::from(text))),
                Reply::Nothing => Ok(None),
                Reply::Fault => Err("connection reset".into()),
            }
        }
    }

    fn number_parser(content: RawContent) -> Result<u32, ParseError> {
        content.to_text().trim().parse::<u32>().map_err(|e| ParseError::with_source("number", e))
    }

    /// Memory storage that counts every storage access
    struct CountingStorage {
        inner: MemoryStorage,
        calls: AtomicUsize,
    }

    impl CountingStorage {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn count(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl StorageAdapter for CountingStorage {
        fn location(&self) -> &str {
            self.inner.location()
        }

        async fn exists(&self) -> bool {
            self.count();
            self.inner.exists().await
        }

        async fn last_modified(&self) -> Option<SystemTime> {
            self.count();
            self.inner.last_modified().await
        }

        async fn read_raw(&self) -> Result<Option<RawContent>, BoxError> {
            self.count();
            self.inner.read_raw().await
        }

        async fn write_raw(&self, content: &RawContent) -> Result<(), BoxError> {
            self.count();
            self.inner.write_raw(content).await
        }

        async fn delete_underlying(&self) -> Result<(), BoxError> {
            self.count();
            self.inner.delete_underlying().await
        }
    }

    type TestResource = NetworkResource<u32, FakeProvider, CountingStorage, fn(RawContent) -> Result<u32, ParseError>>;

    fn resource(reply: Reply, storage: MemoryStorage, config: NetworkResourceConfig) -> TestResource {
        let storage = CountingStorage {
            inner: storage,
            calls: AtomicUsize::new(0),
        };
        let cache = LocalResource::new(storage, number_parser as fn(RawContent) -> Result<u32, ParseError>);
        NetworkResource::new("https://example.com/count", FakeProvider::new(reply), cache, config).unwrap()
    }

    fn cached(value: &'static str, age: Duration) -> MemoryStorage {
        MemoryStorage::with_content("count.txt", value, SystemTime::now() - age)
    }

    fn cache_first(max_age: Duration) -> NetworkResourceConfig {
        NetworkResourceConfig::default()
            .with_strategy(Strategy::CacheFirst)
            .with_max_age(max_age)
    }

    #[tokio::test]
    async fn memory_hit_skips_fetch() {
        let resource = resource(Reply::Content("1"), MemoryStorage::new("count.txt"), NetworkResourceConfig::default());

        assert_eq!(*resource.get(false).await.unwrap().unwrap(), 1);
        resource.provider().set_reply(Reply::Content("2"));
        assert_eq!(*resource.get(false).await.unwrap().unwrap(), 1);
        assert_eq!(resource.provider().calls(), 1);
    }

    #[tokio::test]
    async fn network_first_fetches_even_when_cache_is_fresh() {
        let resource = resource(Reply::Content("5"), cached("4", Duration::ZERO), NetworkResourceConfig::default());

        assert_eq!(*resource.get(false).await.unwrap().unwrap(), 5);
        assert_eq!(resource.provider().calls(), 1);
        assert_eq!(resource.cache().storage().read_raw().await.unwrap(), Some(RawContent::from("5")));
    }

    #[tokio::test]
    async fn cache_first_with_expired_cache_fetches() {
        let resource = resource(Reply::Content("9"), cached("4", DAY * 40), cache_first(DAY * 30));

        assert!(resource.is_expired().await);
        assert_eq!(*resource.get(false).await.unwrap().unwrap(), 9);
        assert_eq!(resource.provider().calls(), 1);
    }

    #[tokio::test]
    async fn cache_first_with_fresh_cache_skips_fetch() {
        let resource = resource(Reply::Content("9"), cached("4", DAY * 10), cache_first(DAY * 30));

        assert!(!resource.is_expired().await);
        assert_eq!(*resource.get(false).await.unwrap().unwrap(), 4);
        assert_eq!(resource.provider().calls(), 0);
    }

    #[tokio::test]
    async fn cache_first_without_cache_fetches() {
        let resource = resource(Reply::Content("3"), MemoryStorage::new("count.txt"), cache_first(DAY));

        assert_eq!(*resource.get(false).await.unwrap().unwrap(), 3);
        assert_eq!(resource.provider().calls(), 1);
    }

    #[tokio::test]
    async fn cache_first_without_max_age_never_expires() {
        let config = NetworkResourceConfig::default().with_strategy(Strategy::CacheFirst);
        let resource = resource(Reply::Content("3"), cached("2", DAY * 1000), config);

        assert_eq!(*resource.get(false).await.unwrap().unwrap(), 2);
        assert_eq!(resource.provider().calls(), 0);
    }

    #[tokio::test]
    async fn force_reload_fetches_with_fresh_cache_and_memory() {
        let resource = resource(Reply::Content("8"), cached("4", Duration::ZERO), cache_first(DAY));

        assert_eq!(*resource.get(false).await.unwrap().unwrap(), 4);
        assert_eq!(*resource.get(true).await.unwrap().unwrap(), 8);
        assert_eq!(resource.provider().calls(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_falls_back_to_cache() {
        let resource = resource(Reply::Nothing, cached("4", DAY), NetworkResourceConfig::default());

        assert_eq!(*resource.get(false).await.unwrap().unwrap(), 4);
        assert_eq!(resource.cache().storage().read_raw().await.unwrap(), Some(RawContent::from("4")));
    }

    #[tokio::test]
    async fn failed_fetch_without_fallback_returns_none() {
        let resource = resource(Reply::Nothing, cached("4", DAY), NetworkResourceConfig::default());

        let options = GetOptions::default().allow_cache_fallback(false);
        assert_eq!(resource.get_with(options).await.unwrap(), None);
        assert_eq!(resource.current(), None);
        assert_eq!(resource.cache().storage().calls(), 0);
        assert_eq!(resource.cache().storage().read_raw().await.unwrap(), Some(RawContent::from("4")));
    }

    #[tokio::test]
    async fn cache_first_memory_hit_skips_storage() {
        let resource = resource(Reply::Content("9"), cached("4", DAY), cache_first(DAY * 30));

        // is_expired + load from storage
        assert_eq!(*resource.get(false).await.unwrap().unwrap(), 4);
        let calls = resource.cache().storage().calls();
        assert!(calls > 0);

        assert_eq!(*resource.get(false).await.unwrap().unwrap(), 4);
        assert_eq!(*resource.get(false).await.unwrap().unwrap(), 4);
        assert_eq!(resource.cache().storage().calls(), calls);
        assert_eq!(resource.provider().calls(), 0);
    }

    #[tokio::test]
    async fn failed_fetch_without_cache_returns_none() {
        let resource = resource(Reply::Nothing, MemoryStorage::new("count.txt"), NetworkResourceConfig::default());
        assert_eq!(resource.get(false).await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_content_counts_as_no_content() {
        let resource = resource(Reply::Content(""), cached("4", DAY), NetworkResourceConfig::default());
        assert_eq!(*resource.get(false).await.unwrap().unwrap(), 4);
    }

    #[tokio::test]
    async fn absorbed_fault_falls_back_to_cache() {
        let resource = resource(Reply::Fault, cached("4", DAY), NetworkResourceConfig::default());
        assert_eq!(*resource.get(false).await.unwrap().unwrap(), 4);
    }

    #[tokio::test]
    async fn propagated_fault_is_returned() {
        let config = NetworkResourceConfig::default().with_fetch_failure_policy(FetchFailurePolicy::Propagate);
        let resource = resource(Reply::Fault, cached("4", DAY), config);

        let err = resource.get(false).await.unwrap_err();
        assert!(matches!(err, ResourceError::Fetch { .. }));
        assert_eq!(err.to_string(), "failed to fetch 'https://example.com/count'");
    }

    #[tokio::test]
    async fn skip_cache_write_only_updates_memory() {
        let resource = resource(Reply::Content("6"), cached("4", DAY), NetworkResourceConfig::default());

        let options = GetOptions::default().skip_cache_write(true);
        assert_eq!(*resource.get_with(options).await.unwrap().unwrap(), 6);
        assert_eq!(resource.current().as_deref(), Some(&6));
        assert_eq!(resource.cache().storage().read_raw().await.unwrap(), Some(RawContent::from("4")));
    }

    #[tokio::test]
    async fn unparseable_fetch_leaves_cache_untouched() {
        let resource = resource(Reply::Content("six"), cached("4", DAY), NetworkResourceConfig::default());

        assert!(matches!(resource.get(false).await, Err(ResourceError::Parse(_))));
        assert_eq!(resource.current(), None);
        assert_eq!(resource.cache().storage().read_raw().await.unwrap(), Some(RawContent::from("4")));
    }

    #[tokio::test]
    async fn delete_forces_new_load() {
        let resource = resource(Reply::Content("1"), MemoryStorage::new("count.txt"), NetworkResourceConfig::default());
        resource.get(false).await.unwrap();

        resource.delete().await.unwrap();
        assert!(!resource.cache().exists().await);
        assert_eq!(resource.current(), None);

        resource.provider().set_reply(Reply::Content("2"));
        assert_eq!(*resource.get(false).await.unwrap().unwrap(), 2);
        assert_eq!(resource.provider().calls(), 2);
    }

    #[test]
    fn cache_at_remote_location_is_rejected() {
        let cache = LocalResource::raw(MemoryStorage::new("https://example.com/count"));
        let result = NetworkResource::new(
            "https://example.com/count",
            FakeProvider::new(Reply::Nothing),
            cache,
            NetworkResourceConfig::default(),
        );
        assert!(matches!(result, Err(ResourceError::InvalidConfiguration(_))));
    }

    #[derive(Default)]
    struct EventLog(Mutex<Vec<String>>);

    impl ResourceObserver for EventLog {
        fn on_event(&self, event: &ResourceEvent<'_>) {
            let name = match event {
                ResourceEvent::FetchStarted { reason, .. } => format!("fetch:{reason:?}"),
                ResourceEvent::FetchFailed { error, .. } => format!("failed:{}", error.is_some()),
                ResourceEvent::FallingBackToCache { .. } => "fallback".to_string(),
                ResourceEvent::Loaded { .. } => "loaded".to_string(),
                ResourceEvent::MemoryHit { .. } => "memory".to_string(),
                _ => "other".to_string(),
            };
            self.0.lock().unwrap().push(name);
        }
    }

    #[tokio::test]
    async fn observer_sees_fallback_sequence() {
        let log = Arc::new(EventLog::default());
        let resource = resource(Reply::Fault, cached("4", DAY), NetworkResourceConfig::default())
            .with_observer(log.clone());

        resource.get(false).await.unwrap();
        resource.get(false).await.unwrap();

        assert_eq!(
            *log.0.lock().unwrap(),
            vec!["fetch:NetworkFirst", "failed:true", "fallback", "loaded", "memory"]
        );
    }
}
