use std::time::Duration;

/// Which source a network resource prefers when nothing is in memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Strategy {
    /// Always try the network first, fall back to the cache
    #[default]
    NetworkFirst,
    /// Use the cache until it expires
    CacheFirst,
}

/// What to do when a data provider returns an error instead of content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FetchFailurePolicy {
    /// Treat the error as "no content", report it to the observer
    #[default]
    Absorb,
    /// Return the error to the caller as [`ResourceError::Fetch`](crate::error::ResourceError::Fetch)
    Propagate,
}

/// Construction-time settings of a [`NetworkResource`](crate::resource::NetworkResource).
///
/// With the `serde` feature this can be embedded in an application's own config file:
/// ```toml
/// strategy = "cache_first"
/// max_age = 2592000 # seconds
/// fetch_failure_policy = "absorb"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NetworkResourceConfig {
    pub strategy: Strategy,
    /// `None` means cached content never expires
    #[cfg_attr(feature = "serde", serde(deserialize_with = "deserialize_seconds"))]
    pub max_age: Option<Duration>,
    pub fetch_failure_policy: FetchFailurePolicy,
}

impl NetworkResourceConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn with_fetch_failure_policy(mut self, policy: FetchFailurePolicy) -> Self {
        self.fetch_failure_policy = policy;
        self
    }
}

#[cfg(feature = "serde")]
fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    let secs: Option<u64> = Option::deserialize(deserializer)?;
    Ok(secs.map(Duration::from_secs))
}

/// Per-call options of [`NetworkResource::get_with`](crate::resource::NetworkResource::get_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetOptions {
    /// Ignore the in-memory value and always try the network
    pub force_reload: bool,
    /// Serve the cached copy when the fetch yields no content
    pub allow_cache_fallback: bool,
    /// Keep fetched content in memory only, leave the persisted cache untouched
    pub skip_cache_write: bool,
}

impl Default for GetOptions {
    fn default() -> Self {
        GetOptions {
            force_reload: false,
            allow_cache_fallback: true,
            skip_cache_write: false,
        }
    }
}

impl GetOptions {
    pub fn force_reload(mut self, force_reload: bool) -> Self {
        self.force_reload = force_reload;
        self
    }

    pub fn allow_cache_fallback(mut self, allow: bool) -> Self {
        self.allow_cache_fallback = allow;
        self
    }

    pub fn skip_cache_write(mut self, skip: bool) -> Self {
        self.skip_cache_write = skip;
        self
    }
}
