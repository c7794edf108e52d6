#![cfg_attr(docsrs, feature(doc_auto_cfg))]
//! Asynchronous access to the current value of a single resource.
//!
//! A [`LocalResource`](resource::LocalResource) reads a value from storage (a file,
//! process memory, or a custom [`StorageAdapter`](storage::StorageAdapter)) and keeps
//! the parsed result in memory. A [`NetworkResource`](resource::NetworkResource) fetches
//! a remote resource and keeps a local resource as its cache, deciding on every
//! `get` whether to serve memory, the cached copy or freshly fetched content.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::time::Duration;
//! use cached_resource::config::{NetworkResourceConfig, Strategy};
//! use cached_resource::parser::serde_parsers::JsonParser;
//! use cached_resource::resource::{LocalResource, NetworkResource};
//! use cached_resource::storage::FileStorage;
//!
//! #[derive(serde::Deserialize)]
//! struct Flags {
//!     beta: bool,
//! }
//!
//! let cache = LocalResource::new(FileStorage::text("cache/flags.json"), JsonParser::<Flags>::new());
//! let config = NetworkResourceConfig::default()
//!     .with_strategy(Strategy::CacheFirst)
//!     .with_max_age(Duration::from_secs(60 * 60));
//! let flags = NetworkResource::from_url(
//!     reqwest::Client::new(),
//!     "https://example.com/flags.json".parse()?,
//!     cache,
//!     config,
//! )?;
//!
//! if let Some(flags) = flags.get(false).await? {
//!     println!("beta enabled: {}", flags.beta);
//! }
//! # Ok(())
//! # }
//! ```

/// Resource configuration and per-call options
pub mod config;
/// Raw content type shared by providers, storage and parsers
pub mod content;
/// Data providers for network resources.
/// Public traits are included to allow easy use of custom implementations.
pub mod data_providers;
/// Error types
pub mod error;
/// Expiration predicate
pub mod expiration;
/// Observer hooks for resource events
pub mod observer;
/// Two-stage parsing of raw content
pub mod parser;
/// Local and network resources
pub mod resource;
/// Storage adapters for local resources
pub mod storage;
