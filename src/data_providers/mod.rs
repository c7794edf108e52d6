/// Common data provider code
pub mod data_provider;

/// Data provider that uses reqwest HTTP client to fetch data from remote source
#[cfg(feature = "http")]
pub mod http;

pub use data_provider::DataProvider;
