/// Storage adapter trait
pub mod storage_adapter;

/// In-process storage
pub mod memory;

/// Storage backed by a file on disk, using tokio's async fs
#[cfg(feature = "fs")]
pub mod file;

pub use storage_adapter::StorageAdapter;
pub use memory::MemoryStorage;
#[cfg(feature = "fs")]
pub use file::{ContentKind, FileStorage};
