use std::time::SystemTime;
use tokio::sync::Mutex;
use crate::content::RawContent;
use crate::error::BoxError;
use crate::storage::storage_adapter::StorageAdapter;

struct StoredContent {
    content: RawContent,
    modified: SystemTime,
}

/// Storage that keeps the raw content in process memory.
///
/// Useful as a cache that does not outlive the process, and for tests, since the
/// modification time can be set explicitly.
pub struct MemoryStorage {
    location: String,
    slot: Mutex<Option<StoredContent>>,
}

impl MemoryStorage {
    pub fn new(location: impl Into<String>) -> Self {
        MemoryStorage {
            location: location.into(),
            slot: Mutex::new(None),
        }
    }

    /// Storage that already holds `content`, last modified at `modified`
    pub fn with_content(location: impl Into<String>, content: impl Into<RawContent>, modified: SystemTime) -> Self {
        MemoryStorage {
            location: location.into(),
            slot: Mutex::new(Some(StoredContent {
                content: content.into(),
                modified,
            })),
        }
    }
}

impl StorageAdapter for MemoryStorage {
    fn location(&self) -> &str {
        &self.location
    }

    async fn exists(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    async fn last_modified(&self) -> Option<SystemTime> {
        self.slot.lock().await.as_ref().map(|stored| stored.modified)
    }

    async fn read_raw(&self) -> Result<Option<RawContent>, BoxError> {
        Ok(self.slot.lock().await.as_ref().map(|stored| stored.content.clone()))
    }

    async fn write_raw(&self, content: &RawContent) -> Result<(), BoxError> {
        *self.slot.lock().await = Some(StoredContent {
            content: content.clone(),
            modified: SystemTime::now(),
        });
        Ok(())
    }

    async fn delete_underlying(&self) -> Result<(), BoxError> {
        self.slot.lock().await.take();
        Ok(())
    }
}
