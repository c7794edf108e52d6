use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use crate::content::RawContent;
use crate::error::BoxError;
use crate::storage::storage_adapter::StorageAdapter;

/// How file contents are read back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Binary,
}

/// Storage backed by a single file.
///
/// `exists` and `last_modified` cannot return errors. A metadata error other than
/// "not found" (e.g. permission denied) is reported as a `tracing` warning and the
/// file is treated as missing, so a network resource using it will refetch.
/// Reading, writing and deleting still return such errors.
pub struct FileStorage {
    path: PathBuf,
    location: String,
    kind: ContentKind,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>, kind: ContentKind) -> Self {
        let path = path.into();
        let location = path.to_string_lossy().into_owned();
        FileStorage { path, location, kind }
    }

    /// File read back as UTF-8 text
    pub fn text(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ContentKind::Text)
    }

    /// File read back as raw bytes
    pub fn binary(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ContentKind::Binary)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }
}

impl StorageAdapter for FileStorage {
    fn location(&self) -> &str {
        &self.location
    }

    async fn exists(&self) -> bool {
        match tokio::fs::try_exists(&self.path).await {
            Ok(exists) => exists,
            Err(e) => {
                report_metadata_error(&self.location, &e);
                false
            }
        }
    }

    async fn last_modified(&self) -> Option<SystemTime> {
        match tokio::fs::metadata(&self.path).await.and_then(|meta| meta.modified()) {
            Ok(modified) => Some(modified),
            Err(e) => {
                report_metadata_error(&self.location, &e);
                None
            }
        }
    }

    async fn read_raw(&self) -> Result<Option<RawContent>, BoxError> {
        let read = match self.kind {
            ContentKind::Text => tokio::fs::read_to_string(&self.path).await.map(RawContent::Text),
            ContentKind::Binary => tokio::fs::read(&self.path).await.map(RawContent::Binary),
        };
        match read {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    async fn write_raw(&self, content: &RawContent) -> Result<(), BoxError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, content.as_bytes()).await?;
        Ok(())
    }

    async fn delete_underlying(&self) -> Result<(), BoxError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Box::new(e)),
        }
    }
}

fn report_metadata_error(location: &str, error: &std::io::Error) {
    if error.kind() == ErrorKind::NotFound {
        return;
    }
    #[cfg(feature = "tracing")]
    tracing::warn!(location, error = %error, "cannot read file metadata, treating file as missing");
    #[cfg(not(feature = "tracing"))]
    let _ = (location, error);
}
