use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error type returned by collaborators (data providers and storage adapters).
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Storage operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOperation {
    Read,
    Write,
    Delete,
}

impl Display for StorageOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageOperation::Read => write!(f, "read"),
            StorageOperation::Write => write!(f, "write"),
            StorageOperation::Delete => write!(f, "delete"),
        }
    }
}

/// Raw content could not be converted into the requested value.
#[derive(Debug)]
pub struct ParseError {
    /// Name of the format that was being parsed, e.g. `json`
    pub format: &'static str,
    message: String,
    source: Option<BoxError>,
}

impl ParseError {
    pub fn new(format: &'static str, message: impl Into<String>) -> Self {
        ParseError {
            format,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(format: &'static str, source: impl Into<BoxError>) -> Self {
        let source = source.into();
        ParseError {
            format,
            message: source.to_string(),
            source: Some(source),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to parse {} content: {}", self.format, self.message)
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.source {
            Some(inner) => Some(inner.as_ref()),
            None => None,
        }
    }
}

/// Error returned by resource operations.
///
/// Fetch failures only show up here when the resource was configured with
/// [`FetchFailurePolicy::Propagate`](crate::config::FetchFailurePolicy::Propagate);
/// otherwise they are treated as "no content".
#[derive(Debug)]
pub enum ResourceError {
    Fetch {
        location: String,
        source: BoxError,
    },
    Storage {
        location: String,
        operation: StorageOperation,
        source: BoxError,
    },
    Parse(ParseError),
    InvalidConfiguration(String),
}

impl ResourceError {
    pub(crate) fn storage(location: &str, operation: StorageOperation, source: BoxError) -> Self {
        ResourceError::Storage {
            location: location.to_string(),
            operation,
            source,
        }
    }
}

impl Display for ResourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch { location, .. } => write!(f, "failed to fetch '{location}'"),
            Self::Storage { location, operation, .. } => {
                write!(f, "storage {operation} failed for '{location}'")
            }
            Self::Parse(inner) => write!(f, "{inner}"),
            Self::InvalidConfiguration(reason) => write!(f, "invalid resource configuration: {reason}"),
        }
    }
}

impl Error for ResourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ResourceError::Fetch { source, .. } => Some(source.as_ref()),
            ResourceError::Storage { source, .. } => Some(source.as_ref()),
            ResourceError::Parse(inner) => Some(inner),
            ResourceError::InvalidConfiguration(_) => None,
        }
    }
}

impl From<ParseError> for ResourceError {
    fn from(value: ParseError) -> Self {
        ResourceError::Parse(value)
    }
}
