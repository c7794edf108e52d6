use std::borrow::Cow;

/// Raw payload read from storage or fetched from the network.
///
/// The library never looks inside it; it is handed to the parsers as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawContent {
    Text(String),
    Binary(Vec<u8>),
}

impl RawContent {
    pub fn is_empty(&self) -> bool {
        match self {
            RawContent::Text(text) => text.is_empty(),
            RawContent::Binary(bytes) => bytes.is_empty(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RawContent::Text(text) => text.as_bytes(),
            RawContent::Binary(bytes) => bytes,
        }
    }

    /// Text view of the payload. Binary payloads are decoded lossily.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            RawContent::Text(text) => Cow::Borrowed(text),
            RawContent::Binary(bytes) => String::from_utf8_lossy(bytes),
        }
    }
}

impl From<String> for RawContent {
    fn from(value: String) -> Self {
        RawContent::Text(value)
    }
}

impl From<&str> for RawContent {
    fn from(value: &str) -> Self {
        RawContent::Text(value.to_string())
    }
}

impl From<Vec<u8>> for RawContent {
    fn from(value: Vec<u8>) -> Self {
        RawContent::Binary(value)
    }
}
