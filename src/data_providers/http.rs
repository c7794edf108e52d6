use std::error::Error;
use std::fmt::{Display, Formatter};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode, Url};
use crate::content::RawContent;
use crate::data_providers::data_provider::DataProvider;
use crate::error::BoxError;

/// Fetches a resource with a plain `GET` request.
///
/// Timeouts, proxies and default headers come from the supplied [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpDataProvider {
    client: reqwest::Client,
    url: Url,
}

impl HttpDataProvider {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        HttpDataProvider { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl DataProvider for HttpDataProvider {
    async fn fetch_contents(&self) -> Result<Option<RawContent>, BoxError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Box::new(UnexpectedStatus(status)));
        }
        let content = extract_content(response).await?;
        if content.is_empty() {
            return Ok(None);
        }
        return Ok(Some(content));
    }
}

/// Response status that is neither success nor "no content"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnexpectedStatus(pub StatusCode);

impl Display for UnexpectedStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "server responded with unexpected status {}", self.0)
    }
}

impl Error for UnexpectedStatus {}

async fn extract_content(response: Response) -> Result<RawContent, reqwest::Error> {
    let textual = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(is_textual)
        .unwrap_or(false);
    if textual {
        return response.text().await.map(RawContent::Text);
    }
    return response.bytes().await.map(|bytes| RawContent::Binary(bytes.to_vec()));
}

/// Whether a Content-Type should be decoded as text.
pub fn is_textual(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    if mime.starts_with("text/") {
        return true;
    }
    // NOTE: no MIME type for TOML is registered officially, application/toml is common
    matches!(
        mime.as_str(),
        "application/json" | "application/xml" | "application/yaml" | "application/x-yaml" | "application/toml" | "application/javascript"
    ) || mime.ends_with("+json") || mime.ends_with("+xml")
}
