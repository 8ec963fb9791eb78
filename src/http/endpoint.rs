//! Booru API addressing
//!
//! A `Booru` is a base URL plus the API key used against it.

use crate::error::{Error, Result};
use url::Url;

const SEARCH_IMAGES_PATH: &str = "/api/v1/json/search/images";
const UPLOAD_IMAGE_PATH: &str = "/api/v1/json/images";

/// One Philomena instance together with the API key used on it
#[derive(Clone, PartialEq, Eq)]
pub struct Booru {
    base_url: Url,
    api_key: String,
}

impl Booru {
    /// Address a booru by host name over HTTPS
    pub fn new(host: &str, api_key: impl Into<String>) -> Result<Self> {
        Self::from_base_url(&format!("https://{host}"), api_key)
    }

    /// Address a booru by full base URL (scheme, host and optional port)
    pub fn from_base_url(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.host_str().is_none() {
            return Err(Error::invalid_input("booru URL", "missing host"));
        }
        Ok(Self {
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Host name of this booru
    pub fn host(&self) -> &str {
        self.base_url.host_str().unwrap_or_default()
    }

    /// URL of one page of a search query, sorted by creation time ascending
    pub fn search_url(&self, query: &str, page: u32, per_page: u32) -> Result<Url> {
        let mut url = self.base_url.join(SEARCH_IMAGES_PATH)?;
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string())
            .append_pair("q", query)
            .append_pair("sf", "created_at")
            .append_pair("sd", "asc");
        Ok(url)
    }

    /// URL of the image creation endpoint
    pub fn upload_url(&self) -> Result<Url> {
        let mut url = self.base_url.join(UPLOAD_IMAGE_PATH)?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

impl std::fmt::Debug for Booru {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Booru")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Render a URL for logs with the `key` parameter masked
pub fn redact(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" { "***".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();

    if pairs.is_empty() {
        return redacted.to_string();
    }

    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
