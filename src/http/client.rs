//! HTTP client for the booru JSON API
//!
//! Provides a thin wrapper around reqwest that handles:
//! - The browser User-Agent and request timeout
//! - JSON request and response bodies
//! - Mapping non-success responses to errors for reads

use super::endpoint::redact;
use crate::config::CopierConfig;
use crate::error::{Error, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP client shared by the paginator and the upload driver
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client from the run configuration
    pub fn new(config: &CopierConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            timeout: config.request_timeout,
        })
    }

    /// GET a URL and decode the JSON body
    ///
    /// Any non-success status is returned as `Error::HttpStatus` without
    /// retrying. A connection lost while reading the body is `Error::Http`;
    /// a complete body that does not match `T` is `Error::Decode`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        debug!("GET {}", redact(url));

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| Error::decode(e.to_string()))
    }

    /// POST a JSON body and return the response status
    ///
    /// Every status is returned as-is; only failures to get a response at
    /// all (connect, timeout, TLS) are errors.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &Url,
        body: &B,
    ) -> Result<StatusCode> {
        debug!("POST {}", redact(url));

        let response = self.client.post(url.clone()).json(body).send().await?;
        let status = response.status();

        debug!("POST {} -> {}", redact(url), status.as_u16());
        Ok(status)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
