//! HTTP module
//!
//! Provides the HTTP client shared by the paginator and the upload driver,
//! and the addressing of a booru's JSON API.
//!
//! # Features
//!
//! - **Browser User-Agent**: Sent with every request
//! - **Status Mapping**: Non-success search responses become errors
//! - **Key Redaction**: URLs are logged without the API key

mod client;
mod endpoint;

pub use client::HttpClient;
pub use endpoint::{redact, Booru};
