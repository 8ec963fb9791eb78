//! Search query paginator

use super::types::PaginationState;
use crate::error::{Error, Result};
use crate::http::{Booru, HttpClient};
use crate::types::SearchPage;
use tracing::debug;

/// Fetches the pages of one search query from the source booru
#[derive(Debug)]
pub struct QueryPaginator {
    client: HttpClient,
    source: Booru,
    query: String,
    page_size: u32,
    state: PaginationState,
}

impl QueryPaginator {
    /// Create a new paginator
    pub fn new(
        client: HttpClient,
        source: Booru,
        query: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            client,
            source,
            query: query.into(),
            page_size,
            state: PaginationState::new(),
        }
    }

    /// Current pagination state
    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Total reported by the first page, once it has been fetched
    pub fn total(&self) -> Option<u64> {
        self.state.total
    }

    /// Check if an empty page has been reached
    pub fn is_done(&self) -> bool {
        self.state.done
    }

    /// Fetch one page without touching the pagination state
    ///
    /// Non-success statuses and network failures are returned as transport
    /// errors, malformed bodies as decode errors. Nothing is retried.
    pub async fn fetch_page(&self, page: u32) -> Result<SearchPage> {
        let url = self.source.search_url(&self.query, page, self.page_size)?;
        let result: SearchPage = self.client.get_json(&url).await?;

        if let Some(image) = result.images.iter().find(|i| i.view_url.is_empty()) {
            return Err(Error::decode(format!(
                "image {} on page {page} has no view_url",
                image.id
            )));
        }

        debug!(page, images = result.len(), total = result.total, "Fetched search page");
        Ok(result)
    }

    /// Fetch the page after the last one fetched
    ///
    /// Once an empty page has been seen this returns an empty page without
    /// issuing another request.
    pub async fn next_page(&mut self) -> Result<SearchPage> {
        if self.state.done {
            return Ok(SearchPage {
                images: Vec::new(),
                total: self.state.total.unwrap_or_default(),
            });
        }

        let page = self.state.next_page_number();
        let result = self.fetch_page(page).await?;
        self.state.record_page(page, result.len(), result.total);
        Ok(result)
    }
}
