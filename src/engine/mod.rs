//! Execution engine module
//!
//! Main copy loop.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Copier` - Feeds search pages from the source to the upload driver
//! - `Event` / `ProgressSink` - Progress reporting
//! - `CopyStats` - Totals for a run

mod types;

pub use types::{CopyStats, Event, ProgressSink};

use crate::config::CopierConfig;
use crate::error::{Error, Result};
use crate::http::{Booru, HttpClient};
use crate::pagination::QueryPaginator;
use crate::types::SearchPage;
use crate::upload::{UploadDriver, UploadOutcome};
use std::time::Instant;
use tracing::{debug, info};

/// Copies every image of a source query to a target booru
#[derive(Debug)]
pub struct Copier {
    paginator: QueryPaginator,
    driver: UploadDriver,
    stats: CopyStats,
}

impl Copier {
    /// Create a copier for one query
    pub fn new(
        config: &CopierConfig,
        source: Booru,
        target: Booru,
        query: impl Into<String>,
    ) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::new(config)?;
        let paginator = QueryPaginator::new(client.clone(), source, query, config.page_size);
        let driver = UploadDriver::new(client, target, config.retry);
        Ok(Self::from_parts(paginator, driver))
    }

    /// Assemble a copier from an existing paginator and driver
    pub fn from_parts(paginator: QueryPaginator, driver: UploadDriver) -> Self {
        Self {
            paginator,
            driver,
            stats: CopyStats::default(),
        }
    }

    /// Get statistics
    pub fn stats(&self) -> &CopyStats {
        &self.stats
    }

    /// Fetch the first page and report the query's total
    pub async fn preview(&mut self, sink: &mut dyn ProgressSink) -> Result<SearchPage> {
        let first = self.paginator.next_page().await?;
        self.stats.add_page();
        sink.emit(Event::PageFetched {
            page: 1,
            images: first.len(),
        });

        if first.total == 0 {
            info!("Query has no images");
            sink.emit(Event::NoImages);
        } else {
            info!(total = first.total, "Query total known");
            sink.emit(Event::TotalKnown { total: first.total });
        }

        Ok(first)
    }

    /// Copy everything, starting from a first page returned by `preview`
    ///
    /// Fails without any requests if `preview` has not run yet.
    pub async fn run_from(
        &mut self,
        first: SearchPage,
        sink: &mut dyn ProgressSink,
    ) -> Result<CopyStats> {
        if self.paginator.state().page == 0 {
            return Err(Error::config("run_from requires the first page from preview"));
        }

        let start = Instant::now();
        let total = self.paginator.total().unwrap_or(first.total);

        if total == 0 {
            return Ok(self.stats);
        }

        let mut index = 0u64;
        let mut page = first;

        while !page.is_empty() {
            for image in &page.images {
                index += 1;
                sink.emit(Event::ImageStarted {
                    index,
                    total,
                    image_id: image.id,
                });

                match self.driver.upload_one(image, sink).await? {
                    UploadOutcome::Uploaded => self.stats.add_uploaded(),
                    UploadOutcome::AlreadyExists => self.stats.add_already_present(),
                }

                self.driver.pace().await;
            }

            page = self.paginator.next_page().await?;
            self.stats.add_page();
            sink.emit(Event::PageFetched {
                page: self.paginator.state().page,
                images: page.len(),
            });
        }

        let driver_stats = self.driver.stats();
        self.stats.attempts = driver_stats.attempts;
        self.stats.retries = driver_stats.failures;

        debug!("Copy loop finished in {:?}", start.elapsed());
        info!(
            uploaded = self.stats.uploaded,
            already_present = self.stats.already_present,
            pages = self.stats.pages_fetched,
            "Copy finished"
        );
        sink.emit(Event::Finished { stats: self.stats });

        Ok(self.stats)
    }

    /// Preview and copy in one go
    pub async fn run(&mut self, sink: &mut dyn ProgressSink) -> Result<CopyStats> {
        let first = self.preview(sink).await?;
        self.run_from(first, sink).await
    }
}

#[cfg(test)]
mod tests;
