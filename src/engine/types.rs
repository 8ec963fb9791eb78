//! Engine types
//!
//! Progress events and statistics for a copy run.

use crate::upload::FailureReason;
use std::time::Duration;

/// A progress event emitted during a copy run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A search page was received
    PageFetched {
        /// Page number
        page: u32,
        /// Images on the page
        images: usize,
    },
    /// The query matches nothing
    NoImages,
    /// The first page reported the query's total
    TotalKnown {
        /// Images matching the query
        total: u64,
    },
    /// Work on an image begins
    ImageStarted {
        /// 1-based position in the run
        index: u64,
        /// Total from the first page
        total: u64,
        /// Source image id
        image_id: u64,
    },
    /// An upload request is about to be sent
    UploadAttempt { image_id: u64, attempt: u32 },
    /// An upload request failed and will be retried
    UploadFailed {
        image_id: u64,
        reason: FailureReason,
    },
    /// Waiting before the next attempt
    RetryScheduled { image_id: u64, delay: Duration },
    /// The target created the image
    Uploaded { image_id: u64 },
    /// The target already had the image
    AlreadyUploaded { image_id: u64 },
    /// The run is over
    Finished { stats: CopyStats },
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::PageFetched { page, images } => {
                write!(f, "Fetched page {page} ({images} images)")
            }
            Event::NoImages => write!(
                f,
                "This query has no images! Double-check the query and try again."
            ),
            Event::TotalKnown { total } => write!(f, "There are {total} images in this query"),
            Event::ImageStarted {
                index,
                total,
                image_id,
            } => write!(f, "Uploading image {index}/{total} ({image_id})..."),
            Event::UploadAttempt { image_id, attempt } => {
                write!(f, "Attempt {attempt} for image {image_id}")
            }
            Event::UploadFailed { reason, .. } => write!(f, "Error uploading image ({reason})"),
            Event::RetryScheduled { delay, .. } => {
                write!(f, "Retrying in {} seconds...", delay.as_secs_f64())
            }
            Event::Uploaded { image_id } => write!(f, "Uploaded image {image_id}"),
            Event::AlreadyUploaded { .. } => write!(f, "Image has already been uploaded"),
            Event::Finished { stats } => write!(
                f,
                "Done: {} uploaded, {} already present, {} images in {} pages",
                stats.uploaded, stats.already_present, stats.images_processed, stats.pages_fetched
            ),
        }
    }
}

/// Receives progress events
pub trait ProgressSink {
    /// Handle one event
    fn emit(&mut self, event: Event);
}

impl ProgressSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

/// Statistics from a copy run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Search pages fetched, including the final empty one
    pub pages_fetched: u32,
    /// Images that reached a terminal outcome
    pub images_processed: u64,
    /// Images created on the target
    pub uploaded: u64,
    /// Images the target already had
    pub already_present: u64,
    /// Upload requests issued
    pub attempts: u64,
    /// Attempts that had to be retried
    pub retries: u64,
}

impl CopyStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add an uploaded image
    pub fn add_uploaded(&mut self) {
        self.images_processed += 1;
        self.uploaded += 1;
    }

    /// Add an image that was already present
    pub fn add_already_present(&mut self) {
        self.images_processed += 1;
        self.already_present += 1;
    }
}
