//! Upload driver
//!
//! Creates one image at a time on the target booru and keeps retrying
//! until the target either accepts it or reports it as a duplicate.

use super::backoff::RetryPolicy;
use crate::engine::{Event, ProgressSink};
use crate::error::{Error, Result};
use crate::http::{Booru, HttpClient};
use crate::types::{ImageRecord, UploadBody};
use reqwest::StatusCode;
use tracing::{debug, info, warn};

/// Terminal result of uploading one image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The target created the image
    Uploaded,
    /// The target already has an image with the same content
    AlreadyExists,
}

/// Why a single attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The target answered with a status other than 2xx or 400
    Status(u16),
    /// No HTTP response at all
    Unknown(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Status(code) => match StatusCode::from_u16(*code)
                .ok()
                .and_then(|s| s.canonical_reason())
            {
                Some(reason) => write!(f, "{code} {reason}"),
                None => write!(f, "{code}"),
            },
            FailureReason::Unknown(_) => write!(f, "Unknown error"),
        }
    }
}

/// Classified result of one upload request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    Duplicate,
    Retryable(FailureReason),
}

impl AttemptOutcome {
    /// Classify a response status
    ///
    /// Philomena answers 400 when an image with the same hash exists.
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_success() {
            Self::Success
        } else if status == StatusCode::BAD_REQUEST {
            Self::Duplicate
        } else {
            Self::Retryable(FailureReason::Status(status.as_u16()))
        }
    }
}

/// Running totals across all images handled by a driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Upload requests issued
    pub attempts: u64,
    /// Attempts that ended in a retryable failure
    pub failures: u64,
}

/// Uploads images to a target booru
#[derive(Debug)]
pub struct UploadDriver {
    client: HttpClient,
    target: Booru,
    policy: RetryPolicy,
    stats: DriverStats,
}

impl UploadDriver {
    /// Create a new upload driver
    pub fn new(client: HttpClient, target: Booru, policy: RetryPolicy) -> Self {
        Self {
            client,
            target,
            policy,
            stats: DriverStats::default(),
        }
    }

    /// Retry policy in use
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Totals so far
    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    /// Issue exactly one upload request and classify the result
    pub async fn attempt(&mut self, image: &ImageRecord) -> Result<AttemptOutcome> {
        let url = self.target.upload_url()?;
        let body = UploadBody::from(image);

        self.stats.attempts += 1;
        match self.client.post_json(&url, &body).await {
            Ok(status) => Ok(AttemptOutcome::from_status(status)),
            Err(Error::Http(e)) => Ok(AttemptOutcome::Retryable(FailureReason::Unknown(
                e.to_string(),
            ))),
            Err(e) => Err(e),
        }
    }

    /// Upload one image, retrying transient failures with backoff
    ///
    /// Returns once the target has the image. Without an attempt ceiling
    /// in the policy this only returns an error if the upload URL cannot
    /// be built.
    pub async fn upload_one(
        &mut self,
        image: &ImageRecord,
        sink: &mut dyn ProgressSink,
    ) -> Result<UploadOutcome> {
        let mut backoff = self.policy.backoff();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            sink.emit(Event::UploadAttempt {
                image_id: image.id,
                attempt: attempts,
            });

            match self.attempt(image).await? {
                AttemptOutcome::Success => {
                    info!(image_id = image.id, attempts, "Uploaded image");
                    sink.emit(Event::Uploaded { image_id: image.id });
                    return Ok(UploadOutcome::Uploaded);
                }
                AttemptOutcome::Duplicate => {
                    info!(image_id = image.id, "Image has already been uploaded");
                    sink.emit(Event::AlreadyUploaded { image_id: image.id });
                    return Ok(UploadOutcome::AlreadyExists);
                }
                AttemptOutcome::Retryable(reason) => {
                    self.stats.failures += 1;
                    if let FailureReason::Unknown(detail) = &reason {
                        debug!(image_id = image.id, "Upload failed without response: {detail}");
                    }
                    warn!(image_id = image.id, attempts, "Error uploading image ({reason})");
                    sink.emit(Event::UploadFailed {
                        image_id: image.id,
                        reason,
                    });

                    if !self.policy.allows_attempt(attempts) {
                        return Err(Error::MaxAttemptsExceeded {
                            image_id: image.id,
                            attempts,
                        });
                    }

                    let delay = backoff.next_delay();
                    sink.emit(Event::RetryScheduled {
                        image_id: image.id,
                        delay,
                    });
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Fixed wait between images
    pub async fn pace(&self) {
        tokio::time::sleep(self.policy.base_delay).await;
    }
}
