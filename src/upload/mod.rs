//! Upload module
//!
//! Creates images on the target booru.
//!
//! # Overview
//!
//! Each image is resolved completely before the next one starts:
//! - 2xx: uploaded
//! - 400: already present on the target (duplicate hash)
//! - anything else, or no response: wait, double the delay, try again

mod backoff;
mod driver;

pub use backoff::{Backoff, RetryPolicy};
pub use driver::{AttemptOutcome, DriverStats, FailureReason, UploadDriver, UploadOutcome};
