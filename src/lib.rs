// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]

//! # Philomena Copier
//!
//! Copies the images matching a search query from one Philomena booru to
//! another. Images are re-created on the target from their metadata and a
//! remote URL; no image bytes pass through this tool.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use philomena_copier::{Booru, Copier, CopierConfig, Event, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let source = Booru::new("derpibooru.org", "SOURCEKEY0123456789a")?;
//!     let target = Booru::new("ponerpics.org", "TARGETKEY0123456789a")?;
//!
//!     let mut copier = Copier::new(&CopierConfig::default(), source, target, "safe, pony")?;
//!     let mut events: Vec<Event> = Vec::new();
//!     let stats = copier.run(&mut events).await?;
//!
//!     println!("{} uploaded, {} already present", stats.uploaded, stats.already_present);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!   source booru                                   target booru
//!  ┌──────────────┐   SearchPage   ┌──────────────┐  POST   ┌─────┐
//!  │QueryPaginator│ ─────────────▶ │    Copier    │ ──────▶ │     │
//!  │ page 1, 2, … │ ◀───────────── │ UploadDriver │ ◀────── │     │
//!  └──────────────┘   next page    │ retry/backoff│ 2xx/400 └─────┘
//!                                  └──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// API wire types
pub mod types;

/// Run configuration
pub mod config;

/// HTTP client and booru addressing
pub mod http;

/// Search query pagination
pub mod pagination;

/// Upload driver with retry and backoff
pub mod upload;

/// Main copy loop
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::CopierConfig;
pub use engine::{CopyStats, Copier, Event, ProgressSink};
pub use error::{Error, Result};
pub use http::Booru;
pub use types::{ImageRecord, SearchPage};
pub use upload::{RetryPolicy, UploadOutcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
