//! Human-readable progress output

use crate::engine::{Event, ProgressSink};
use std::io::Write;
use tracing::warn;

/// Prints progress events as lines of text
pub struct ConsoleSink<W: Write> {
    out: W,
    verbose: bool,
    current: Option<(u64, u64)>,
}

impl ConsoleSink<std::io::Stdout> {
    /// Print to stdout
    pub fn stdout(verbose: bool) -> Self {
        Self::new(std::io::stdout(), verbose)
    }
}

impl<W: Write> ConsoleSink<W> {
    /// Print to any writer
    pub fn new(out: W, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            current: None,
        }
    }

    /// Get the writer back
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl std::fmt::Display) {
        if let Err(e) = writeln!(self.out, "{text}") {
            warn!(error = %e, "Failed to write progress");
        }
    }
}

impl<W: Write> ProgressSink for ConsoleSink<W> {
    fn emit(&mut self, event: Event) {
        match &event {
            Event::PageFetched { .. } if !self.verbose => {}
            Event::ImageStarted { index, total, .. } => {
                self.current = Some((*index, *total));
                self.line(&event);
            }
            Event::UploadAttempt { attempt: 1, .. } => {}
            Event::UploadAttempt { image_id, attempt } => {
                if let Some((index, total)) = self.current {
                    self.line(format_args!(
                        "Uploading image {index}/{total} ({image_id})... attempt {attempt}"
                    ));
                }
            }
            _ => self.line(&event),
        }
    }
}
