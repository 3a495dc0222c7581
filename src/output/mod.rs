//! Paged record output
//!
//! Extracted records are buffered by a [`PageBuilder`] and reach a [`PageOutput`] only when
//! the builder is flushed, which the driver does once per completed input file.

pub mod collecting;
pub mod json_lines;
pub mod page_builder;

pub use collecting::CollectingOutput;
pub use json_lines::JsonLinesOutput;
pub use page_builder::PageBuilder;

use crate::models::Page;

/// Error type for output operations
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// Writing to the destination failed
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// Record could not be serialised
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Output used after it was finished
    #[error("Output already finished")]
    AlreadyFinished,
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for pages of finished records
///
/// `finish` is called once after the last input file when the run succeeds. `close` is called
/// exactly once on every exit path, after `finish` on success or instead of it on failure.
pub trait PageOutput {
    /// Accept one page of records
    fn add(&mut self, page: Page) -> OutputResult<()>;

    /// Commit everything added so far
    fn finish(&mut self) -> OutputResult<()>;

    /// Release resources
    fn close(&mut self) {}
}

impl<T: PageOutput + ?Sized> PageOutput for &mut T {
    fn add(&mut self, page: Page) -> OutputResult<()> {
        (**self).add(page)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

impl<T: PageOutput + ?Sized> PageOutput for Box<T> {
    fn add(&mut self, page: Page) -> OutputResult<()> {
        (**self).add(page)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }

    fn close(&mut self) {
        (**self).close()
    }
}
