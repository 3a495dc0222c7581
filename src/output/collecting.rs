//! In-memory output

use crate::models::{Page, Record};

use super::{OutputError, OutputResult, PageOutput};

/// Keeps every delivered page in memory
#[derive(Debug, Default)]
pub struct CollectingOutput {
    pages: Vec<Page>,
    finished: bool,
    closed: bool,
}

impl CollectingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Iterate over all delivered records in order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.pages.iter().flat_map(|page| page.records().iter())
    }

    pub fn record_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.pages.into_iter().flat_map(Page::into_records).collect()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl PageOutput for CollectingOutput {
    fn add(&mut self, page: Page) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::AlreadyFinished);
        }
        self.pages.push(page);
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished = true;
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
