//! Record buffering in fixed-size pages

use crate::models::{Page, Record};

use super::{OutputResult, PageOutput};

/// Buffers records into pages and hands them to an output
///
/// A page is delivered as soon as it fills; only the current partial page is held until
/// [`PageBuilder::flush`]. Nothing delivered is committed until [`PageBuilder::finish`].
/// Dropping the builder discards the partial page and closes the output.
pub struct PageBuilder<O: PageOutput> {
    output: O,
    page_size: usize,
    current: Page,
    records_delivered: usize,
}

impl<O: PageOutput> PageBuilder<O> {
    /// Create a builder; a `page_size` of zero is treated as one
    pub fn new(output: O, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            output,
            page_size,
            current: Page::with_capacity(page_size),
            records_delivered: 0,
        }
    }

    /// Buffer a record, delivering the page if it is now full
    pub fn add_record(&mut self, record: Record) -> OutputResult<()> {
        self.current.push(record);
        if self.current.len() >= self.page_size {
            self.deliver_current()?;
        }
        Ok(())
    }

    /// Records in the current partial page
    pub fn buffered_records(&self) -> usize {
        self.current.len()
    }

    /// Records delivered to the output so far
    pub fn records_delivered(&self) -> usize {
        self.records_delivered
    }

    /// Deliver the current partial page, if any
    pub fn flush(&mut self) -> OutputResult<()> {
        if self.current.is_empty() {
            return Ok(());
        }
        self.deliver_current()
    }

    /// Drop the current partial page without delivering it
    pub fn discard(&mut self) -> usize {
        let dropped = self.current.len();
        self.current = Page::with_capacity(self.page_size);
        dropped
    }

    /// Flush and commit the output
    pub fn finish(&mut self) -> OutputResult<()> {
        self.flush()?;
        self.output.finish()
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    fn deliver_current(&mut self) -> OutputResult<()> {
        let page = std::mem::replace(&mut self.current, Page::with_capacity(self.page_size));
        self.records_delivered += page.len();
        self.output.add(page)
    }
}

impl<O: PageOutput> Drop for PageBuilder<O> {
    fn drop(&mut self) {
        let dropped = self.discard();
        if dropped > 0 {
            tracing::debug!("Discarding {} unflushed records", dropped);
        }
        self.output.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Value;
    use crate::output::CollectingOutput;

    fn record(n: i64) -> Record {
        let mut record = Record::new(1);
        record.set(0, Value::Long(n));
        record
    }

    #[test]
    fn test_full_pages_are_delivered_immediately() {
        let mut output = CollectingOutput::new();
        {
            let mut builder = PageBuilder::new(&mut output, 2);
            for n in 0..10_000 {
                builder.add_record(record(n)).unwrap();
                assert!(builder.buffered_records() < 2);
            }
            assert_eq!(builder.output().pages().len(), 5_000);
            assert_eq!(builder.records_delivered(), 10_000);
        }
        assert!(!output.is_finished());
    }

    #[test]
    fn test_partial_page_waits_for_flush() {
        let mut output = CollectingOutput::new();
        {
            let mut builder = PageBuilder::new(&mut output, 2);
            for n in 0..5 {
                builder.add_record(record(n)).unwrap();
            }
            assert_eq!(builder.buffered_records(), 1);
            assert_eq!(builder.output().record_count(), 4);
            builder.flush().unwrap();
            assert_eq!(builder.buffered_records(), 0);
            assert_eq!(builder.records_delivered(), 5);
        }
        let sizes: Vec<usize> = output.pages().iter().map(Page::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[test]
    fn test_drop_discards_partial_page_and_closes() {
        let mut output = CollectingOutput::new();
        {
            let mut builder = PageBuilder::new(&mut output, 10);
            builder.add_record(record(1)).unwrap();
        }
        assert_eq!(output.record_count(), 0);
        assert!(output.is_closed());
        assert!(!output.is_finished());
    }

    #[test]
    fn test_discard_drops_partial_page() {
        let mut output = CollectingOutput::new();
        {
            let mut builder = PageBuilder::new(&mut output, 10);
            builder.add_record(record(1)).unwrap();
            builder.flush().unwrap();
            builder.add_record(record(2)).unwrap();
            assert_eq!(builder.discard(), 1);
            builder.flush().unwrap();
        }
        assert_eq!(output.record_count(), 1);
    }

    #[test]
    fn test_finish_flushes_and_commits() {
        let mut output = CollectingOutput::new();
        {
            let mut builder = PageBuilder::new(&mut output, 10);
            builder.add_record(record(1)).unwrap();
            builder.finish().unwrap();
        }
        assert_eq!(output.record_count(), 1);
        assert!(output.is_finished());
        assert!(output.is_closed());
    }
}
