//! JSON lines output
//!
//! Writes each record as one JSON object per line, keyed by column name in schema order.
//! Absent values are written as `null`.

use std::io::Write;

use crate::models::{Page, Schema};

use super::{OutputError, OutputResult, PageOutput};

/// Writes records as newline-delimited JSON
pub struct JsonLinesOutput<W: Write> {
    writer: W,
    schema: Schema,
    records_written: usize,
    finished: bool,
}

impl<W: Write> JsonLinesOutput<W> {
    pub fn new(writer: W, schema: Schema) -> Self {
        Self {
            writer,
            schema,
            records_written: 0,
            finished: false,
        }
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PageOutput for JsonLinesOutput<W> {
    fn add(&mut self, page: Page) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::AlreadyFinished);
        }
        for record in page.records() {
            let object = serde_json::Value::Object(record.to_json(&self.schema));
            serde_json::to_writer(&mut self.writer, &object)
                .map_err(|e| OutputError::SerializationError(e.to_string()))?;
            self.writer
                .write_all(b"\n")
                .map_err(|e| OutputError::WriteFailed(e.to_string()))?;
            self.records_written += 1;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished = true;
        self.writer
            .flush()
            .map_err(|e| OutputError::WriteFailed(e.to_string()))
    }

    fn close(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!("Failed to flush output on close: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Column, ColumnType, Record, Value};

    #[test]
    fn test_writes_one_object_per_line() {
        let schema = Schema::new(vec![
            Column::new("id", ColumnType::Long),
            Column::new("title", ColumnType::String),
            Column::new("flag", ColumnType::Boolean),
        ]);
        let mut output = JsonLinesOutput::new(Vec::new(), schema);

        let mut page = Page::with_capacity(2);
        let mut first = Record::new(3);
        first.set(0, Value::Long(1));
        first.set(1, Value::String("a \"quoted\" title".to_string()));
        first.set(2, Value::Boolean(true));
        page.push(first);
        page.push(Record::new(3));

        output.add(page).unwrap();
        output.finish().unwrap();
        assert_eq!(output.records_written(), 2);

        let text = String::from_utf8(output.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"id":1,"title":"a \"quoted\" title","flag":true}"#
        );
        assert_eq!(lines[1], r#"{"id":null,"title":null,"flag":null}"#);
    }

    #[test]
    fn test_add_after_finish_fails() {
        let schema = Schema::new(vec![Column::new("id", ColumnType::Long)]);
        let mut output = JsonLinesOutput::new(Vec::new(), schema);
        output.finish().unwrap();
        assert!(matches!(
            output.add(Page::default()),
            Err(OutputError::AlreadyFinished)
        ));
    }
}
