//! Document driver
//!
//! Runs the assembler over each input file in turn, flushing the page builder after every
//! completed file and finishing the output after the last one.

use serde::Serialize;
use std::io::BufRead;
use tracing::{info, warn};

use crate::config::{ConfigError, ParserConfig};
use crate::models::{ColumnType, Record, Schema};
use crate::output::{CollectingOutput, PageBuilder, PageOutput};

use super::ExtractError;
use super::engine::RecordAssembler;
use super::input::{FileInput, MemoryInput};
use super::path::RootPath;
use super::resolver::MatchResolver;
use super::timestamp::TimestampParser;
use super::tokenizer::XmlTokenizer;

/// Counts reported at the end of a successful run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Input files processed
    pub files: usize,
    /// Records delivered to the output
    pub records: usize,
    /// Partial records dropped because a document ended inside a root element
    pub discarded_partial_records: usize,
}

/// Counts for one parsed document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentSummary {
    pub records: usize,
    pub discarded_partial_records: usize,
}

/// Extraction run built from a validated configuration
///
/// The schema, root path, and timestamp parsers are built once here and shared read-only by
/// every document in the run.
#[derive(Debug, Clone)]
pub struct Extractor {
    resolver: MatchResolver,
    timestamp_parsers: Vec<Option<TimestampParser>>,
    page_size: usize,
}

impl Extractor {
    /// Validate the configuration and prepare the run
    pub fn new(config: ParserConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let schema = config.to_schema();
        let timestamp_parsers = schema
            .columns()
            .iter()
            .map(|column| match column.column_type {
                ColumnType::Timestamp => TimestampParser::for_column(
                    column,
                    &config.default_timestamp_format,
                    &config.default_timezone,
                )
                .map(Some),
                _ => Ok(None),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let root = RootPath::new(config.root)?;
        Ok(Self {
            resolver: MatchResolver::new(root, schema),
            timestamp_parsers,
            page_size: config.page_size,
        })
    }

    pub fn schema(&self) -> &Schema {
        self.resolver.schema()
    }

    pub fn root(&self) -> &RootPath {
        self.resolver.root()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Create a fresh assembler for one document
    pub fn assembler(&self) -> RecordAssembler<'_> {
        RecordAssembler::new(&self.resolver, &self.timestamp_parsers)
    }

    /// Parse one document to completion, adding its records to `builder`
    ///
    /// Full pages reach the output as they fill. The trailing partial page is left in the
    /// builder; callers flush it once the whole document succeeded.
    pub fn parse_document<R, O>(
        &self,
        source: R,
        input_name: &str,
        builder: &mut PageBuilder<O>,
    ) -> Result<DocumentSummary, ExtractError>
    where
        R: BufRead,
        O: PageOutput,
    {
        let mut tokenizer = XmlTokenizer::new(source, input_name);
        let mut assembler = self.assembler();

        while let Some(event) = tokenizer.next_event()? {
            if let Some(record) = assembler.handle(event)? {
                builder.add_record(record)?;
            }
        }

        Ok(DocumentSummary {
            records: assembler.emitted(),
            discarded_partial_records: assembler.discarded(),
        })
    }

    /// Extract every input file into `output`
    ///
    /// Files are parsed strictly one after another. On success the output is finished. On any
    /// error the current file's partial page is dropped and the output is closed without being
    /// finished, so nothing from the run is committed.
    pub fn run<F, O>(&self, input: &mut F, output: O) -> Result<RunSummary, ExtractError>
    where
        F: FileInput,
        O: PageOutput,
    {
        let mut builder = PageBuilder::new(output, self.page_size);
        let mut summary = RunSummary::default();

        while let Some(file) = input.next_file()? {
            let document = match self.parse_document(file.reader, &file.name, &mut builder) {
                Ok(document) => document,
                Err(e) => {
                    let dropped = builder.discard();
                    warn!(
                        "Extraction of {} failed; {} buffered records dropped",
                        file.name, dropped
                    );
                    return Err(e);
                }
            };
            builder.flush()?;

            info!("Extracted {} records from {}", document.records, file.name);
            summary.files += 1;
            summary.records += document.records;
            summary.discarded_partial_records += document.discarded_partial_records;
        }

        builder.finish()?;
        info!(
            "Extraction finished: {} records from {} files",
            summary.records, summary.files
        );
        Ok(summary)
    }

    /// Extract the records of a single in-memory document
    pub fn extract_str(&self, xml: &str) -> Result<Vec<Record>, ExtractError> {
        let mut input = MemoryInput::new().with_file("<memory>", xml);
        let mut output = CollectingOutput::new();
        self.run(&mut input, &mut output)?;
        Ok(output.into_records())
    }
}
