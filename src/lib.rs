//! xml-records - streaming extraction of flat, typed records from XML
//!
//! Provides:
//! - Configuration loading (root path and column schema)
//! - A single-pass record assembler over quick-xml events
//! - Type coercion for string, long, double, boolean, timestamp, and JSON columns
//! - Paged record output, flushed once per input file
//!
//! # Example
//!
//! ```rust
//! use xml_records::{ColumnConfig, ColumnType, Extractor, ParserConfig, Value};
//!
//! let config = ParserConfig::new(
//!     "catalog/book",
//!     vec![
//!         ColumnConfig::new("title", ColumnType::String),
//!         ColumnConfig::new("meta/pages", ColumnType::Long),
//!     ],
//! );
//! let extractor = Extractor::new(config).unwrap();
//! let records = extractor
//!     .extract_str("<catalog><book><title>Dune</title><meta><pages>412</pages></meta></book></catalog>")
//!     .unwrap();
//!
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].get(1), Some(&Value::Long(412)));
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod extract;
pub mod models;
pub mod output;

// Re-export commonly used types
pub use config::{ColumnConfig, ConfigError, ParserConfig};
pub use extract::{
    CoercionError, ExtractError, ExtractResult, Extractor, FileInput, InputFile, MemoryInput,
    PathInput, RecordAssembler, RunSummary, XmlEvent, XmlTokenizer,
};
pub use models::{Column, ColumnType, Page, Record, Schema, Value};
pub use output::{CollectingOutput, JsonLinesOutput, OutputError, PageBuilder, PageOutput};
