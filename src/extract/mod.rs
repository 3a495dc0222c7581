//! Streaming extraction
//!
//! Turns XML documents into records in a single pass, without building a tree:
//! - `tokenizer`: quick-xml backed event source
//! - `path` / `resolver`: open element path and column matching
//! - `coerce` / `timestamp`: typed conversion of captured text
//! - `engine`: the record assembler state machine
//! - `driver` / `input`: per-file iteration and output flushing

pub mod coerce;
pub mod driver;
pub mod engine;
pub mod input;
pub mod path;
pub mod resolver;
pub mod timestamp;
pub mod tokenizer;

pub use coerce::{CoercionError, coerce, parse_lenient_bool};
pub use driver::{DocumentSummary, Extractor, RunSummary};
pub use engine::{ActiveMatch, RecordAssembler};
pub use input::{FileInput, InputFile, MemoryInput, PathInput};
pub use path::{PathStack, RootPath};
pub use resolver::{MatchResolver, Resolution};
pub use timestamp::{TimestampParser, Timezone, parse_timezone};
pub use tokenizer::{XmlEvent, XmlTokenizer};

use crate::config::ConfigError;
use crate::output::OutputError;

/// Error type for extraction runs
///
/// Every variant aborts the run; there is no per-record skip policy.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Malformed XML reported by the tokenizer
    #[error("XML error in {input} at byte {position}: {message}")]
    Tokenizer {
        input: String,
        position: u64,
        message: String,
    },

    /// Captured text not representable in its column's type
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// Configuration rejected before any document was read
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Input could not be read
    #[error("IO error: {0}")]
    Io(String),

    /// Output rejected a page
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

/// Result type for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;
