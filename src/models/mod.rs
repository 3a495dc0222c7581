//! Models module
//!
//! Defines the schema and record structures shared by configuration, extraction, and
//! output.

pub mod column;
pub mod enums;
pub mod value;

pub use column::{Column, OPTION_FORMAT, OPTION_TIMEZONE, Schema};
pub use enums::ColumnType;
pub use value::{Page, Record, Value};
