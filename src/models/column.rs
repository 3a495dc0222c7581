//! Column and schema models

use super::enums::ColumnType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Column option naming the timestamp format
pub const OPTION_FORMAT: &str = "format";

/// Column option naming the timestamp timezone
pub const OPTION_TIMEZONE: &str = "timezone";

/// Column model representing one field of an extracted record
///
/// The column name is a path relative to the record root, using `/` as separator
/// (for example `revision/text`). It is matched verbatim against the open element path.
///
/// # Example
///
/// ```rust
/// use xml_records::models::{Column, ColumnType};
///
/// let column = Column::new("revision/timestamp", ColumnType::Timestamp)
///     .with_option("format", "%Y-%m-%dT%H:%M:%SZ");
/// assert_eq!(column.option("format"), Some("%Y-%m-%dT%H:%M:%SZ"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    /// Position of the column in its schema
    #[serde(default)]
    pub index: usize,
    /// Root-relative element path
    pub name: String,
    /// Declared scalar type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Type-specific options, such as a timestamp `format` or `timezone`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

impl Column {
    /// Create a new column with no options
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            index: 0,
            name: name.into(),
            column_type,
            options: BTreeMap::new(),
        }
    }

    /// Add a type-specific option
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Look up a type-specific option
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

/// Ordered, immutable set of columns
///
/// Column order determines record field order. A path-keyed lookup table is built once
/// here so matching an element path is a single hash lookup rather than a scan.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Schema {
    columns: Vec<Column>,
    #[serde(skip)]
    by_path: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema, assigning each column its position
    ///
    /// Names are expected to be unique. When they are not, lookups resolve to the first
    /// column with that name.
    pub fn new(columns: Vec<Column>) -> Self {
        let mut by_path = HashMap::with_capacity(columns.len());
        let columns: Vec<Column> = columns
            .into_iter()
            .enumerate()
            .map(|(index, mut column)| {
                column.index = index;
                if by_path.contains_key(&column.name) {
                    tracing::warn!(
                        "Duplicate column name '{}' at position {}; the first definition is used for matching",
                        column.name,
                        index
                    );
                } else {
                    by_path.insert(column.name.clone(), index);
                }
                column
            })
            .collect();

        Self { columns, by_path }
    }

    /// Columns in schema order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get a column by position
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Find the column whose name equals a root-relative path (exact, case-sensitive)
    pub fn lookup(&self, relative_path: &str) -> Option<&Column> {
        self.by_path
            .get(relative_path)
            .and_then(|&index| self.columns.get(index))
    }
}
