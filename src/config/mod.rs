//! Parser configuration
//!
//! Handles parsing of YAML, TOML, and JSON configuration files naming the record root and
//! the column schema, plus environment variable overrides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::extract::timestamp::parse_timezone;
use crate::models::{Column, ColumnType, OPTION_TIMEZONE, Schema};

/// Default timestamp format for columns without a `format` option
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %z";

/// Default timezone for columns without a `timezone` option
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Default number of records per output page
pub const DEFAULT_PAGE_SIZE: usize = 1024;

/// Environment variable for the default timezone
pub const ENV_DEFAULT_TIMEZONE: &str = "XML_RECORDS_DEFAULT_TIMEZONE";

/// Environment variable for the page size
pub const ENV_PAGE_SIZE: &str = "XML_RECORDS_PAGE_SIZE";

/// Error type for configuration loading and validation
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration text could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Root path is malformed
    #[error("Invalid root path '{root}': {reason}")]
    InvalidRoot { root: String, reason: String },

    /// Column definition is malformed
    #[error("Invalid column '{name}': {reason}")]
    InvalidColumn { name: String, reason: String },

    /// Schema has no columns
    #[error("Schema must define at least one column")]
    EmptySchema,

    /// Timezone could not be resolved
    #[error("Unknown timezone '{0}'. Use an IANA name such as Asia/Tokyo, UTC, or a fixed offset such as +09:00.")]
    UnknownTimezone(String),

    /// Page size is zero
    #[error("Page size must be greater than zero")]
    InvalidPageSize,

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// One column entry in a configuration file
///
/// Keys other than `name` and `type` are collected as string options, so a timestamp column
/// reads `{ name: ..., type: timestamp, format: ..., timezone: ... }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnConfig {
    /// Root-relative element path
    pub name: String,
    /// Declared scalar type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Type-specific options
    #[serde(flatten)]
    pub options: BTreeMap<String, String>,
}

impl ColumnConfig {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            options: BTreeMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    fn to_column(&self) -> Column {
        Column {
            index: 0,
            name: self.name.clone(),
            column_type: self.column_type,
            options: self.options.clone(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParserConfig {
    /// `/`-joined path of the element that delimits one record
    pub root: String,

    /// Ordered column definitions
    pub schema: Vec<ColumnConfig>,

    /// Timezone for timestamp columns without their own `timezone` option
    #[serde(default = "default_timezone")]
    pub default_timezone: String,

    /// Format for timestamp columns without their own `format` option
    #[serde(default = "default_timestamp_format")]
    pub default_timestamp_format: String,

    /// Records buffered per output page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl ParserConfig {
    /// Create a configuration with default timestamp settings
    pub fn new(root: impl Into<String>, schema: Vec<ColumnConfig>) -> Self {
        Self {
            root: root.into(),
            schema,
            default_timezone: default_timezone(),
            default_timestamp_format: default_timestamp_format(),
            page_size: default_page_size(),
        }
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a file, choosing the format by extension
    ///
    /// `.toml` and `.json` are parsed as such; anything else is read as YAML.
    /// Environment overrides are applied after parsing.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Io(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        let mut config = match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => Self::from_yaml_str(&content)?,
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(timezone) = std::env::var(ENV_DEFAULT_TIMEZONE) {
            self.default_timezone = timezone;
        }

        if let Ok(size) = std::env::var(ENV_PAGE_SIZE)
            && let Ok(size) = size.parse()
        {
            self.page_size = size;
        }
    }

    /// Check the root path, column list, page size, and timezones
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(reason) = path_problem(&self.root) {
            return Err(ConfigError::InvalidRoot {
                root: self.root.clone(),
                reason,
            });
        }

        if self.schema.is_empty() {
            return Err(ConfigError::EmptySchema);
        }

        for column in &self.schema {
            if let Some(reason) = path_problem(&column.name) {
                return Err(ConfigError::InvalidColumn {
                    name: column.name.clone(),
                    reason,
                });
            }
            if let Some(timezone) = column.options.get(OPTION_TIMEZONE) {
                parse_timezone(timezone)?;
            }
        }

        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }

        parse_timezone(&self.default_timezone)?;
        Ok(())
    }

    /// Build the run's schema
    pub fn to_schema(&self) -> Schema {
        Schema::new(self.schema.iter().map(ColumnConfig::to_column).collect())
    }
}

fn path_problem(path: &str) -> Option<String> {
    if path.is_empty() {
        Some("path is empty".to_string())
    } else if path.starts_with('/') || path.ends_with('/') {
        Some("path must not start or end with '/'".to_string())
    } else if path.split('/').any(str::is_empty) {
        Some("path contains an empty segment".to_string())
    } else {
        None
    }
}

/// Generate a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# xml-records configuration
# Each close of the root element emits one record.
root: mediawiki/page

# Column names are element paths relative to the root.
schema:
  - { name: id, type: long }
  - { name: title, type: string }
  - { name: revision/timestamp, type: timestamp, format: "%Y-%m-%dT%H:%M:%SZ", timezone: UTC }
  - { name: revision/text, type: string }

# Used by timestamp columns without their own format/timezone
default_timezone: UTC
default_timestamp_format: "%Y-%m-%d %H:%M:%S%.f %z"

# Records buffered per output page
page_size: 1024
"#
}
