//! Typed values, records, and pages

use super::column::Schema;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// A typed value extracted from an element's text
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Long(i64),
    Double(f64),
    Boolean(bool),
    /// Parsed instant, normalised to UTC
    Timestamp(DateTime<Utc>),
    /// Raw JSON text, never parsed or validated
    Json(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Json(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert to a JSON value for line-oriented output
    ///
    /// Timestamps render as RFC 3339 text; JSON columns stay as their raw text.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::String(s) | Value::Json(s) => serde_json::Value::String(s.clone()),
            Value::Long(v) => serde_json::Value::from(*v),
            Value::Double(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Boolean(v) => serde_json::Value::Bool(*v),
            Value::Timestamp(v) => {
                serde_json::Value::String(v.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// One extracted row, holding a slot per schema column
///
/// Slots never written while the record was open stay `None`; no default is ever filled in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    values: Vec<Option<Value>>,
}

impl Record {
    /// Create a record with every slot absent
    pub fn new(width: usize) -> Self {
        Self {
            values: vec![None; width],
        }
    }

    /// Write a value into a column slot, replacing any earlier value
    pub fn set(&mut self, index: usize, value: Value) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = Some(value);
        }
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Look up a value by column name
    pub fn get_by_name(&self, schema: &Schema, name: &str) -> Option<&Value> {
        schema.lookup(name).and_then(|column| self.get(column.index))
    }

    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    pub fn width(&self) -> usize {
        self.values.len()
    }

    /// Render as a JSON object keyed by column name, in schema order
    ///
    /// Absent values become `null`.
    pub fn to_json(&self, schema: &Schema) -> serde_json::Map<String, serde_json::Value> {
        let mut object = serde_json::Map::with_capacity(schema.len());
        for column in schema.columns() {
            let value = self
                .get(column.index)
                .map(Value::to_json)
                .unwrap_or(serde_json::Value::Null);
            object.insert(column.name.clone(), value);
        }
        object
    }
}

/// A batch of records delivered to an output in one call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    records: Vec<Record>,
}

impl Page {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
