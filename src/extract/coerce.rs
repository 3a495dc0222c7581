//! Conversion of captured element text into typed column values

use crate::models::{Column, ColumnType, Value};

use super::timestamp::TimestampParser;

/// Error raised when captured text cannot be represented in its column's type
///
/// Both variants carry the column name and the raw text so a failing document can be located.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoercionError {
    #[error("Invalid number '{raw}' for column '{column}': {reason}")]
    InvalidNumber {
        column: String,
        raw: String,
        reason: String,
    },

    #[error("Invalid timestamp '{raw}' for column '{column}': {reason}")]
    InvalidTimestamp {
        column: String,
        raw: String,
        reason: String,
    },
}

impl CoercionError {
    /// Name of the column the text was captured for
    pub fn column(&self) -> &str {
        match self {
            CoercionError::InvalidNumber { column, .. }
            | CoercionError::InvalidTimestamp { column, .. } => column,
        }
    }

    /// The rejected text
    pub fn raw(&self) -> &str {
        match self {
            CoercionError::InvalidNumber { raw, .. }
            | CoercionError::InvalidTimestamp { raw, .. } => raw,
        }
    }
}

/// Lenient boolean parse: `true` in any letter case is true, everything else is false.
///
/// This never fails. Text such as `"1"`, `"yes"`, `"False "` or an empty element all read as
/// `false`, so malformed boolean input is silently accepted. Existing data depends on this, so
/// it must not be tightened.
pub fn parse_lenient_bool(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}

/// Convert captured text to the column's declared type
///
/// Numbers are parsed strictly: surrounding whitespace is not stripped. `timestamp` is the
/// column's parser and must be present for timestamp columns.
pub fn coerce(
    raw: String,
    column: &Column,
    timestamp: Option<&TimestampParser>,
) -> Result<Value, CoercionError> {
    match column.column_type {
        ColumnType::String => Ok(Value::String(raw)),
        ColumnType::Json => Ok(Value::Json(raw)),
        ColumnType::Boolean => Ok(Value::Boolean(parse_lenient_bool(&raw))),
        ColumnType::Long => match raw.parse::<i64>() {
            Ok(v) => Ok(Value::Long(v)),
            Err(e) => Err(CoercionError::InvalidNumber {
                column: column.name.clone(),
                reason: e.to_string(),
                raw,
            }),
        },
        ColumnType::Double => match parse_double(&raw) {
            Ok(v) => Ok(Value::Double(v)),
            Err(reason) => Err(CoercionError::InvalidNumber {
                column: column.name.clone(),
                reason,
                raw,
            }),
        },
        ColumnType::Timestamp => {
            let result = match timestamp {
                Some(parser) => parser.parse(&raw),
                None => Err("no timestamp parser configured".to_string()),
            };
            match result {
                Ok(instant) => Ok(Value::Timestamp(instant)),
                Err(reason) => Err(CoercionError::InvalidTimestamp {
                    column: column.name.clone(),
                    raw,
                    reason,
                }),
            }
        }
    }
}

/// Decimal or scientific notation; `inf` and `NaN` spellings are also accepted.
fn parse_double(raw: &str) -> Result<f64, String> {
    raw.parse::<f64>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn column(column_type: ColumnType) -> Column {
        Column::new("value", column_type)
    }

    #[test]
    fn test_coerce_string_is_identity() {
        let value = coerce("  なんか書く \n".to_string(), &column(ColumnType::String), None).unwrap();
        assert_eq!(value, Value::String("  なんか書く \n".to_string()));
    }

    #[test]
    fn test_coerce_json_keeps_raw_text() {
        let value = coerce("{not json".to_string(), &column(ColumnType::Json), None).unwrap();
        assert_eq!(value, Value::Json("{not json".to_string()));
    }

    #[test]
    fn test_coerce_long() {
        assert_eq!(
            coerce("42".to_string(), &column(ColumnType::Long), None).unwrap(),
            Value::Long(42)
        );
        assert_eq!(
            coerce("-7".to_string(), &column(ColumnType::Long), None).unwrap(),
            Value::Long(-7)
        );
    }

    #[test]
    fn test_coerce_long_rejects_whitespace_and_text() {
        for raw in [" 42", "42\n", "4.2", "abc", ""] {
            let err = coerce(raw.to_string(), &column(ColumnType::Long), None).unwrap_err();
            assert!(matches!(err, CoercionError::InvalidNumber { .. }));
            assert_eq!(err.column(), "value");
            assert_eq!(err.raw(), raw);
        }
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn test_coerce_double() {
        assert_eq!(
            coerce("3.14".to_string(), &column(ColumnType::Double), None).unwrap(),
            Value::Double(3.14)
        );
        assert_eq!(
            coerce("1e3".to_string(), &column(ColumnType::Double), None).unwrap(),
            Value::Double(1000.0)
        );
        assert!(matches!(
            coerce("three".to_string(), &column(ColumnType::Double), None),
            Err(CoercionError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_coerce_boolean_is_lenient() {
        for (raw, expected) in [
            ("true", true),
            ("TRUE", true),
            ("True", true),
            ("no", false),
            ("", false),
            ("False", false),
            ("1", false),
            (" true", false),
        ] {
            assert_eq!(
                coerce(raw.to_string(), &column(ColumnType::Boolean), None).unwrap(),
                Value::Boolean(expected),
                "raw {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_coerce_timestamp() {
        let parser = TimestampParser::new("%Y-%m-%dT%H:%M:%SZ", FixedOffset::east_opt(0).unwrap());
        let value = coerce(
            "2015-12-12T01:26:20Z".to_string(),
            &column(ColumnType::Timestamp),
            Some(&parser),
        )
        .unwrap();
        assert_eq!(value.as_timestamp().map(|t| t.timestamp()), Some(1449883580));
    }

    #[test]
    fn test_coerce_timestamp_failure_names_column_and_text() {
        let parser = TimestampParser::new("%Y-%m-%dT%H:%M:%SZ", FixedOffset::east_opt(0).unwrap());
        let err = coerce(
            "not a date".to_string(),
            &Column::new("revision/timestamp", ColumnType::Timestamp),
            Some(&parser),
        )
        .unwrap_err();
        assert!(matches!(err, CoercionError::InvalidTimestamp { .. }));
        assert_eq!(err.column(), "revision/timestamp");
        assert_eq!(err.raw(), "not a date");
        assert!(err.to_string().contains("revision/timestamp"));
    }
}
