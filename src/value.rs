//! The closed value set crossing the mapping boundary.
//!
//! Records decompose into `Value`s on the way into a statement and are
//! rebuilt from `Value`s on the way out of a result row. The set is
//! deliberately closed: a store type outside it (a blob, for example)
//! is an error, not a new variant.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    /// Stored as integer 0/1.
    Boolean(bool),
    /// Stored as RFC 3339 text.
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Variant name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Boolean(_) => "boolean",
            Value::Timestamp(_) => "timestamp",
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Real(f64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

/// A `Value` could not be converted into the requested field type.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("expected {expected}, got {actual}")]
pub struct TypeMismatch {
    pub expected: &'static str,
    pub actual: String,
}

impl TypeMismatch {
    fn new(expected: &'static str, value: &Value) -> Self {
        Self {
            expected,
            actual: value.kind().to_string(),
        }
    }
}

/// Rebuild a field value from a column `Value`.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, TypeMismatch>;
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, TypeMismatch> {
        match value {
            Value::Integer(v) => Ok(v),
            other => Err(TypeMismatch::new("integer", &other)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self, TypeMismatch> {
        match value {
            Value::Integer(v) => i32::try_from(v).map_err(|_| TypeMismatch {
                expected: "32-bit integer",
                actual: format!("integer {v}"),
            }),
            other => Err(TypeMismatch::new("integer", &other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, TypeMismatch> {
        match value {
            Value::Real(v) => Ok(v),
            // SQLite numeric affinity: integer columns bind into real fields.
            Value::Integer(v) => Ok(v as f64),
            other => Err(TypeMismatch::new("real", &other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, TypeMismatch> {
        match value {
            Value::Boolean(v) => Ok(v),
            Value::Integer(0) => Ok(false),
            Value::Integer(1) => Ok(true),
            other => Err(TypeMismatch::new("boolean", &other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, TypeMismatch> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(TypeMismatch::new("text", &other)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> Result<Self, TypeMismatch> {
        match value {
            Value::Timestamp(v) => Ok(v),
            Value::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| TypeMismatch {
                    expected: "RFC 3339 timestamp",
                    actual: format!("text {s:?}"),
                }),
            other => Err(TypeMismatch::new("timestamp", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, TypeMismatch> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_option_converts_in_both_directions() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(5_i64)), Value::Integer(5));
        assert_eq!(Option::<i64>::from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<i64>::from_value(Value::Integer(5)).unwrap(),
            Some(5)
        );
    }

    #[test]
    fn test_integer_widens_into_real() {
        assert_eq!(f64::from_value(Value::Integer(3)).unwrap(), 3.0);
    }

    #[test]
    fn test_boolean_accepts_stored_integers() {
        assert!(!bool::from_value(Value::Integer(0)).unwrap());
        assert!(bool::from_value(Value::Integer(1)).unwrap());
        assert!(bool::from_value(Value::Integer(2)).is_err());
    }

    #[test]
    fn test_timestamp_parses_rfc3339_text() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let text = Value::Text(at.to_rfc3339());
        assert_eq!(DateTime::<Utc>::from_value(text).unwrap(), at);
        assert!(DateTime::<Utc>::from_value(Value::Text("not a time".into())).is_err());
    }

    #[test]
    fn test_narrowing_out_of_range_is_rejected() {
        let err = i32::from_value(Value::Integer(i64::from(i32::MAX) + 1)).unwrap_err();
        assert_eq!(err.expected, "32-bit integer");
    }

    #[test]
    fn test_mismatch_names_both_sides() {
        let err = i64::from_value(Value::Text("seven".into())).unwrap_err();
        assert_eq!(err.expected, "integer");
        assert_eq!(err.actual, "text");
    }
}
