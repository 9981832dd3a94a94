//! Scalar cell values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single table cell. Columns may mix cell kinds freely.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Whether this cell counts as missing. NaN floats are missing too.
    pub fn is_null(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// The text content, if this is a text cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Infer a cell from raw text read out of a delimited file.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_null_token(trimmed) {
            return Cell::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Cell::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return Cell::Float(f);
            }
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Cell::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Cell::Bool(false);
        }
        Cell::Text(raw.to_string())
    }

    /// Build a cell from a JSON value. Nested arrays and objects are kept as their JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Int(i),
                None => n.as_f64().map(Cell::Float).unwrap_or(Cell::Null),
            },
            Value::String(s) => Cell::Text(s.clone()),
            other => Cell::Text(other.to_string()),
        }
    }

    /// Convert back to a JSON value for export.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            Cell::Null => Value::Null,
            Cell::Bool(b) => Value::Bool(*b),
            Cell::Int(i) => Value::from(*i),
            Cell::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Cell::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(x) if x.is_nan() => Ok(()),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Null)
    }
}

/// Check if raw text represents a missing value.
pub fn is_null_token(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_kinds() {
        assert_eq!(Cell::infer("42"), Cell::Int(42));
        assert_eq!(Cell::infer("3.5"), Cell::Float(3.5));
        assert_eq!(Cell::infer("TRUE"), Cell::Bool(true));
        assert_eq!(Cell::infer("Alice"), Cell::Text("Alice".to_string()));
        assert_eq!(Cell::infer(""), Cell::Null);
        assert_eq!(Cell::infer("NA"), Cell::Null);
    }

    #[test]
    fn test_infer_keeps_untrimmed_text() {
        assert_eq!(Cell::infer(" New York "), Cell::Text(" New York ".to_string()));
    }

    #[test]
    fn test_nan_is_null() {
        assert!(Cell::Float(f64::NAN).is_null());
        assert!(!Cell::Float(0.0).is_null());
        assert!(!Cell::Text(String::new()).is_null());
    }

    #[test]
    fn test_json_conversion() {
        let value = serde_json::json!(7);
        assert_eq!(Cell::from_json(&value), Cell::Int(7));
        assert_eq!(Cell::Float(1.5).to_json(), serde_json::json!(1.5));
        assert_eq!(Cell::Null.to_json(), serde_json::Value::Null);
    }
}
