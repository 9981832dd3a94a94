//! Parameter specs and argument binding for the registered operations.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{BroomError, Result};

/// Keyword arguments as recorded: parameter name to literal value.
pub type Kwargs = IndexMap<String, Value>;

/// Default value of an operation parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamDefault {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl ParamDefault {
    /// The default as a literal value.
    pub fn to_value(self) -> Value {
        match self {
            ParamDefault::Null => Value::Null,
            ParamDefault::Bool(b) => Value::Bool(b),
            ParamDefault::Int(i) => Value::from(i),
            ParamDefault::Float(f) => Value::from(f),
        }
    }
}

/// A named parameter an operation accepts, in positional order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub default: ParamDefault,
}

impl ParamSpec {
    pub const fn new(name: &'static str, default: ParamDefault) -> Self {
        Self { name, default }
    }
}

/// Arguments bound to an operation's parameter list, with defaults filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    operation: &'static str,
    values: IndexMap<&'static str, Value>,
}

impl Params {
    /// Bind positional `args` and keyword `kwargs` against `specs`.
    ///
    /// Mirrors keyword-call semantics: positional arguments fill parameters in
    /// order, keywords by name, and anything left takes its default.
    pub fn bind(
        operation: &'static str,
        specs: &'static [ParamSpec],
        args: &[Value],
        kwargs: &Kwargs,
    ) -> Result<Self> {
        if args.len() > specs.len() {
            return Err(BroomError::input_type(
                operation,
                format!(
                    "takes {} positional argument(s) but {} were given",
                    specs.len(),
                    args.len()
                ),
            ));
        }

        let mut values: IndexMap<&'static str, Value> = specs
            .iter()
            .map(|spec| (spec.name, spec.default.to_value()))
            .collect();

        for (spec, value) in specs.iter().zip(args) {
            values.insert(spec.name, value.clone());
        }

        for (key, value) in kwargs {
            let position = specs.iter().position(|s| s.name == key.as_str()).ok_or_else(|| {
                BroomError::input_type(operation, format!("unexpected keyword argument '{}'", key))
            })?;
            if position < args.len() {
                return Err(BroomError::input_type(
                    operation,
                    format!("got multiple values for argument '{}'", key),
                ));
            }
            values.insert(specs[position].name, value.clone());
        }

        Ok(Self { operation, values })
    }

    /// Iterate over `(name, value)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    fn require(&self, name: &str) -> Result<&Value> {
        self.get(name).ok_or_else(|| {
            BroomError::input_type(self.operation, format!("missing parameter '{}'", name))
        })
    }

    fn mistyped(&self, name: &str, expected: &str, value: &Value) -> BroomError {
        BroomError::input_type(
            self.operation,
            format!("parameter '{}' must be {}, got {}", name, expected, value),
        )
    }

    pub fn f64(&self, name: &str) -> Result<f64> {
        let value = self.require(name)?;
        value
            .as_f64()
            .ok_or_else(|| self.mistyped(name, "a number", value))
    }

    pub fn usize(&self, name: &str) -> Result<usize> {
        let value = self.require(name)?;
        if let Some(n) = value.as_u64() {
            return usize::try_from(n).map_err(|_| self.mistyped(name, "a row index", value));
        }
        match value.as_f64() {
            Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Ok(f as usize),
            _ => Err(self.mistyped(name, "a non-negative integer", value)),
        }
    }

    pub fn bool(&self, name: &str) -> Result<bool> {
        let value = self.require(name)?;
        value
            .as_bool()
            .ok_or_else(|| self.mistyped(name, "a boolean", value))
    }

    /// A list of names; a single string is accepted as a one-element list and null as absent.
    pub fn string_list(&self, name: &str) -> Result<Option<Vec<String>>> {
        match self.require(name)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(vec![s.clone()])),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| self.mistyped(name, "a list of column names", item))
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            other => Err(self.mistyped(name, "a list of column names", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SPECS: &[ParamSpec] = &[
        ParamSpec::new("row_index", ParamDefault::Int(0)),
        ParamSpec::new("drop_promoted_row", ParamDefault::Bool(true)),
    ];

    fn kwargs(pairs: &[(&str, Value)]) -> Kwargs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_defaults_fill_missing() {
        let params = Params::bind("op", SPECS, &[], &Kwargs::new()).unwrap();
        assert_eq!(params.usize("row_index").unwrap(), 0);
        assert!(params.bool("drop_promoted_row").unwrap());
    }

    #[test]
    fn test_positional_then_keyword() {
        let params = Params::bind(
            "op",
            SPECS,
            &[json!(2)],
            &kwargs(&[("drop_promoted_row", json!(false))]),
        )
        .unwrap();
        assert_eq!(params.usize("row_index").unwrap(), 2);
        assert!(!params.bool("drop_promoted_row").unwrap());
    }

    #[test]
    fn test_rejects_unknown_keyword() {
        let err = Params::bind("op", SPECS, &[], &kwargs(&[("nope", json!(1))])).unwrap_err();
        assert!(matches!(err, BroomError::InputType { .. }));
    }

    #[test]
    fn test_rejects_duplicate_argument() {
        let err = Params::bind("op", SPECS, &[json!(1)], &kwargs(&[("row_index", json!(1))]))
            .unwrap_err();
        assert!(err.to_string().contains("multiple values"));
    }

    #[test]
    fn test_rejects_too_many_positional() {
        let err = Params::bind("op", SPECS, &[json!(1), json!(true), json!(3)], &Kwargs::new())
            .unwrap_err();
        assert!(matches!(err, BroomError::InputType { .. }));
    }

    #[test]
    fn test_type_mismatch() {
        let params = Params::bind("op", SPECS, &[json!("first")], &Kwargs::new()).unwrap();
        assert!(params.usize("row_index").is_err());
    }

    #[test]
    fn test_string_list_forms() {
        const COLUMNS: &[ParamSpec] = &[ParamSpec::new("columns", ParamDefault::Null)];
        let specs = COLUMNS;
        let none = Params::bind("op", specs, &[], &Kwargs::new()).unwrap();
        assert_eq!(none.string_list("columns").unwrap(), None);

        let single = Params::bind("op", specs, &[json!("a")], &Kwargs::new()).unwrap();
        assert_eq!(single.string_list("columns").unwrap(), Some(vec!["a".to_string()]));

        let bad = Params::bind("op", specs, &[json!([1])], &Kwargs::new()).unwrap();
        assert!(bad.string_list("columns").is_err());
    }
}
