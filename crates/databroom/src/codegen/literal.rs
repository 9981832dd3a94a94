//! Literal text for parameters: Python-style rendering and parsing, R rendering.
//!
//! Text history lines carry parameters as a Python literal, e.g.
//! `{'threshold': 0.9}` or `(0.9,), {'columns': ['a', 'b']}` when positional
//! arguments were passed. Parsing accepts single- or double-quoted strings and
//! both `True/False/None` and `true/false/null`.

use serde_json::{Map, Number, Value};

use crate::error::{BroomError, Result};
use crate::transform::Kwargs;

/// Render call arguments the way a text history line stores them.
pub fn parameters_text(args: &[Value], kwargs: &Kwargs) -> String {
    let dict = python_dict(kwargs.iter());
    if args.is_empty() {
        return dict;
    }

    let items: Vec<String> = args.iter().map(python_literal).collect();
    let tuple = if items.len() == 1 {
        format!("({},)", items[0])
    } else {
        format!("({})", items.join(", "))
    };
    format!("{}, {}", tuple, dict)
}

/// Parse the parameter text of a history line back into positional and keyword arguments.
pub fn parse_parameters(text: &str) -> Result<(Vec<Value>, Kwargs)> {
    let (args, kwargs, consumed) = parse_parameters_prefix(text)?;
    if !text[consumed..].trim().is_empty() {
        return Err(LiteralParser::at(text, consumed).error("unexpected trailing text"));
    }
    Ok((args, kwargs))
}

/// Parse the parameter literal at the start of `text`.
///
/// Returns the arguments and the byte offset just past the literal, so
/// callers can inspect whatever follows it. Text starting with `.` holds no
/// parameters.
pub fn parse_parameters_prefix(text: &str) -> Result<(Vec<Value>, Kwargs, usize)> {
    let mut parser = LiteralParser::new(text);
    parser.skip_ws();
    if parser.at_end() || parser.peek() == Some('.') {
        return Ok((Vec::new(), Kwargs::new(), parser.pos));
    }

    let first = parser.value()?;
    let after_first = parser.pos;
    parser.skip_ws();

    let (args, kwargs) = if parser.eat(',') {
        let args = match first {
            Value::Array(items) => items,
            other => return Err(parser.error(&format!("expected a tuple of arguments, got {}", other))),
        };
        parser.skip_ws();
        let kwargs = match parser.value()? {
            Value::Object(map) => map.into_iter().collect(),
            other => return Err(parser.error(&format!("expected a keyword mapping, got {}", other))),
        };
        (args, kwargs)
    } else {
        parser.pos = after_first;
        match first {
            Value::Object(map) => (Vec::new(), map.into_iter().collect()),
            Value::Array(items) => (items, Kwargs::new()),
            other => return Err(parser.error(&format!("expected a mapping, got {}", other))),
        }
    };

    Ok((args, kwargs, parser.pos))
}

/// A value as Python source.
pub fn python_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => python_string(s),
        Value::Array(items) => format!(
            "[{}]",
            items.iter().map(python_literal).collect::<Vec<_>>().join(", ")
        ),
        Value::Object(map) => python_dict(map.iter()),
    }
}

/// A value as R source. Scalar lists become `c(...)`, anything nested becomes `list(...)`.
pub fn r_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => r_string(s),
        Value::Array(items) => {
            let inner = items.iter().map(r_literal).collect::<Vec<_>>().join(", ");
            if items.iter().all(is_scalar) {
                format!("c({})", inner)
            } else {
                format!("list({})", inner)
            }
        }
        Value::Object(map) => format!(
            "list({})",
            map.iter()
                .map(|(k, v)| format!("{} = {}", r_name(k), r_literal(v)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

/// A string as an R double-quoted literal.
pub fn r_string(s: &str) -> String {
    format!("\"{}\"", escape(s, '"'))
}

fn python_dict<'a>(entries: impl Iterator<Item = (&'a String, &'a Value)>) -> String {
    let body = entries
        .map(|(k, v)| format!("{}: {}", python_string(k), python_literal(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{}}}", body)
}

fn python_string(s: &str) -> String {
    if s.contains('\'') && !s.contains('"') {
        format!("\"{}\"", escape(s, '"'))
    } else {
        format!("'{}'", escape(s, '\''))
    }
}

fn escape(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 => {
            format!("{:.1}", f)
        }
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn r_name(name: &str) -> String {
    let mut chars = name.chars();
    let syntactic = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '.')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if syntactic {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "\\`"))
    }
}

/// Deepest container nesting accepted in parameter text.
const MAX_DEPTH: usize = 64;

/// Recursive-descent reader for Python/JSON literals.
struct LiteralParser<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> LiteralParser<'a> {
    fn new(text: &'a str) -> Self {
        Self::at(text, 0)
    }

    fn at(text: &'a str, pos: usize) -> Self {
        Self { text, pos, depth: 0 }
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        Ok(())
    }

    fn error(&self, message: &str) -> BroomError {
        BroomError::Parse(format!(
            "{} at offset {} in parameters '{}'",
            message, self.pos, self.text
        ))
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", expected)))
        }
    }

    fn value(&mut self) -> Result<Value> {
        self.skip_ws();
        match self.peek() {
            Some('{') => self.dict(),
            Some('[') => self.sequence('[', ']').map(|(items, _)| Value::Array(items)),
            Some('(') => self.tuple(),
            Some(q @ ('\'' | '"')) => self.string(q).map(Value::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.word(),
            Some(c) => Err(self.error(&format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn dict(&mut self) -> Result<Value> {
        self.enter()?;
        let map = self.dict_entries()?;
        self.depth -= 1;
        Ok(Value::Object(map))
    }

    fn dict_entries(&mut self) -> Result<Map<String, Value>> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_ws();
            if self.eat('}') {
                return Ok(map);
            }
            let key = match self.value()? {
                Value::String(s) => s,
                other => return Err(self.error(&format!("mapping keys must be strings, got {}", other))),
            };
            self.skip_ws();
            self.expect(':')?;
            let value = self.value()?;
            map.insert(key, value);
            self.skip_ws();
            if !self.eat(',') {
                self.skip_ws();
                self.expect('}')?;
                return Ok(map);
            }
        }
    }

    /// Items between `open` and `close`; the flag reports a trailing comma.
    fn sequence(&mut self, open: char, close: char) -> Result<(Vec<Value>, bool)> {
        self.enter()?;
        let items = self.sequence_items(open, close)?;
        self.depth -= 1;
        Ok(items)
    }

    fn sequence_items(&mut self, open: char, close: char) -> Result<(Vec<Value>, bool)> {
        self.expect(open)?;
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_ws();
            if self.eat(close) {
                return Ok((items, trailing_comma));
            }
            items.push(self.value()?);
            self.skip_ws();
            trailing_comma = self.eat(',');
            if !trailing_comma {
                self.skip_ws();
                self.expect(close)?;
                return Ok((items, false));
            }
        }
    }

    fn tuple(&mut self) -> Result<Value> {
        let (mut items, trailing_comma) = self.sequence('(', ')')?;
        // `(x)` is a parenthesized value, `(x,)` a one-element tuple.
        if items.len() == 1 && !trailing_comma {
            return Ok(items.remove(0));
        }
        Ok(Value::Array(items))
    }

    fn string(&mut self, quote: char) -> Result<String> {
        self.expect(quote)?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(c) => out.push(c),
                    None => return Err(self.error("unterminated escape")),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Value> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.pos += 1;
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' | 'e' | 'E' => is_float = true,
                '-' | '+' if matches!(self.text[..self.pos].chars().last(), Some('e' | 'E')) => {}
                _ => break,
            }
            self.pos += 1;
        }

        let raw = self.text[start..self.pos].replace('_', "");
        if !is_float {
            if let Ok(i) = raw.parse::<i64>() {
                return Ok(Value::from(i));
            }
        }
        raw.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| self.error(&format!("invalid number '{}'", raw)))
    }

    fn word(&mut self) -> Result<Value> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        match &self.text[start..self.pos] {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            other => Err(self.error(&format!("unknown name '{}'", other))),
        }
    }
}
