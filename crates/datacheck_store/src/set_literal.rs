//! Text form of `value_range` sets inside CSV constraint files.
//!
//! A set is written as `{'a', 'b', nan}`: strings single quoted with `\\`
//! and `\'` escapes, missing values as `nan`, booleans as `True`/`False`,
//! numbers bare, and the empty set as `set()`. The decoder accepts that
//! form plus double-quoted strings and `None` for a missing value.

use crate::{Result, StoreError};
use datacheck_core::{Value, render_float};
use std::collections::HashSet;

const EMPTY_SET: &str = "set()";
const MISSING: &str = "nan";

/// Encodes a value set as a set literal.
pub fn encode_set_literal(values: &[Value]) -> String {
    if values.is_empty() {
        return EMPTY_SET.to_string();
    }
    let items: Vec<String> = values.iter().map(encode_item).collect();
    format!("{{{}}}", items.join(", "))
}

fn encode_item(value: &Value) -> String {
    match value {
        v if v.is_null() => MISSING.to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => render_float(*f),
        Value::Str(s) => quote(s),
        other => quote(&other.render()),
    }
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// Decodes a set literal into its distinct values, in written order.
///
/// # Errors
///
/// Returns `StoreError::SetLiteral` with the byte offset of the first
/// character that does not fit the grammar.
///
/// # Example
///
/// ```rust
/// use datacheck_core::Value;
/// use datacheck_store::decode_set_literal;
///
/// let values = decode_set_literal("{'red', nan, 3}").unwrap();
/// assert_eq!(values, vec![Value::from("red"), Value::Null, Value::Int(3)]);
/// ```
pub fn decode_set_literal(text: &str) -> Result<Vec<Value>> {
    let mut cursor = Cursor::new(text);
    let items = cursor.parse_set()?;

    let mut seen = HashSet::new();
    Ok(items
        .into_iter()
        .filter(|value| seen.insert(value.key()))
        .collect())
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, message: impl Into<String>) -> StoreError {
        StoreError::set_literal(self.pos, message)
    }

    fn parse_set(&mut self) -> Result<Vec<Value>> {
        self.skip_whitespace();
        let mut items = Vec::new();

        if self.rest().starts_with(EMPTY_SET) {
            self.pos += EMPTY_SET.len();
        } else {
            match self.bump() {
                Some('{') => {}
                Some(c) => {
                    return Err(StoreError::set_literal(
                        self.pos - c.len_utf8(),
                        format!("expected '{{', found '{c}'"),
                    ));
                }
                None => return Err(self.error("empty input")),
            }
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.bump();
            } else {
                self.parse_items(&mut items)?;
            }
        }

        self.skip_whitespace();
        if self.peek().is_some() {
            return Err(self.error("unexpected input after the set"));
        }
        Ok(items)
    }

    fn parse_items(&mut self, items: &mut Vec<Value>) -> Result<()> {
        loop {
            items.push(self.parse_item()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    self.skip_whitespace();
                    if self.peek() == Some('}') {
                        self.bump();
                        return Ok(());
                    }
                }
                Some('}') => {
                    self.bump();
                    return Ok(());
                }
                Some(c) => return Err(self.error(format!("expected ',' or '}}', found '{c}'"))),
                None => return Err(self.error("unterminated set")),
            }
        }
    }

    fn parse_item(&mut self) -> Result<Value> {
        match self.peek() {
            Some(quote @ ('\'' | '"')) => self.parse_string(quote).map(Value::Str),
            Some(_) => self.parse_bare(),
            None => Err(self.error("expected a value")),
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String> {
        let start = self.pos;
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('r') => text.push('\r'),
                    Some(c @ ('\\' | '\'' | '"')) => text.push(c),
                    Some(c) => {
                        text.push('\\');
                        text.push(c);
                    }
                    None => return Err(StoreError::set_literal(start, "unterminated string")),
                },
                Some(c) if c == quote => return Ok(text),
                Some(c) => text.push(c),
                None => return Err(StoreError::set_literal(start, "unterminated string")),
            }
        }
    }

    fn parse_bare(&mut self) -> Result<Value> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c != ',' && c != '}' && !c.is_whitespace())
        {
            self.bump();
        }
        let token = &self.src[start..self.pos];

        let value = match token {
            "" => return Err(StoreError::set_literal(start, "expected a value")),
            "nan" | "NaN" | "None" => Value::Null,
            "True" => Value::Bool(true),
            "False" => Value::Bool(false),
            _ => match (token.parse::<i64>(), token.parse::<f64>()) {
                (Ok(i), _) => Value::Int(i),
                (_, Ok(f)) if f.is_nan() => Value::Null,
                (_, Ok(f)) => Value::Float(f),
                _ => {
                    return Err(StoreError::set_literal(
                        start,
                        format!("unrecognized token '{token}'"),
                    ));
                }
            },
        };
        Ok(value)
    }
}
