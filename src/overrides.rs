//! `--set` expressions.
//!
//! Grammar: `key=value[,key=value...]`. Dotted keys nest (`db.host=x`),
//! braces make a list (`zones={a,b}`), and `\` escapes the next character.
//! Top-level keys become environment variables; nested maps and lists are
//! bound as JSON.

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

use crate::resolve::Overrides;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OverrideError {
    #[error("key {0:?} has no value")]
    MissingEquals(String),

    #[error("empty key segment in {0:?}")]
    EmptyKey(String),

    #[error("list value of {0:?} is missing a closing '}}'")]
    UnterminatedList(String),

    #[error("unexpected text after list value of {0:?}")]
    TrailingInput(String),

    #[error("{0:?} is already set to a value and cannot also hold nested keys")]
    KeyConflict(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideValue {
    Scalar(String),
    List(Vec<String>),
    Map(BTreeMap<String, OverrideValue>),
}

impl OverrideValue {
    fn to_json(&self) -> serde_json::Value {
        match self {
            OverrideValue::Scalar(s) => serde_json::Value::String(s.clone()),
            OverrideValue::List(items) => {
                items.iter().cloned().map(serde_json::Value::String).collect()
            }
            OverrideValue::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    /// String bound to the environment for this value.
    pub fn to_env_string(&self) -> String {
        match self {
            OverrideValue::Scalar(s) => s.clone(),
            other => other.to_json().to_string(),
        }
    }
}

/// Nested values collected from every `--set` flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideMap {
    values: BTreeMap<String, OverrideValue>,
}

impl OverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse each expression in order; later ones win.
    pub fn parse_all<I, S>(exprs: I) -> Result<Self, OverrideError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::new();
        for expr in exprs {
            parse_into(expr.as_ref(), &mut map)?;
        }
        Ok(map)
    }

    pub fn get(&self, key: &str) -> Option<&OverrideValue> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Top-level key to environment string.
    pub fn flatten(&self) -> Overrides {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_env_string()))
            .collect()
    }

    fn insert(&mut self, path: &[String], value: OverrideValue) -> Result<(), OverrideError> {
        let Some((last, parents)) = path.split_last() else {
            return Ok(());
        };

        let mut current = &mut self.values;
        for (depth, segment) in parents.iter().enumerate() {
            let entry = current
                .entry(segment.clone())
                .or_insert_with(|| OverrideValue::Map(BTreeMap::new()));
            current = match entry {
                OverrideValue::Map(map) => map,
                _ => return Err(OverrideError::KeyConflict(path[..=depth].join("."))),
            };
        }
        current.insert(last.clone(), value);
        Ok(())
    }
}

/// Parse one `--set` expression into `map`.
pub fn parse_into(expr: &str, map: &mut OverrideMap) -> Result<(), OverrideError> {
    let mut cursor = Cursor {
        chars: expr.chars().peekable(),
    };

    while cursor.chars.peek().is_some() {
        let path = cursor.key()?;
        let value = cursor.value(&path.join("."))?;
        map.insert(&path, value)?;
    }
    Ok(())
}

struct Cursor<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Cursor<'_> {
    fn key(&mut self) -> Result<Vec<String>, OverrideError> {
        let mut segments = Vec::new();
        let mut current = String::new();

        loop {
            match self.chars.next() {
                None | Some(',') => {
                    segments.push(current);
                    return Err(OverrideError::MissingEquals(segments.join(".")));
                }
                Some('\\') => {
                    if let Some(c) = self.chars.next() {
                        current.push(c);
                    }
                }
                Some(c @ ('.' | '=')) => {
                    if current.is_empty() {
                        segments.push(current);
                        return Err(OverrideError::EmptyKey(segments.join(".")));
                    }
                    segments.push(std::mem::take(&mut current));
                    if c == '=' {
                        return Ok(segments);
                    }
                }
                Some(c) => current.push(c),
            }
        }
    }

    fn value(&mut self, key: &str) -> Result<OverrideValue, OverrideError> {
        if self.chars.peek() != Some(&'{') {
            let (scalar, _) = self.until(&[',']);
            return Ok(OverrideValue::Scalar(scalar));
        }

        self.chars.next();
        let mut items = Vec::new();
        loop {
            let (item, stop) = self.until(&[',', '}']);
            match stop {
                Some(',') => items.push(item),
                Some(_) => {
                    if !(item.is_empty() && items.is_empty()) {
                        items.push(item);
                    }
                    break;
                }
                None => return Err(OverrideError::UnterminatedList(key.to_string())),
            }
        }

        match self.chars.next() {
            None | Some(',') => Ok(OverrideValue::List(items)),
            Some(_) => Err(OverrideError::TrailingInput(key.to_string())),
        }
    }

    /// Read up to (and consume) the first unescaped stop char.
    fn until(&mut self, stops: &[char]) -> (String, Option<char>) {
        let mut out = String::new();
        while let Some(c) = self.chars.next() {
            if c == '\\' {
                if let Some(escaped) = self.chars.next() {
                    out.push(escaped);
                }
            } else if stops.contains(&c) {
                return (out, Some(c));
            } else {
                out.push(c);
            }
        }
        (out, None)
    }
}
