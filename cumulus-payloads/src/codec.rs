//! YAML codec shared by every payload type.
//!
//! Decoding parses the text into a [`serde_yaml::Value`] tree and walks it
//! with [`Fields`], which tracks the dotted path of each value so errors can
//! name the offending field. Encoding goes through the `Serialize` derives,
//! which emit every field in declaration order.

use serde::{Serialize, Serializer};
use serde_yaml::{Mapping, Value};
use tracing::{debug, trace};

use crate::enums::Token;
use crate::error::{PayloadError, PayloadResult};
use crate::kind::PayloadKind;

/// A control-plane payload with a canonical text encoding
pub trait Payload: Serialize + Sized {
    const KIND: PayloadKind;

    /// Builds the payload from an already parsed document
    fn from_document(doc: &Value) -> PayloadResult<Self>;

    fn decode(text: &str) -> PayloadResult<Self> {
        trace!(kind = %Self::KIND, bytes = text.len(), "decoding payload");
        let doc = parse_document(text)?;
        Self::from_document(&doc)
    }

    fn encode(&self) -> PayloadResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

pub(crate) fn parse_document(text: &str) -> PayloadResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(text).map_err(|err| match duplicate_top_level_key(text) {
        Some(key) => {
            PayloadError::MalformedEnvelope(format!("top-level key '{key}' appears more than once"))
        }
        None => PayloadError::UnderlyingCodec(err),
    })
}

/// First unindented mapping key that occurs twice in the document
fn duplicate_top_level_key(text: &str) -> Option<&str> {
    let mut seen = Vec::new();
    for line in text.lines() {
        if line.starts_with([' ', '\t', '#', '-']) || line.starts_with("...") {
            continue;
        }
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        if !(rest.is_empty() || rest.starts_with([' ', '\t'])) {
            continue;
        }
        let key = key.trim().trim_matches(|c| c == '\'' || c == '"');
        if seen.contains(&key) {
            return Some(key);
        }
        seen.push(key);
    }
    None
}

/// Opens a single-key envelope and returns the reader for its body
pub(crate) fn open_envelope<'a>(doc: &'a Value, key: &str) -> PayloadResult<Fields<'a>> {
    let map = match doc {
        Value::Mapping(map) => map,
        Value::Null => {
            return Err(PayloadError::MalformedEnvelope(format!(
                "empty document, expected top-level key '{key}'"
            )))
        }
        other => {
            return Err(PayloadError::MalformedEnvelope(format!(
                "expected a mapping with top-level key '{key}', found {}",
                describe(other)
            )))
        }
    };

    if map.len() != 1 {
        return Err(PayloadError::MalformedEnvelope(format!(
            "expected exactly one top-level key '{key}', found {}",
            map.len()
        )));
    }

    let body = map.get(key).ok_or_else(|| {
        let found = map
            .iter()
            .next()
            .map(|(k, _)| scalar_text(k).unwrap_or_else(|| describe(k).to_string()))
            .unwrap_or_default();
        PayloadError::MalformedEnvelope(format!("expected top-level key '{key}', found '{found}'"))
    })?;

    Fields::from_value(body, key.to_string())
}

/// Reader over one mapping of the document, aware of its own path
#[derive(Debug, Clone)]
pub(crate) struct Fields<'a> {
    path: String,
    map: Option<&'a Mapping>,
}

impl<'a> Fields<'a> {
    /// Null is read as an empty mapping so absent blocks fall back to defaults
    pub(crate) fn from_value(value: &'a Value, path: String) -> PayloadResult<Self> {
        match value {
            Value::Mapping(map) => Ok(Self {
                path,
                map: Some(map),
            }),
            Value::Null => Ok(Self { path, map: None }),
            other => Err(PayloadError::invalid(
                display_path(&path),
                format!("expected a mapping, found {}", describe(other)),
            )),
        }
    }

    fn child(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map
            .and_then(|map| map.get(key))
            .filter(|value| !value.is_null())
    }

    fn require(&self, key: &str) -> PayloadResult<&'a Value> {
        self.get(key)
            .ok_or_else(|| PayloadError::MissingRequiredField(self.child(key)))
    }

    pub(crate) fn string(&self, key: &str) -> PayloadResult<String> {
        match self.get(key) {
            Some(value) => self.as_string(key, value),
            None => Ok(String::new()),
        }
    }

    pub(crate) fn required_string(&self, key: &str) -> PayloadResult<String> {
        let value = self.require(key)?;
        self.as_string(key, value)
    }

    fn as_string(&self, key: &str, value: &Value) -> PayloadResult<String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(PayloadError::invalid(
                self.child(key),
                format!("expected a string, found {}", describe(other)),
            )),
        }
    }

    pub(crate) fn bool(&self, key: &str) -> PayloadResult<bool> {
        match self.get(key) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(PayloadError::invalid(
                self.child(key),
                format!("expected a boolean, found {}", describe(other)),
            )),
        }
    }

    pub(crate) fn uint(&self, key: &str) -> PayloadResult<u64> {
        let value = match self.get(key) {
            None => return Ok(0),
            Some(value) => value,
        };
        match value {
            Value::Number(n) => n.as_u64().ok_or_else(|| {
                PayloadError::invalid(
                    self.child(key),
                    format!("expected a non-negative integer, found {n}"),
                )
            }),
            other => Err(PayloadError::invalid(
                self.child(key),
                format!("expected a non-negative integer, found {}", describe(other)),
            )),
        }
    }

    /// Optional enum field; absent, null and empty string all mean unset
    pub(crate) fn token<T: Token>(&self, key: &str) -> PayloadResult<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(value) => self.as_token(key, value).map(Some),
        }
    }

    pub(crate) fn required_token<T: Token>(&self, key: &str) -> PayloadResult<T> {
        let value = self.require(key)?;
        self.as_token(key, value)
    }

    fn as_token<T: Token>(&self, key: &str, value: &Value) -> PayloadResult<T> {
        match value {
            Value::String(s) => {
                T::from_token(s).ok_or_else(|| PayloadError::unknown(self.child(key), s.as_str()))
            }
            other => Err(PayloadError::invalid(
                self.child(key),
                format!("expected a {} token, found {}", T::NAME, describe(other)),
            )),
        }
    }

    pub(crate) fn nested(&self, key: &str) -> PayloadResult<Fields<'a>> {
        match self.get(key) {
            Some(value) => Fields::from_value(value, self.child(key)),
            None => Ok(Fields {
                path: self.child(key),
                map: None,
            }),
        }
    }

    pub(crate) fn required_nested(&self, key: &str) -> PayloadResult<Fields<'a>> {
        let value = self.require(key)?;
        Fields::from_value(value, self.child(key))
    }

    /// Decodes a sequence of mappings in input order
    pub(crate) fn list<T>(
        &self,
        key: &str,
        mut decode: impl FnMut(&Fields<'a>) -> PayloadResult<T>,
    ) -> PayloadResult<Vec<T>> {
        let items = match self.get(key) {
            None => return Ok(Vec::new()),
            Some(Value::Sequence(items)) => items,
            Some(other) => {
                return Err(PayloadError::invalid(
                    self.child(key),
                    format!("expected a sequence, found {}", describe(other)),
                ))
            }
        };

        items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let fields = Fields::from_value(item, format!("{}[{idx}]", self.child(key)))?;
                decode(&fields)
            })
            .collect()
    }

    /// Unknown keys are tolerated; they are only reported at debug level
    pub(crate) fn note_unknown(&self, known: &[&str]) {
        let Some(map) = self.map else {
            return;
        };
        for key in map.keys() {
            let name = scalar_text(key).unwrap_or_default();
            if !known.contains(&name.as_str()) {
                debug!(path = %display_path(&self.path), key = %name, "ignoring unknown payload field");
            }
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_f64() => "a float",
        Value::Number(n) if n.is_i64() && !n.is_u64() => "a negative integer",
        Value::Number(_) => "an integer",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Serializes an optional enum, writing unset values as the empty string
pub(crate) fn token_or_empty<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Token,
    S: Serializer,
{
    serializer.serialize_str(value.as_ref().map_or("", Token::as_str))
}
