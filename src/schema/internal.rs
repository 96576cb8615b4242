//! Internal implementation for schema module
//!
//! Handles schemas/schema.yaml - the parameter declarations of a stack.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

use super::SchemaError;
use crate::paths;

/// One declared input of a stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default, deserialize_with = "scalar_string")]
    pub title: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub description: String,
    /// Declared type tag. Informational only, never checked against values.
    #[serde(default, rename = "type", deserialize_with = "scalar_string")]
    pub kind: String,
    /// Environment variable this parameter binds to.
    #[serde(default, deserialize_with = "scalar_string")]
    pub key: String,
    /// Reserved for a pre-set value; not consulted during resolution.
    #[serde(default, deserialize_with = "scalar_string")]
    pub value: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub default: String,
    #[serde(default)]
    pub required: bool,
}

impl Parameter {
    pub fn new(title: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn has_default(&self) -> bool {
        !self.default.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct SchemaDocument {
    #[serde(default)]
    parameters: Option<Vec<Parameter>>,
}

/// Accept any YAML scalar for a string field (`default: 8080` reads as "8080").
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(String::new()),
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a scalar, found {}",
            describe(&other)
        ))),
    }
}

fn describe(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
        _ => "a scalar",
    }
}

/// Parse a schema document. Empty documents declare no parameters.
pub(super) fn parse(content: &str, path: &Path) -> Result<Vec<Parameter>, SchemaError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let doc: SchemaDocument =
        serde_yaml::from_str(content).map_err(|source| SchemaError::Syntax {
            path: path.to_path_buf(),
            source,
        })?;
    let parameters = doc.parameters.unwrap_or_default();

    if let Some((index, p)) = parameters
        .iter()
        .enumerate()
        .find(|(_, p)| p.key.trim().is_empty())
    {
        return Err(SchemaError::MissingKey {
            index,
            title: p.title.clone(),
        });
    }

    Ok(parameters)
}

/// Load the schema of the stack rooted at `dir`.
pub(super) fn load(dir: &Path) -> Result<Vec<Parameter>, SchemaError> {
    let path = paths::stack::schema_path(dir);

    let content = fs::read_to_string(&path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => SchemaError::NotFound { path: path.clone() },
        _ => SchemaError::Read {
            path: path.clone(),
            source,
        },
    })?;

    let parameters = parse(&content, &path)?;
    debug!(path = %path.display(), count = parameters.len(), "loaded schema");

    for key in duplicate_keys(&parameters) {
        warn!(key, "schema declares the same key more than once");
    }

    Ok(parameters)
}

pub(super) fn duplicate_keys(parameters: &[Parameter]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for p in parameters {
        if !seen.insert(p.key.as_str()) && !dups.contains(&p.key.as_str()) {
            dups.push(p.key.as_str());
        }
    }
    dups
}
