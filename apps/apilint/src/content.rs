//! Content detection and parsing of JSON/YAML text into the generic tree.
//!
//! Text whose first non-blank character is `{` or `[` is parsed as JSON,
//! anything else as YAML. YAML trees are converted into `serde_json::Value`
//! so the rest of the crate works on a single representation.

use crate::error::Error;
use serde_json::{Map, Number, Value as Json};
use serde_yaml::Value as Yaml;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Supported textual encodings.
pub enum ContentType {
    Json,
    Yaml,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Json => write!(f, "JSON"),
            ContentType::Yaml => write!(f, "YAML"),
        }
    }
}

/// Guess the encoding of `text` from its first non-blank character.
pub fn detect(text: &str) -> ContentType {
    let trimmed = text.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        ContentType::Json
    } else {
        ContentType::Yaml
    }
}

/// Parse `text` into a generic tree whose root is a map or a sequence.
pub fn parse(text: &str) -> Result<Json, Error> {
    if text.trim().is_empty() {
        return Err(Error::InvalidContentType("Document is empty.".into()));
    }
    let content_type = detect(text);
    let value = match content_type {
        ContentType::Json => serde_json::from_str::<Json>(text).map_err(|e| Error::Parse {
            content_type,
            reason: e.to_string(),
        })?,
        ContentType::Yaml => {
            let yaml = serde_yaml::from_str::<Yaml>(text).map_err(|e| Error::Parse {
                content_type,
                reason: e.to_string(),
            })?;
            yaml_to_json(yaml)
        }
    };
    match value {
        Json::Object(_) | Json::Array(_) => Ok(value),
        Json::Null => Err(Error::InvalidContentType("Document is empty.".into())),
        _ => Err(Error::InvalidContentType(
            "Content is neither a JSON nor a YAML document.".into(),
        )),
    }
}

/// Convert a YAML tree into the JSON tree, stringifying non-string keys.
pub fn yaml_to_json(value: Yaml) -> Json {
    match value {
        Yaml::Null => Json::Null,
        Yaml::Bool(b) => Json::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Json::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Json::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(Json::Number)
                    .unwrap_or(Json::Null)
            }
        }
        Yaml::String(s) => Json::String(s),
        Yaml::Sequence(seq) => Json::Array(seq.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => {
            let mut out = Map::with_capacity(mapping.len());
            for (k, v) in mapping {
                out.insert(yaml_key(k), yaml_to_json(v));
            }
            Json::Object(out)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: Yaml) -> String {
    match key {
        Yaml::String(s) => s,
        Yaml::Null => "null".to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Tagged(tagged) => yaml_key(tagged.value),
        other => serde_json::to_string(&yaml_to_json(other)).unwrap_or_default(),
    }
}
