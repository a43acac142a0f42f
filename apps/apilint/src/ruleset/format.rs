//! Format registry: document dialects and applicability matching.

use serde_json::Value as Json;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// A document dialect tag used to scope rules and aliases.
pub enum Format {
    Arazzo1_0,
    Aas2,
    Aas2_0,
    Aas2_1,
    Aas2_2,
    Aas2_3,
    Aas2_4,
    Aas2_5,
    Aas2_6,
    Aas3,
    Aas3_0,
    Oas2,
    Oas3,
    Oas3_0,
    Oas3_1,
    JsonSchema,
    JsonSchemaLoose,
    JsonSchemaDraft4,
    JsonSchemaDraft6,
    JsonSchemaDraft7,
    JsonSchemaDraft2019_09,
    JsonSchemaDraft2020_12,
}

const TABLE: &[(Format, &str)] = &[
    (Format::Arazzo1_0, "arazzo1_0"),
    (Format::Aas2, "aas2"),
    (Format::Aas2_0, "aas2_0"),
    (Format::Aas2_1, "aas2_1"),
    (Format::Aas2_2, "aas2_2"),
    (Format::Aas2_3, "aas2_3"),
    (Format::Aas2_4, "aas2_4"),
    (Format::Aas2_5, "aas2_5"),
    (Format::Aas2_6, "aas2_6"),
    (Format::Aas3, "aas3"),
    (Format::Aas3_0, "aas3_0"),
    (Format::Oas2, "oas2"),
    (Format::Oas3, "oas3"),
    (Format::Oas3_0, "oas3_0"),
    (Format::Oas3_1, "oas3_1"),
    (Format::JsonSchema, "json_schema"),
    (Format::JsonSchemaLoose, "json_schema_loose"),
    (Format::JsonSchemaDraft4, "json_schema_draft_4"),
    (Format::JsonSchemaDraft6, "json_schema_draft_6"),
    (Format::JsonSchemaDraft7, "json_schema_draft_7"),
    (Format::JsonSchemaDraft2019_09, "json_schema_draft_2019_09"),
    (Format::JsonSchemaDraft2020_12, "json_schema_draft_2020_12"),
];

impl Format {
    /// Case-exact lookup of the canonical name; `None` means invalid.
    pub fn parse(name: &str) -> Option<Format> {
        TABLE.iter().find(|(_, n)| *n == name).map(|(f, _)| *f)
    }

    pub fn as_str(&self) -> &'static str {
        TABLE
            .iter()
            .find(|(f, _)| f == self)
            .map(|(_, n)| *n)
            .unwrap_or("invalid")
    }

    pub fn all() -> impl Iterator<Item = Format> {
        TABLE.iter().map(|(f, _)| *f)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal matching: absent document formats always match, an empty
/// required set never matches a present check-list, otherwise the sets
/// must intersect.
pub fn matches(required: &[Format], document: Option<&[Format]>) -> bool {
    match document {
        None => true,
        Some(doc) => required.iter().any(|f| doc.contains(f)),
    }
}

/// Applicability used by callers: an empty required set is unconstrained.
pub fn applies(required: &[Format], document: Option<&[Format]>) -> bool {
    required.is_empty() || matches(required, document)
}

/// Infer document formats from the top-level `openapi` or `swagger` key.
///
/// Returns `None` for a non-map root.
pub fn infer_formats(root: &Json) -> Option<Vec<Format>> {
    let map = root.as_object()?;
    if let Some(version) = map.get("openapi") {
        let version = match version {
            Json::String(s) => s.clone(),
            other => other.to_string(),
        };
        let formats = if version.starts_with("3.1") {
            vec![Format::Oas3_1, Format::Oas3]
        } else if version.starts_with("3.0") {
            vec![Format::Oas3_0, Format::Oas3]
        } else {
            vec![Format::Oas3, Format::Oas3_0, Format::Oas3_1]
        };
        return Some(formats);
    }
    if map.contains_key("swagger") {
        return Some(vec![Format::Oas2]);
    }
    if let Some(version) = map.get("asyncapi") {
        let version = match version {
            Json::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Some(asyncapi_formats(&version));
    }
    Some(Vec::new())
}

/// `2.x` and `3.0` map to the family plus the exact minor; other versions to nothing.
fn asyncapi_formats(version: &str) -> Vec<Format> {
    let mut parts = version.split('.');
    let major = parts.next().unwrap_or_default();
    let minor = parts.next().unwrap_or_default();
    let exact = match (major, minor) {
        ("2", "0") => Format::Aas2_0,
        ("2", "1") => Format::Aas2_1,
        ("2", "2") => Format::Aas2_2,
        ("2", "3") => Format::Aas2_3,
        ("2", "4") => Format::Aas2_4,
        ("2", "5") => Format::Aas2_5,
        ("2", "6") => Format::Aas2_6,
        ("2", _) => return vec![Format::Aas2],
        ("3", "0") => Format::Aas3_0,
        ("3", _) => return vec![Format::Aas3],
        _ => return Vec::new(),
    };
    let family = if major == "2" { Format::Aas2 } else { Format::Aas3 };
    vec![exact, family]
}
