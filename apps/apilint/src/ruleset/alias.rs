//! Alias resolution for `#Name` selector references.
//!
//! A simple alias is a list of selectors. A complex alias is a list of
//! targets, each scoped to a set of formats. Aliases may reference other
//! aliases; `resolve_aliases_in_aliases` flattens them with a bounded
//! number of passes and reports a cycle when references remain.

use super::format::{applies, Format};
use crate::error::RulesetError;
use regex::Regex;
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const ALIAS_MARKER: char = '#';

static ALIAS_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([A-Za-z_][A-Za-z0-9_-]*)").expect("valid alias regex"));

#[derive(Debug, Clone, PartialEq)]
pub struct AliasTarget {
    pub formats: Vec<Format>,
    pub given: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AliasDefinition {
    Simple {
        given: Vec<String>,
    },
    Complex {
        description: Option<String>,
        targets: Vec<AliasTarget>,
    },
}

/// Split `#Name.rest` into (`Name`, `.rest`); `None` when not an alias.
pub fn split_alias(selector: &str) -> Option<(&str, &str)> {
    let caps = ALIAS_NAME.captures(selector)?;
    let whole = caps.get(0)?;
    let name = caps.get(1)?;
    Some((name.as_str(), &selector[whole.end()..]))
}

pub fn is_alias(selector: &str) -> bool {
    selector.starts_with(ALIAS_MARKER)
}

fn string_list(value: &Json) -> Option<Vec<String>> {
    match value {
        Json::String(s) => Some(vec![s.clone()]),
        Json::Array(items) => items
            .iter()
            .map(|i| i.as_str().map(str::to_string))
            .collect(),
        _ => None,
    }
}

impl AliasDefinition {
    /// Build a definition from its raw ruleset value.
    pub fn from_value(name: &str, value: &Json) -> Result<Self, RulesetError> {
        let malformed = |message: &str| RulesetError::Malformed {
            location: name.to_string(),
            message: message.to_string(),
        };
        if let Some(given) = string_list(value) {
            return Ok(AliasDefinition::Simple { given });
        }
        let map = value
            .as_object()
            .ok_or_else(|| malformed("Invalid alias object."))?;
        let raw_targets = map
            .get("targets")
            .and_then(Json::as_array)
            .ok_or_else(|| malformed("Invalid alias object."))?;
        let mut targets = Vec::with_capacity(raw_targets.len());
        for raw in raw_targets {
            let formats = raw
                .get("formats")
                .and_then(string_list)
                .ok_or_else(|| malformed("Invalid alias object."))?
                .iter()
                .map(|f| Format::parse(f).ok_or_else(|| malformed(&format!("Unknown format: {f}"))))
                .collect::<Result<Vec<_>, _>>()?;
            let given = raw
                .get("given")
                .and_then(string_list)
                .ok_or_else(|| malformed("Invalid alias object."))?;
            targets.push(AliasTarget { formats, given });
        }
        Ok(AliasDefinition::Complex {
            description: map
                .get("description")
                .and_then(Json::as_str)
                .map(str::to_string),
            targets,
        })
    }

    /// Every selector of the definition, across targets.
    pub fn all_given(&self) -> Vec<&str> {
        match self {
            AliasDefinition::Simple { given } => given.iter().map(String::as_str).collect(),
            AliasDefinition::Complex { targets, .. } => targets
                .iter()
                .flat_map(|t| t.given.iter().map(String::as_str))
                .collect(),
        }
    }

    fn is_resolved(&self) -> bool {
        self.all_given().iter().all(|g| !is_alias(g))
    }
}

/// Replace a leading alias reference in `selector` by the alias's selectors.
///
/// Non-alias selectors are returned unchanged. Complex alias targets are
/// filtered by `active_formats` when given.
pub fn resolve_alias_given(
    selector: &str,
    aliases: &BTreeMap<String, AliasDefinition>,
    active_formats: Option<&[Format]>,
) -> Result<Vec<String>, RulesetError> {
    if !is_alias(selector) {
        return Ok(vec![selector.to_string()]);
    }
    let (name, rest) = split_alias(selector)
        .ok_or_else(|| RulesetError::UnknownAlias(selector.trim_start_matches('#').to_string()))?;
    let def = aliases
        .get(name)
        .ok_or_else(|| RulesetError::UnknownAlias(name.to_string()))?;
    let resolved = match def {
        AliasDefinition::Simple { given } => given.iter().map(|g| format!("{g}{rest}")).collect(),
        AliasDefinition::Complex { targets, .. } => targets
            .iter()
            .filter(|t| applies(&t.formats, active_formats))
            .flat_map(|t| t.given.iter().map(|g| format!("{g}{rest}")))
            .collect(),
    };
    Ok(resolved)
}

fn resolve_list(
    given: &[String],
    snapshot: &BTreeMap<String, AliasDefinition>,
    active_formats: Option<&[Format]>,
) -> Result<Vec<String>, RulesetError> {
    let mut out = Vec::with_capacity(given.len());
    for g in given {
        out.extend(resolve_alias_given(g, snapshot, active_formats)?);
    }
    Ok(out)
}

/// Whether no definition references another alias.
pub fn all_resolved(aliases: &BTreeMap<String, AliasDefinition>) -> bool {
    aliases.values().all(AliasDefinition::is_resolved)
}

/// Flatten alias-to-alias references in at most `aliases.len()` passes.
pub fn resolve_aliases_in_aliases(
    aliases: &mut BTreeMap<String, AliasDefinition>,
) -> Result<(), RulesetError> {
    for _ in 0..aliases.len() {
        if all_resolved(aliases) {
            return Ok(());
        }
        let snapshot = aliases.clone();
        for def in aliases.values_mut() {
            match def {
                AliasDefinition::Simple { given } => {
                    *given = resolve_list(given, &snapshot, None)?;
                }
                AliasDefinition::Complex { targets, .. } => {
                    for t in targets.iter_mut() {
                        let active = (!t.formats.is_empty()).then_some(t.formats.as_slice());
                        t.given = resolve_list(&t.given, &snapshot, active)?;
                    }
                }
            }
        }
    }
    if all_resolved(aliases) {
        Ok(())
    } else {
        Err(RulesetError::CircularAlias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(raw: Json) -> BTreeMap<String, AliasDefinition> {
        raw.as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), AliasDefinition::from_value(k, v).unwrap()))
            .collect()
    }

    #[test]
    fn test_split_alias() {
        assert_eq!(split_alias("#Foo.baz"), Some(("Foo", ".baz")));
        assert_eq!(split_alias("#Foo"), Some(("Foo", "")));
        assert_eq!(split_alias("#Op[*]"), Some(("Op", "[*]")));
        assert_eq!(split_alias("$.a"), None);
    }

    #[test]
    fn test_simple_alias_appends_remainder() {
        let aliases = table(json!({"Foo": ["$.bar", "$.qux"]}));
        assert_eq!(
            resolve_alias_given("#Foo.baz", &aliases, None).unwrap(),
            vec!["$.bar.baz", "$.qux.baz"]
        );
        assert_eq!(
            resolve_alias_given("$.plain", &aliases, None).unwrap(),
            vec!["$.plain"]
        );
        assert_eq!(
            resolve_alias_given("#Name", &aliases, None),
            Err(RulesetError::UnknownAlias("Name".into()))
        );
    }

    #[test]
    fn test_complex_alias_filters_by_format() {
        let aliases = table(json!({
            "Schemas": {
                "description": "schema objects",
                "targets": [
                    {"formats": ["oas2"], "given": ["$.definitions[*]"]},
                    {"formats": ["oas3"], "given": ["$.components.schemas[*]"]}
                ]
            }
        }));
        assert_eq!(
            resolve_alias_given("#Schemas", &aliases, Some(&[Format::Oas3][..])).unwrap(),
            vec!["$.components.schemas[*]"]
        );
        assert_eq!(
            resolve_alias_given("#Schemas", &aliases, None).unwrap(),
            vec!["$.definitions[*]", "$.components.schemas[*]"]
        );
    }

    #[test]
    fn test_fixpoint_resolves_chains() {
        let mut aliases = table(json!({
            "A": ["#B.x"],
            "B": ["#C.y"],
            "C": ["$.root"]
        }));
        resolve_aliases_in_aliases(&mut aliases).unwrap();
        assert_eq!(
            aliases["A"],
            AliasDefinition::Simple {
                given: vec!["$.root.y.x".into()]
            }
        );
        assert!(all_resolved(&aliases));
    }

    #[test]
    fn test_fixpoint_detects_cycles() {
        let mut self_ref = table(json!({"A": ["#A.x"]}));
        assert_eq!(
            resolve_aliases_in_aliases(&mut self_ref),
            Err(RulesetError::CircularAlias)
        );
        let mut pair = table(json!({"A": ["#B"], "B": ["#A"], "C": ["$.c"]}));
        assert_eq!(
            resolve_aliases_in_aliases(&mut pair),
            Err(RulesetError::CircularAlias)
        );
    }

    #[test]
    fn test_malformed_alias() {
        assert!(AliasDefinition::from_value("X", &json!(3)).is_err());
        assert!(AliasDefinition::from_value("X", &json!({"targets": [{"given": ["$"]}]})).is_err());
    }
}
