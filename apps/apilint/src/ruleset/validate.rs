//! Structural validation of a raw ruleset, before the model is built.
//!
//! Every problem is collected; nothing here stops at the first error.
//! Ruleset-level problems carry an empty location, the rest carry the
//! rule or alias name.

use super::alias::{
    all_resolved, resolve_alias_given, resolve_aliases_in_aliases, split_alias, AliasDefinition,
    ALIAS_MARKER,
};
use super::format::Format;
use super::Severity;
use crate::error::{RulesetError, RulesetValidationError};
use crate::functions::{build_function, is_function, Options};
use crate::message;
use crate::selector::Selector;
use serde_json::Value as Json;
use std::collections::BTreeMap;

type Errors = Vec<RulesetValidationError>;
type AliasTable = BTreeMap<String, AliasDefinition>;

/// Validate a raw ruleset tree; an empty result means it is well-formed.
pub fn validate_ruleset_value(raw: &Json, selector: &dyn Selector) -> Errors {
    let mut errors = Errors::new();
    let root = match raw {
        Json::Object(map) if !map.is_empty() => map,
        _ => {
            errors.push(RulesetValidationError::new("", "Ruleset is empty."));
            return errors;
        }
    };

    let aliases = root.get("aliases");
    let resolved = match aliases {
        None => None,
        Some(Json::Object(map)) => validate_aliases(map, selector, &mut errors),
        Some(_) => {
            errors.push(RulesetValidationError::new("", "Aliases object should be a map"));
            None
        }
    };

    match root.get("rules") {
        None => {
            errors.push(RulesetValidationError::new("", "Ruleset does not contain any rules."));
            return errors;
        }
        Some(Json::Null) => {
            errors.push(RulesetValidationError::new("", "Ruleset contains a null value for rules."));
            return errors;
        }
        Some(Json::Object(rules)) => {
            for (name, rule) in rules {
                validate_rule(name, rule, aliases, resolved.as_ref(), selector, &mut errors);
            }
        }
        Some(_) => {
            errors.push(RulesetValidationError::new(
                "",
                "Ruleset contains an invalid value for rules.",
            ));
            return errors;
        }
    }

    match root.get("extends") {
        None | Some(Json::String(_)) => {}
        Some(Json::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                if !item.is_string() {
                    errors.push(RulesetValidationError::new(
                        "",
                        format!("Invalid 'extends' object in index {i}"),
                    ));
                }
            }
        }
        Some(_) => errors.push(RulesetValidationError::new(
            "",
            "'extends' field of a ruleset should be a list or a string.",
        )),
    }

    validate_formats("", root, &mut errors);
    errors
}

/// Check alias shapes and their resolved selectors; returns the resolved
/// table when the aliases are usable.
fn validate_aliases(
    raw: &Options,
    selector: &dyn Selector,
    errors: &mut Errors,
) -> Option<AliasTable> {
    let mut aliases = AliasTable::new();
    for (name, value) in raw {
        match AliasDefinition::from_value(name, value) {
            Ok(def) => {
                aliases.insert(name.clone(), def);
            }
            Err(RulesetError::Malformed { location, message }) => {
                errors.push(RulesetValidationError::new(location, message));
                return None;
            }
            Err(e) => {
                errors.push(RulesetValidationError::new(name.as_str(), e.to_string()));
                return None;
            }
        }
    }

    if let Err(e) = resolve_aliases_in_aliases(&mut aliases) {
        errors.push(RulesetValidationError::new("", e.to_string()));
        return None;
    }
    if !all_resolved(&aliases) {
        errors.push(RulesetValidationError::new(
            "",
            RulesetError::CircularAlias.to_string(),
        ));
        return None;
    }

    for (name, def) in &aliases {
        for given in def.all_given() {
            if selector.check(given).is_err() {
                errors.push(RulesetValidationError::new(
                    name.as_str(),
                    "Invalid json path in resolved alias",
                ));
            }
        }
    }
    Some(aliases)
}

fn validate_rule(
    name: &str,
    rule: &Json,
    aliases: Option<&Json>,
    resolved: Option<&AliasTable>,
    selector: &dyn Selector,
    errors: &mut Errors,
) {
    let Some(rule) = rule.as_object() else {
        errors.push(RulesetValidationError::new(name, "Rule is not a valid object."));
        return;
    };

    validate_given(name, rule, aliases, resolved, selector, errors);
    validate_then(name, rule, errors);

    for key in ["description", "message"] {
        if rule.get(key).is_some_and(|v| !v.is_string()) {
            errors.push(RulesetValidationError::new(
                name,
                format!("'{key}' field of a rule should be a string"),
            ));
        }
    }
    if let Some(Json::String(template)) = rule.get("message") {
        for p in message::placeholders(template) {
            if !message::is_known(p) {
                errors.push(RulesetValidationError::new(
                    name,
                    format!("Invalid placeholder: {p}"),
                ));
            }
        }
    }

    match rule.get("severity") {
        None => {}
        Some(Json::String(s)) => {
            if Severity::parse(s).is_none() {
                errors.push(RulesetValidationError::new(name, format!("Invalid severity: {s}")));
            }
        }
        Some(_) => errors.push(RulesetValidationError::new(
            name,
            "'severity' field of a rule should be a string",
        )),
    }

    validate_formats(name, rule, errors);

    for key in ["recommended", "resolved"] {
        if rule.get(key).is_some_and(|v| !v.is_boolean()) {
            errors.push(RulesetValidationError::new(
                name,
                format!("'{key}' field of a rule should be a boolean"),
            ));
        }
    }
}

fn validate_given(
    name: &str,
    rule: &Options,
    aliases: Option<&Json>,
    resolved: Option<&AliasTable>,
    selector: &dyn Selector,
    errors: &mut Errors,
) {
    let given: Vec<&Json> = match rule.get("given") {
        None => {
            errors.push(RulesetValidationError::new(
                name,
                "Rule does not contain a 'given' field.",
            ));
            return;
        }
        Some(g @ Json::String(_)) => vec![g],
        Some(Json::Array(items)) => items.iter().collect(),
        Some(_) => {
            errors.push(RulesetValidationError::new(
                name,
                "'given' field of a rule should be a string or a list",
            ));
            return;
        }
    };

    for (i, g) in given.into_iter().enumerate() {
        let Some(g) = g.as_str() else {
            errors.push(RulesetValidationError::new(
                name,
                format!("Invalid 'given' entry in index {i}"),
            ));
            continue;
        };
        if g.starts_with(ALIAS_MARKER) {
            match aliases {
                None => errors.push(RulesetValidationError::new(
                    name,
                    "Rule uses an alias but no aliases are defined.",
                )),
                Some(Json::Object(map)) => {
                    let alias = split_alias(g).map(|(n, _)| n).unwrap_or(&g[1..]);
                    if !map.contains_key(alias) {
                        errors.push(RulesetValidationError::new(
                            name,
                            format!("Unknown alias: {alias}"),
                        ));
                    } else if let Some(table) = resolved {
                        // Every format-scoped target is checked, not just the active ones
                        for path in resolve_alias_given(g, table, None).unwrap_or_default() {
                            if selector.check(&path).is_err() {
                                errors.push(RulesetValidationError::new(
                                    name,
                                    format!("Invalid JSON path: {path}"),
                                ));
                            }
                        }
                    }
                }
                Some(_) => {
                    errors.push(RulesetValidationError::new(name, "Invalid aliases object."))
                }
            }
        } else if selector.check(g).is_err() {
            errors.push(RulesetValidationError::new(
                name,
                format!("Invalid JSON path: {g}"),
            ));
        }
    }
}

fn validate_then(name: &str, rule: &Options, errors: &mut Errors) {
    match rule.get("then") {
        None => errors.push(RulesetValidationError::new(
            name,
            "Rule does not contain a 'then' field.",
        )),
        Some(Json::Object(then)) => validate_then_object(name, then, errors),
        Some(Json::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                match item {
                    Json::Object(then) => validate_then_object(name, then, errors),
                    _ => errors.push(RulesetValidationError::new(
                        name,
                        format!("Invalid 'then' object in index {i}"),
                    )),
                }
            }
        }
        Some(_) => errors.push(RulesetValidationError::new(
            name,
            "'then' field of a rule should be an object or a list",
        )),
    }
}

fn validate_then_object(name: &str, then: &Options, errors: &mut Errors) {
    if then.get("field").is_some_and(|f| !f.is_string()) {
        errors.push(RulesetValidationError::new(
            name,
            "'field' field of a then object should be a string",
        ));
    }

    let function = match then.get("function") {
        None => {
            errors.push(RulesetValidationError::new(
                name,
                "Then object does not contain a 'function' field.",
            ));
            return;
        }
        Some(Json::String(f)) => f,
        Some(_) => {
            errors.push(RulesetValidationError::new(
                name,
                "'function' field of a then object should be a string",
            ));
            return;
        }
    };
    if !is_function(function) {
        errors.push(RulesetValidationError::new(
            name,
            format!("Unknown function: {function}"),
        ));
        return;
    }

    let options = match then.get("functionOptions") {
        None => None,
        Some(Json::Object(o)) => Some(o),
        Some(_) => {
            errors.push(RulesetValidationError::new(
                name,
                "'functionOptions' field of a then object should be an object",
            ));
            None
        }
    };
    match build_function(function, options) {
        Ok(f) => {
            for e in f.validate_options() {
                errors.push(RulesetValidationError::new(name, e));
            }
        }
        Err(e) => errors.push(RulesetValidationError::new(name, e.to_string())),
    }
}

fn validate_formats(location: &str, object: &Options, errors: &mut Errors) {
    let Some(formats) = object.get("formats") else {
        return;
    };
    let Some(items) = formats.as_array() else {
        errors.push(RulesetValidationError::new(
            location,
            "'formats' field of a rule should be a list",
        ));
        return;
    };
    for (i, item) in items.iter().enumerate() {
        match item.as_str() {
            None => errors.push(RulesetValidationError::new(
                location,
                format!("Invalid format in index {i}"),
            )),
            Some(f) if Format::parse(f).is_none() => errors.push(RulesetValidationError::new(
                location,
                format!("Unknown format: {f}"),
            )),
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::JsonPathSelector;
    use serde_json::json;

    fn messages(raw: Json) -> Vec<(String, String)> {
        validate_ruleset_value(&raw, &JsonPathSelector)
            .into_iter()
            .map(|e| (e.location, e.message))
            .collect()
    }

    fn pair(location: &str, message: &str) -> (String, String) {
        (location.to_string(), message.to_string())
    }

    #[test]
    fn test_valid_ruleset_has_no_errors() {
        let errors = messages(json!({
            "formats": ["oas3"],
            "extends": ["spectral:oas"],
            "aliases": {"Info": ["$.info"]},
            "rules": {
                "info-title": {
                    "description": "Info must have a title",
                    "message": "{{description}}: {{error}}",
                    "severity": "warn",
                    "given": "#Info",
                    "then": {"field": "title", "function": "truthy"},
                    "formats": ["oas3_0", "oas3_1"],
                    "recommended": true
                }
            }
        }));
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_ruleset_level_errors() {
        assert_eq!(messages(json!({})), vec![pair("", "Ruleset is empty.")]);
        assert_eq!(
            messages(json!({"aliases": 1, "rules": null})),
            vec![
                pair("", "Aliases object should be a map"),
                pair("", "Ruleset contains a null value for rules."),
            ]
        );
        assert_eq!(
            messages(json!({"rules": []})),
            vec![pair("", "Ruleset contains an invalid value for rules.")]
        );
        assert_eq!(
            messages(json!({"formats": ["oas9"], "extends": 3, "rules": {}})),
            vec![
                pair("", "'extends' field of a ruleset should be a list or a string."),
                pair("", "Unknown format: oas9"),
            ]
        );
    }

    #[test]
    fn test_alias_errors() {
        assert_eq!(
            messages(json!({"aliases": {"A": ["#B"], "B": ["#A"]}, "rules": {}})),
            vec![pair("", "Circular alias dependency detected.")]
        );
        assert_eq!(
            messages(json!({"aliases": {"A": ["info"]}, "rules": {}})),
            vec![pair("A", "Invalid json path in resolved alias")]
        );
        assert_eq!(
            messages(json!({"aliases": {"A": 4}, "rules": {}})),
            vec![pair("A", "Invalid alias object.")]
        );
    }

    #[test]
    fn test_alias_reference_with_bad_suffix() {
        let errors = messages(json!({
            "aliases": {"Paths": ["$.paths"]},
            "rules": {
                "r": {"given": "#Paths[?(", "then": {"function": "truthy"}},
                "ok": {"given": "#Paths[*]", "then": {"function": "truthy"}}
            }
        }));
        assert_eq!(errors, vec![pair("r", "Invalid JSON path: $.paths[?(")]);
    }

    #[test]
    fn test_rule_errors() {
        let errors = messages(json!({
            "rules": {
                "a": "not a rule",
                "b": {"given": "#Nope", "then": {"function": "truthy"}},
                "c": {"given": "info", "then": [{"function": "nope"}, 3]},
                "d": {
                    "given": "$",
                    "then": {"function": "casing", "functionOptions": {"type": "flat", "x": 1}},
                    "message": "{{bogus}}",
                    "severity": "fatal",
                    "formats": [1],
                    "resolved": "yes"
                }
            }
        }));
        assert_eq!(
            errors,
            vec![
                pair("a", "Rule is not a valid object."),
                pair("b", "Rule uses an alias but no aliases are defined."),
                pair("c", "Invalid JSON path: info"),
                pair("c", "Unknown function: nope"),
                pair("c", "Invalid 'then' object in index 1"),
                pair("d", "Invalid function option for the casing function: x"),
                pair("d", "Invalid placeholder: {{bogus}}"),
                pair("d", "Invalid severity: fatal"),
                pair("d", "Invalid format in index 0"),
                pair("d", "'resolved' field of a rule should be a boolean"),
            ]
        );
    }

    #[test]
    fn test_unknown_alias_with_aliases_defined() {
        assert_eq!(
            messages(json!({
                "aliases": {"Info": ["$.info"]},
                "rules": {"r": {"given": "#Paths.x", "then": {"function": "truthy"}}}
            })),
            vec![pair("r", "Unknown alias: Paths")]
        );
    }
}
