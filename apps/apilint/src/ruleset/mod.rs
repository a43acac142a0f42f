//! Ruleset model: rules, aliases and format scoping.
//!
//! Construction order:
//! 1. ruleset-level `formats`
//! 2. alias definitions, flattened by `alias::resolve_aliases_in_aliases`
//! 3. rules, with alias references in `given` replaced in place
//!
//! Any failure leaves the ruleset "not initialized" with a stored message;
//! the engine refuses to evaluate such a ruleset.

pub mod alias;
pub mod format;
pub mod validate;

use crate::content;
use crate::error::{Error, RulesetError};
use crate::functions::{build_function, LintFunction, Options};
use alias::{resolve_alias_given, resolve_aliases_in_aliases, AliasDefinition};
use format::Format;
use serde::Serialize;
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warn,
    Info,
    Hint,
    Off,
}

impl Severity {
    pub const NAMES: [&'static str; 5] = ["error", "warn", "info", "hint", "off"];

    /// Case-insensitive parse of `error|warn|info|hint|off`.
    pub fn parse(s: &str) -> Option<Severity> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Some(Severity::Error),
            "warn" => Some(Severity::Warn),
            "info" => Some(Severity::Info),
            "hint" => Some(Severity::Hint),
            "off" => Some(Severity::Off),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
            Severity::Hint => "hint",
            Severity::Off => "off",
        }
    }

    /// Higher is more severe; `off` ranks lowest.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Error => 4,
            Severity::Warn => 3,
            Severity::Info => 2,
            Severity::Hint => 1,
            Severity::Off => 0,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `then` clause bound to its lint function.
pub struct RuleThen {
    pub field: Option<String>,
    pub function_name: String,
    pub options: Options,
    pub function: Box<dyn LintFunction>,
}

impl fmt::Debug for RuleThen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleThen")
            .field("field", &self.field)
            .field("function_name", &self.function_name)
            .field("options", &self.options)
            .finish()
    }
}

#[derive(Debug)]
pub struct Rule {
    pub name: String,
    pub description: Option<String>,
    pub message: Option<String>,
    pub severity: Severity,
    /// Selectors after alias resolution.
    pub given: Vec<String>,
    pub then: Vec<RuleThen>,
    pub formats: Vec<Format>,
    pub resolved: bool,
    pub recommended: bool,
}

fn malformed(rule: &str, message: impl Into<String>) -> RulesetError {
    RulesetError::Malformed {
        location: rule.to_string(),
        message: message.into(),
    }
}

fn optional_string(rule: &str, map: &Options, key: &str) -> Result<Option<String>, RulesetError> {
    match map.get(key) {
        None | Some(Json::Null) => Ok(None),
        Some(Json::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(malformed(rule, format!("'{key}' field of a rule should be a string"))),
    }
}

fn optional_bool(rule: &str, map: &Options, key: &str, default: bool) -> Result<bool, RulesetError> {
    match map.get(key) {
        None => Ok(default),
        Some(Json::Bool(b)) => Ok(*b),
        Some(_) => Err(malformed(rule, format!("'{key}' field of a rule should be a boolean"))),
    }
}

/// Parse a list of format names, rejecting unknown ones.
pub fn parse_formats(location: &str, value: Option<&Json>) -> Result<Vec<Format>, RulesetError> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let items = value
        .as_array()
        .ok_or_else(|| malformed(location, "'formats' field should be a list"))?;
    items
        .iter()
        .map(|item| {
            let name = item
                .as_str()
                .ok_or_else(|| malformed(location, "Invalid format in formats list"))?;
            Format::parse(name).ok_or_else(|| malformed(location, format!("Unknown format: {name}")))
        })
        .collect()
}

impl RuleThen {
    fn from_value(rule: &str, value: &Json) -> Result<Self, RulesetError> {
        let map = value
            .as_object()
            .ok_or_else(|| malformed(rule, "Invalid 'then' object"))?;
        let field = match map.get("field") {
            None => None,
            Some(Json::String(s)) => Some(s.clone()),
            Some(_) => {
                return Err(malformed(rule, "'field' field of a then object should be a string"))
            }
        };
        let function_name = match map.get("function") {
            Some(Json::String(s)) => s.clone(),
            Some(_) => {
                return Err(malformed(rule, "'function' field of a then object should be a string"))
            }
            None => return Err(malformed(rule, "Then object does not contain a 'function' field.")),
        };
        let options = match map.get("functionOptions") {
            None | Some(Json::Null) => Options::new(),
            Some(Json::Object(o)) => o.clone(),
            Some(_) => {
                return Err(malformed(
                    rule,
                    "'functionOptions' field of a then object should be an object",
                ))
            }
        };
        let function = build_function(&function_name, Some(&options))?;
        Ok(RuleThen {
            field,
            function_name,
            options,
            function,
        })
    }
}

impl Rule {
    /// Build a rule, resolving alias references in `given`.
    ///
    /// Complex aliases are filtered by the rule's formats, or the
    /// ruleset's when the rule declares none.
    pub fn from_value(
        name: &str,
        value: &Json,
        aliases: &BTreeMap<String, AliasDefinition>,
        ruleset_formats: &[Format],
    ) -> Result<Rule, RulesetError> {
        let map = value
            .as_object()
            .ok_or_else(|| malformed(name, "Rule is not a valid object."))?;

        let formats = parse_formats(name, map.get("formats"))?;
        let active = if !formats.is_empty() {
            Some(formats.as_slice())
        } else if !ruleset_formats.is_empty() {
            Some(ruleset_formats)
        } else {
            None
        };

        let raw_given: Vec<&str> = match map.get("given") {
            Some(Json::String(s)) => vec![s.as_str()],
            Some(Json::Array(items)) => items
                .iter()
                .map(|i| {
                    i.as_str()
                        .ok_or_else(|| malformed(name, "'given' entries should be strings"))
                })
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(malformed(name, "'given' field of a rule should be a string or a list"))
            }
            None => return Err(malformed(name, "Rule does not contain a 'given' field.")),
        };
        let mut given = Vec::with_capacity(raw_given.len());
        for g in raw_given {
            given.extend(resolve_alias_given(g, aliases, active)?);
        }

        let then = match map.get("then") {
            Some(v @ Json::Object(_)) => vec![RuleThen::from_value(name, v)?],
            Some(Json::Array(items)) => items
                .iter()
                .map(|v| RuleThen::from_value(name, v))
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(malformed(name, "'then' field of a rule should be an object or a list"))
            }
            None => return Err(malformed(name, "Rule does not contain a 'then' field.")),
        };

        let severity = match map.get("severity") {
            None | Some(Json::Null) => Severity::default(),
            Some(Json::String(s)) => {
                Severity::parse(s).ok_or_else(|| malformed(name, format!("Invalid severity: {s}")))?
            }
            Some(other) => return Err(malformed(name, format!("Invalid severity: {other}"))),
        };

        Ok(Rule {
            name: name.to_string(),
            description: optional_string(name, map, "description")?,
            message: optional_string(name, map, "message")?,
            severity,
            given,
            then,
            formats,
            resolved: optional_bool(name, map, "resolved", true)?,
            recommended: optional_bool(name, map, "recommended", true)?,
        })
    }
}

#[derive(Debug, Default)]
pub struct Ruleset {
    pub rules: Vec<Rule>,
    pub aliases: BTreeMap<String, AliasDefinition>,
    pub formats: Vec<Format>,
    init_error: Option<String>,
}

impl Ruleset {
    /// Parse JSON/YAML ruleset text and build the model.
    pub fn parse(text: &str) -> Result<Ruleset, Error> {
        Ok(Ruleset::from_value(&content::parse(text)?))
    }

    /// Build the model from a raw tree. Never fails; check `is_initialized`.
    pub fn from_value(raw: &Json) -> Ruleset {
        let mut ruleset = Ruleset::default();
        let Some(root) = raw.as_object() else {
            ruleset.init_error = Some("Ruleset is empty.".into());
            return ruleset;
        };

        match parse_formats("ruleset", root.get("formats")) {
            Ok(f) => ruleset.formats = f,
            Err(e) => {
                ruleset.init_error = Some(e.to_string());
                return ruleset;
            }
        }

        match root.get("aliases") {
            None | Some(Json::Null) => {}
            Some(Json::Object(raw_aliases)) => {
                for (name, value) in raw_aliases {
                    match AliasDefinition::from_value(name, value) {
                        Ok(def) => {
                            ruleset.aliases.insert(name.clone(), def);
                        }
                        Err(e) => {
                            ruleset.init_error = Some(e.to_string());
                            return ruleset;
                        }
                    }
                }
            }
            Some(_) => {
                ruleset.init_error = Some("Aliases object should be a map".into());
                return ruleset;
            }
        }
        if let Err(e) = resolve_aliases_in_aliases(&mut ruleset.aliases) {
            ruleset.init_error = Some(e.to_string());
            return ruleset;
        }

        let Some(raw_rules) = root.get("rules").and_then(Json::as_object) else {
            ruleset.init_error = Some("Ruleset does not contain any rules.".into());
            return ruleset;
        };
        let mut failures = Vec::new();
        for (name, value) in raw_rules {
            match Rule::from_value(name, value, &ruleset.aliases, &ruleset.formats) {
                Ok(rule) => ruleset.rules.push(rule),
                Err(RulesetError::Malformed { message, .. }) => {
                    failures.push(format!("{name}: {message}"))
                }
                Err(e) => failures.push(format!("{name}: {e}")),
            }
        }
        if !failures.is_empty() {
            tracing::warn!(count = failures.len(), "ruleset has rules that failed to build");
            ruleset.init_error = Some(failures.join("; "));
        }
        ruleset
    }

    pub fn is_initialized(&self) -> bool {
        self.init_error.is_none()
    }

    pub fn initialization_error(&self) -> Option<&str> {
        self.init_error.as_deref()
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }
}
