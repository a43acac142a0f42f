use super::{subject, FunctionResult, LintFunction, Options};
use crate::target::LintTarget;
use regex::Regex;
use serde_json::Value as Json;

const DIGITS: &str = "0-9";

/// Case templates; `{D}` is replaced by the digit class (or nothing).
const CASES: &[(&str, &str)] = &[
    ("flat", "[a-z][a-z{D}]*"),
    ("camel", "[a-z][a-z{D}]*(?:[A-Z{D}](?:[a-z{D}]+|$))*"),
    ("pascal", "[A-Z][a-z{D}]*(?:[A-Z{D}](?:[a-z{D}]+|$))*"),
    ("kebab", "[a-z][a-z{D}]*(?:-[a-z{D}]+)*"),
    ("cobol", "[A-Z][A-Z{D}]*(?:-[A-Z{D}]+)*"),
    ("snake", "[a-z][a-z{D}]*(?:_[a-z{D}]+)*"),
    ("macro", "[A-Z][A-Z{D}]*(?:_[A-Z{D}]+)*"),
];

#[derive(Debug, Clone, Default)]
struct Separator {
    ch: Option<String>,
    allow_leading: bool,
}

/// String values must follow a naming convention.
pub struct Casing {
    separator: Option<Separator>,
    pattern: Option<Regex>,
    errors: Vec<String>,
}

impl Casing {
    pub fn new(options: &Options) -> Self {
        let mut errors = Vec::new();
        let mut case_type: Option<&str> = None;
        let mut disallow_digits = false;
        let mut separator: Option<Separator> = None;

        match options.get("type") {
            None => errors.push("The 'type' option is required for the 'casing' function.".into()),
            Some(Json::String(t)) if CASES.iter().any(|(name, _)| name == t) => {
                case_type = Some(t.as_str())
            }
            Some(other) => errors.push(format!(
                "Invalid casing type: {}",
                crate::target::render_value(other)
            )),
        }

        for (key, value) in options {
            match key.as_str() {
                "type" => {}
                "disallowDigits" => match value {
                    Json::Bool(b) => disallow_digits = *b,
                    _ => errors.push("The 'disallowDigits' option should be a boolean.".into()),
                },
                "separator" => match value.as_object() {
                    Some(map) => separator = Some(parse_separator(map, &mut errors)),
                    None => errors.push("The 'separator' option should be a map.".into()),
                },
                other => errors.push(format!(
                    "Invalid function option for the casing function: {other}"
                )),
            }
        }

        let pattern = match case_type {
            Some(t) if errors.is_empty() => {
                build_pattern(t, disallow_digits, separator.as_ref()).ok()
            }
            _ => None,
        };
        Self {
            separator,
            pattern,
            errors,
        }
    }
}

fn parse_separator(map: &Options, errors: &mut Vec<String>) -> Separator {
    let mut sep = Separator::default();
    if !map.contains_key("char") && !map.contains_key("allowLeading") {
        errors.push("The separator object should not be empty if it is defined.".into());
    }
    if map.contains_key("allowLeading") && !map.contains_key("char") {
        errors.push("Separator char must be present if allowLeading is specified.".into());
    }
    for (key, value) in map {
        match key.as_str() {
            "char" => match value {
                Json::String(s) if s.chars().count() == 1 => sep.ch = Some(s.clone()),
                Json::String(_) => errors.push("Separator char is not a single character.".into()),
                _ => errors.push(
                    "The 'char' key in the 'separator' option should be a string.".into(),
                ),
            },
            "allowLeading" => match value {
                Json::Bool(b) => sep.allow_leading = *b,
                _ => errors.push(
                    "The 'allowLeading' key in the 'separator' option should be a boolean.".into(),
                ),
            },
            other => errors.push(format!("Invalid option in separator object: {other}")),
        }
    }
    sep
}

fn build_pattern(
    case_type: &str,
    disallow_digits: bool,
    separator: Option<&Separator>,
) -> Result<Regex, regex::Error> {
    let template = CASES
        .iter()
        .find(|(name, _)| *name == case_type)
        .map(|(_, t)| *t)
        .unwrap_or(CASES[0].1);
    let base = template.replace("{D}", if disallow_digits { "" } else { DIGITS });
    let full = match separator.and_then(|s| s.ch.as_deref().map(|c| (c, s.allow_leading))) {
        None => format!("^{base}$"),
        Some((ch, allow_leading)) => {
            let sep = format!("[{}]", regex::escape(ch));
            let leading = if allow_leading {
                format!("{sep}?")
            } else {
                String::new()
            };
            format!("^{leading}{base}(?:{sep}{base})*$")
        }
    };
    Regex::new(&full)
}

impl LintFunction for Casing {
    fn name(&self) -> &'static str {
        "casing"
    }

    fn validate_options(&self) -> Vec<String> {
        self.errors.clone()
    }

    fn run(&self, target: &LintTarget<'_>) -> FunctionResult {
        let Json::String(s) = target.value() else {
            return FunctionResult::pass();
        };
        if s.is_empty() {
            return FunctionResult::pass();
        }
        if let Some(sep) = &self.separator {
            if sep.allow_leading && sep.ch.as_deref() == Some(s.as_str()) {
                return FunctionResult::pass();
            }
        }
        match &self.pattern {
            Some(re) if re.is_match(s) => FunctionResult::pass(),
            _ => FunctionResult::fail(format!(
                "{} does not match the specified casing pattern.",
                subject(target)
            )),
        }
    }
}
