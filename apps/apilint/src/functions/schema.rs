use super::{subject, FunctionResult, LintFunction, Options};
use crate::target::LintTarget;
use jsonschema::{Draft, Validator};
use serde_json::Value as Json;

const DIALECTS: &[&str] = &[
    "auto",
    "draft4",
    "draft6",
    "draft7",
    "draft2019-09",
    "draft2020-12",
];

/// Values must validate against a JSON Schema.
pub struct Schema {
    validator: Option<Validator>,
    all_errors: bool,
    errors: Vec<String>,
}

fn draft_for(dialect: &str) -> Option<Draft> {
    match dialect {
        "draft4" => Some(Draft::Draft4),
        "draft6" => Some(Draft::Draft6),
        "draft7" => Some(Draft::Draft7),
        "draft2019-09" => Some(Draft::Draft201909),
        "draft2020-12" => Some(Draft::Draft202012),
        _ => None,
    }
}

impl Schema {
    pub fn new(options: &Options) -> Self {
        let mut errors = Vec::new();
        let mut draft = None;
        let mut all_errors = false;

        match options.get("dialect") {
            None => {}
            Some(Json::String(d)) if DIALECTS.contains(&d.as_str()) => draft = draft_for(d),
            Some(Json::String(_)) => {
                errors.push("Schema function should contain a valid JSON schema dialect.".into())
            }
            Some(_) => errors.push(
                "Schema function should contain a string value for the dialect option.".into(),
            ),
        }
        match options.get("allErrors") {
            None => {}
            Some(Json::Bool(b)) => all_errors = *b,
            Some(_) => errors.push(
                "Schema function should contain a boolean value for the allErrors option.".into(),
            ),
        }
        for key in options.keys() {
            if !matches!(key.as_str(), "schema" | "dialect" | "allErrors") {
                errors.push(format!("Unknown option for the schema function: {key}"));
            }
        }

        let validator = match options.get("schema") {
            None => {
                errors.push("Schema function should contain the schema option.".into());
                None
            }
            Some(schema) => {
                let mut opts = jsonschema::options();
                if let Some(d) = draft {
                    opts.with_draft(d);
                }
                match opts.build(schema) {
                    Ok(v) => Some(v),
                    Err(e) => {
                        tracing::debug!(error = %e, "schema option failed to compile");
                        errors.push("Schema function should contain a valid JSON schema.".into());
                        None
                    }
                }
            }
        };

        Self {
            validator,
            all_errors,
            errors,
        }
    }
}

impl LintFunction for Schema {
    fn name(&self) -> &'static str {
        "schema"
    }

    fn validate_options(&self) -> Vec<String> {
        self.errors.clone()
    }

    fn run(&self, target: &LintTarget<'_>) -> FunctionResult {
        let Some(validator) = &self.validator else {
            return FunctionResult::fail("Schema function has no usable schema");
        };
        let limit = if self.all_errors { usize::MAX } else { 1 };
        let violations: Vec<String> = validator
            .iter_errors(target.value())
            .take(limit)
            .map(|e| {
                let at = e.instance_path.to_string();
                if at.is_empty() {
                    e.to_string()
                } else {
                    format!("{at} {e}")
                }
            })
            .collect();
        if violations.is_empty() {
            FunctionResult::pass()
        } else {
            FunctionResult::fail(format!(
                "{} does not match the schema: {}",
                subject(target),
                violations.join("; ")
            ))
        }
    }
}
