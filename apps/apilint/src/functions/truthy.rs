use super::{no_options, subject, FunctionResult, LintFunction, Options};
use crate::target::LintTarget;
use serde_json::Value as Json;

/// `false`, `0`, `""`, `null` and empty collections are falsy.
pub fn is_truthy(value: &Json) -> bool {
    match value {
        Json::Null => false,
        Json::Bool(b) => *b,
        Json::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Json::String(s) => !s.is_empty(),
        Json::Array(items) => !items.is_empty(),
        Json::Object(map) => !map.is_empty(),
    }
}

pub struct Truthy {
    errors: Vec<String>,
}

impl Truthy {
    pub fn new(options: &Options) -> Self {
        Self {
            errors: no_options("Truthy", options),
        }
    }
}

impl LintFunction for Truthy {
    fn name(&self) -> &'static str {
        "truthy"
    }

    fn validate_options(&self) -> Vec<String> {
        self.errors.clone()
    }

    fn run(&self, target: &LintTarget<'_>) -> FunctionResult {
        if is_truthy(target.value()) {
            FunctionResult::pass()
        } else {
            FunctionResult::fail(format!("{} must be truthy", subject(target)))
        }
    }
}

pub struct Falsy {
    errors: Vec<String>,
}

impl Falsy {
    pub fn new(options: &Options) -> Self {
        Self {
            errors: no_options("Falsy", options),
        }
    }
}

impl LintFunction for Falsy {
    fn name(&self) -> &'static str {
        "falsy"
    }

    fn validate_options(&self) -> Vec<String> {
        self.errors.clone()
    }

    fn run(&self, target: &LintTarget<'_>) -> FunctionResult {
        if is_truthy(target.value()) {
            FunctionResult::fail(format!("{} must be falsy", subject(target)))
        } else {
            FunctionResult::pass()
        }
    }
}
